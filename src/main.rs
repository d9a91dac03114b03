use mockup::boxes::{default_box, get_box, nudge, AreaBox, BoxField};
use mockup::registry::PrintAreaKey;
use mockup::storage::{BoxOverrideStore, FileStore};
use mockup::upload::{LocalUploadStore, UploadClient, UploadTarget};
use mockup::{common, generate_commands, plan, plan_execution};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Run {
        #[clap(short, long)]
        plan: String,
        #[clap(short, long)]
        watch: bool,
    },
    Init {
        #[clap(short, long)]
        plan: String,
    },
    Generate {
        #[clap(subcommand)]
        command: GenerateCommands,
    },
    /// Inspect and adjust the persisted highlight boxes
    Boxes {
        #[clap(subcommand)]
        command: BoxesCommands,
    },
    /// Store a file for a print area or the additional note and print its URL
    Upload {
        file: String,
        #[clap(short, long)]
        target: UploadTarget,
        #[clap(short, long, default_value = "uploads")]
        root: String,
        #[clap(short, long, default_value = "http://localhost:8080/uploads")]
        base_url: String,
    },
}

#[derive(Subcommand, Debug)]
enum GenerateCommands {
    Template { name: String },
    Sample { sample: String, dir: String },
}

#[derive(Subcommand, Debug)]
enum BoxesCommands {
    Show {
        #[clap(short, long, default_value = ".mockup")]
        store: String,
    },
    Nudge {
        key: PrintAreaKey,
        #[clap(value_enum)]
        field: BoxField,
        #[clap(allow_negative_numbers = true)]
        delta: f64,
        #[clap(short, long, default_value = ".mockup")]
        store: String,
        /// Round the adjusted box to whole percentages before saving
        #[clap(short, long)]
        round: bool,
    },
    Reset {
        key: Option<PrintAreaKey>,
        #[clap(short, long, default_value = ".mockup")]
        store: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::Run { plan, watch } => {
            info!("Running plan: {}", plan);
            plan_execution::execute_plan(plan, watch).await?;
        }
        Commands::Init { plan } => {
            info!("Initializing plan: {}", plan);
            let plan_file_path = plan;
            let plan = plan::Plan::default();
            let serialized_plan = serde_yaml::to_string(&plan)?;
            common::write_string_to_file(&plan_file_path, &serialized_plan)?;
        }
        Commands::Generate { command } => match command {
            GenerateCommands::Template { name } => {
                info!("Generating template: {}", name);
                generate_commands::generate_template(name);
            }
            GenerateCommands::Sample { sample, dir } => {
                info!("Generating sample: {} in {}", sample, dir);
                generate_commands::generate_sample(sample, dir);
            }
        },
        Commands::Boxes { command } => run_boxes(command)?,
        Commands::Upload {
            file,
            target,
            root,
            base_url,
        } => {
            let bytes = tokio::fs::read(&file).await?;
            let store = LocalUploadStore::new(root, base_url);
            let url = store.upload(&bytes, &file, target).await?;
            println!("{}", url);
        }
    }

    Ok(())
}

fn print_box(key: PrintAreaKey, area: &AreaBox) {
    let css = area.to_css();
    let line = format!(
        "{:<20} left {:>6} top {:>6} width {:>6} height {:>6}  (right {:.1}, bottom {:.1})",
        key.as_str(),
        css.left,
        css.top,
        css.width,
        css.height,
        area.right(),
        area.bottom()
    );
    if *area == default_box(key) {
        println!("{}", line);
    } else {
        println!("{} {}", line.yellow(), "custom".bold());
    }
}

fn run_boxes(command: BoxesCommands) -> Result<()> {
    match command {
        BoxesCommands::Show { store } => {
            let overrides = BoxOverrideStore::new(FileStore::new(store)).load()?;
            for key in PrintAreaKey::ALL {
                print_box(key, &get_box(key, &overrides));
            }
        }
        BoxesCommands::Nudge {
            key,
            field,
            delta,
            store,
            round,
        } => {
            if !delta.is_finite() {
                bail!("delta must be a finite number");
            }
            let store = BoxOverrideStore::new(FileStore::new(store));
            let mut overrides = nudge(key, field, delta, &store.load()?);
            if round {
                let rounded = get_box(key, &overrides).rounded();
                overrides.insert(key, rounded);
            }
            store.persist(&overrides)?;
            info!("Adjusted {} {} by {}", key, field, delta);
            print_box(key, &get_box(key, &overrides));
        }
        BoxesCommands::Reset { key, store } => {
            let store = BoxOverrideStore::new(FileStore::new(store));
            match key {
                Some(key) => {
                    let mut overrides = store.load()?;
                    overrides.insert(key, default_box(key));
                    store.persist(&overrides)?;
                    info!("Reset box for {}", key);
                }
                None => {
                    store.reset()?;
                    info!("Reset all boxes");
                }
            }
        }
    }
    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("handlebars=off,{}", log_level)))
        .without_time()
        .init();
}
