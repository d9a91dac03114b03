use include_dir::{include_dir, Dir};
use std::fs;
use std::path::Path;
use tracing::{error, info};

static SAMPLE_DIR_BASIC: Dir = include_dir!("sample/basic");

pub fn generate_template(exporter: String) {
    info!("Generating exporter template: {}", exporter);
    match exporter.as_str() {
        "svg" => {
            println!("{}", crate::export::to_svg::get_template());
        }
        _ => {
            error!("Unsupported exporter: {} - use svg", exporter);
        }
    }
}

fn sample_dir(sample: &str) -> Option<&'static Dir<'static>> {
    match sample {
        "basic" => Some(&SAMPLE_DIR_BASIC),
        _ => None,
    }
}

pub fn generate_sample(sample: String, dir: String) {
    info!("Generating sample project: {:?} in {:?}", sample, dir);
    let Some(sample_dir) = sample_dir(&sample) else {
        error!("Unknown sample: {} - use basic", sample);
        return;
    };

    let target_path = Path::new(&dir);
    if let Err(e) = fs::create_dir_all(target_path) {
        error!("Failed to create target directory: {:?}", e);
        return;
    }

    if let Err(e) = write_dir_contents(sample_dir, target_path) {
        error!("Failed to write sample: {:?}", e);
        return;
    }

    info!("Sample project generated successfully at: {:?}", dir);
}

fn write_dir_contents(dir: &Dir, target_path: &Path) -> std::io::Result<()> {
    for file in dir.files() {
        let relative_path = file.path().strip_prefix(dir.path()).unwrap_or(file.path());
        let target_file_path = target_path.join(relative_path);

        if let Some(parent) = target_file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target_file_path, file.contents())?;
    }

    for sub_dir in dir.dirs() {
        let relative_path = sub_dir
            .path()
            .strip_prefix(dir.path())
            .unwrap_or(sub_dir.path());
        let sub_dir_path = target_path.join(relative_path);
        fs::create_dir_all(&sub_dir_path)?;
        write_dir_contents(sub_dir, &sub_dir_path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Plan;

    #[test]
    fn test_basic_sample_is_a_valid_plan() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("basic");
        generate_sample("basic".to_string(), target.display().to_string());

        let content = fs::read_to_string(target.join("plan.yaml")).unwrap();
        let plan: Plan = serde_yaml::from_str(&content).unwrap();
        assert_eq!(plan.assets.manifest.as_deref(), Some("assets.csv"));
        assert!(target.join("assets.csv").exists());
    }

    #[test]
    fn test_unknown_sample_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nothing");
        generate_sample("unknown".to_string(), target.display().to_string());
        assert!(!target.exists());
    }
}
