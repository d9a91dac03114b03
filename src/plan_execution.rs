use crate::assets::{fetch_assets, AssetSource, FetchState, ManifestAssetSource, RestAssetSource};
use crate::boxes::BoxOverrides;
use crate::export::MockupDocument;
use crate::plan::{CustomExportProfile, ExportFileType, ExportProfileItem, Plan};
use crate::storage::{BoxOverrideStore, FileStore};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::channel;
use tracing::{debug, error, info, warn};

use anyhow::{anyhow, Result};

fn plan_dir(plan_file_path: &Path) -> Result<&Path> {
    plan_file_path
        .parent()
        .ok_or_else(|| anyhow!("Plan file has no parent directory"))
}

/// Reads and parses a plan file
pub fn load_plan(plan_file_path: &Path) -> Result<Plan> {
    let path_content = std::fs::read_to_string(plan_file_path)
        .map_err(|e| anyhow!("Failed to read plan {}: {}", plan_file_path.display(), e))?;
    let plan: Plan = serde_yaml::from_str(&path_content)?;
    Ok(plan)
}

/// Builds the asset source configured in the plan, if any
fn asset_source(plan: &Plan, plan_file_path: &Path) -> Result<Option<Box<dyn AssetSource>>> {
    if let Some(manifest) = &plan.assets.manifest {
        let path = plan_dir(plan_file_path)?.join(manifest);
        info!("Using asset manifest {}", path.display());
        let source: Box<dyn AssetSource> = Box::new(ManifestAssetSource::new(path));
        return Ok(Some(source));
    }
    if let Some(rest) = &plan.assets.rest {
        let api_key = match &rest.api_key_env {
            Some(var) => match std::env::var(var) {
                Ok(key) => Some(key),
                Err(_) => {
                    warn!("Environment variable {} is not set, requesting without a key", var);
                    None
                }
            },
            None => None,
        };
        info!("Using asset endpoint {}", rest.base_url);
        let source: Box<dyn AssetSource> = Box::new(RestAssetSource::new(&rest.base_url, api_key)?);
        return Ok(Some(source));
    }
    Ok(None)
}

/// Loads the persisted box overrides, falling back to the defaults
fn load_boxes(plan: &Plan, plan_file_path: &Path) -> Result<BoxOverrides> {
    match &plan.boxes {
        Some(config) => {
            let dir = plan_dir(plan_file_path)?.join(&config.store);
            debug!("Loading box overrides from {}", dir.display());
            Ok(BoxOverrideStore::new(FileStore::new(dir)).load_or_default())
        }
        None => Ok(BoxOverrides::new().with_defaults()),
    }
}

/// Composes the configured session into a document ready for export
pub async fn build_document(plan: &Plan, plan_file_path: &Path) -> Result<MockupDocument> {
    let session = plan.build_session();

    let assets = match asset_source(plan, plan_file_path)? {
        Some(source) => fetch_assets(source.as_ref()).await,
        None => {
            warn!("Plan has no asset source; rendering without layer images");
            FetchState::Ready(Vec::new())
        }
    };
    if let Some(reason) = assets.failure() {
        warn!("Continuing without assets: {}", reason);
    }

    Ok(MockupDocument {
        name: plan.name(),
        session,
        assets: assets.index(),
        boxes: load_boxes(plan, plan_file_path)?,
        render: plan.render.clone(),
        inquiry: plan.inquiry.clone(),
    })
}

/// Template and partial paths of a custom profile, resolved against the plan directory
fn resolve_custom_profile(profile: &CustomExportProfile, plan_dir: &Path) -> CustomExportProfile {
    let resolve = |path: &String| plan_dir.join(path).display().to_string();
    CustomExportProfile {
        template: resolve(&profile.template),
        partials: profile.partials.as_ref().map(|partials| {
            partials
                .iter()
                .map(|(name, path)| (name.clone(), resolve(path)))
                .collect()
        }),
    }
}

/// Exports the document to the specified file using the appropriate renderer
fn export_document(
    doc: &MockupDocument,
    profile: &ExportProfileItem,
    output_dir: &Path,
) -> Result<()> {
    info!(
        "Starting export to file: {} using exporter {:?}",
        profile.filename, profile.exporter
    );

    let sides = profile.sides(&doc.session);
    let result = match &profile.exporter {
        ExportFileType::JSON => crate::export::to_json::render(doc, &sides),
        ExportFileType::SVG => crate::export::to_svg::render(doc, &sides),
        ExportFileType::Payload => crate::export::to_payload::render(doc),
        ExportFileType::Custom(template_config) => {
            let template_config = resolve_custom_profile(template_config, output_dir);
            crate::export::to_custom::render(doc, &sides, &template_config)
        }
    };

    match result {
        Ok(output) => {
            let target = output_dir.join(&profile.filename);
            if let Err(e) = crate::common::write_string_to_file(&target, &output) {
                error!("Failed to write to file {}: {}", target.display(), e);
            }
        }
        Err(e) => {
            error!("Failed to export file {}: {}", profile.filename, e);
        }
    }

    Ok(())
}

/// Executes a single plan run
pub async fn run_plan(plan: &Plan, plan_file_path: &Path) -> Result<()> {
    let doc = build_document(plan, plan_file_path).await?;
    info!(
        "Composed '{}' with {} layer images, step {}",
        doc.name,
        doc.assets.len(),
        doc.session.step
    );

    let output_dir = plan_dir(plan_file_path)?;
    for profile in &plan.export.profiles {
        if let Err(e) = export_document(&doc, profile, output_dir) {
            error!("Failed to export mockup: {}", e);
        }
    }

    Ok(())
}

/// Main function to execute a plan, with optional file watching
pub async fn execute_plan(plan: String, watch: bool) -> Result<()> {
    info!("Executing plan {}", plan);

    let plan_file_path = Path::new(&plan);
    let parsed = load_plan(plan_file_path)?;

    debug!("Executing plan: {:?}", parsed);
    run_plan(&parsed, plan_file_path).await?;

    if watch {
        watch_for_changes(parsed, plan_file_path).await?;
    }

    Ok(())
}

fn watched_files(plan: &Plan, plan_file_path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = vec![plan_file_path.to_path_buf()];
    if let Some(manifest) = &plan.assets.manifest {
        files.push(plan_dir(plan_file_path)?.join(manifest));
    }
    Ok(files)
}

/// Moves the watches to the files of a reloaded plan; returns the watched set
fn rewatch(
    watcher: &mut RecommendedWatcher,
    current: Vec<PathBuf>,
    plan: &Plan,
    plan_file_path: &Path,
) -> Vec<PathBuf> {
    let wanted = match watched_files(plan, plan_file_path) {
        Ok(files) => files,
        Err(e) => {
            error!("Failed to determine watched files: {}", e);
            return current;
        }
    };
    for path in current.iter().filter(|p| !wanted.contains(*p)) {
        debug!("No longer watching {}", path.display());
        if let Err(e) = watcher.unwatch(path) {
            warn!("Failed to unwatch {}: {}", path.display(), e);
        }
    }
    let mut watched = Vec::new();
    for path in wanted {
        if current.contains(&path) {
            watched.push(path);
            continue;
        }
        match watcher.watch(&path, RecursiveMode::NonRecursive) {
            Ok(()) => {
                info!("Watching {}", path.display());
                watched.push(path);
            }
            Err(e) => warn!("Failed to watch {}: {}", path.display(), e),
        }
    }
    watched
}

/// Reloads the plan and re-runs it. Failures are logged; watching goes on.
async fn handle_change(
    watcher: &mut RecommendedWatcher,
    watched: &mut Vec<PathBuf>,
    plan: &mut Plan,
    plan_file_path: &Path,
) {
    info!("Change detected, re-executing plan");
    match load_plan(plan_file_path) {
        Ok(reloaded) => {
            *plan = reloaded;
            *watched = rewatch(watcher, std::mem::take(watched), plan, plan_file_path);
        }
        Err(e) => {
            error!("Failed to reload plan, keeping previous version: {}", e);
        }
    }
    if let Err(e) = run_plan(plan, plan_file_path).await {
        error!("Plan run failed, still watching: {}", e);
    }
}

/// Sets up file watching for the plan and its manifest to re-run the plan on changes
async fn watch_for_changes(plan: Plan, plan_file_path: &Path) -> Result<()> {
    info!("Watching for changes");

    let (tx, mut rx) = channel(16);
    let mut watcher = RecommendedWatcher::new(
        move |event: notify::Result<notify::Event>| {
            if tx.blocking_send(event).is_err() {
                debug!("Watch channel closed");
            }
        },
        Config::default(),
    )?;
    let mut watched = watched_files(&plan, plan_file_path)?;
    for path in &watched {
        watcher.watch(path, RecursiveMode::NonRecursive)?;
    }

    let mut plan = plan;
    while let Some(event) = rx.recv().await {
        match event {
            Ok(event) => {
                if let EventKind::Modify(_) = event.kind {
                    debug!("File modified {:?}", event.paths);
                    handle_change(&mut watcher, &mut watched, &mut plan, plan_file_path).await;
                }
            }
            Err(e) => error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn idle_watcher() -> RecommendedWatcher {
        RecommendedWatcher::new(
            |_event: notify::Result<notify::Event>| {},
            Config::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_rewatch_follows_manifest_change() {
        let dir = tempfile::tempdir().unwrap();
        let plan_path = dir.path().join("plan.yaml");
        fs::write(&plan_path, "assets:\n  manifest: a.csv\n").unwrap();
        fs::write(dir.path().join("a.csv"), "layer_key,image_url\n").unwrap();
        fs::write(dir.path().join("b.csv"), "layer_key,image_url\n").unwrap();

        let mut watcher = idle_watcher();
        let plan = load_plan(&plan_path).unwrap();
        let watched = rewatch(&mut watcher, Vec::new(), &plan, &plan_path);
        assert_eq!(watched, vec![plan_path.clone(), dir.path().join("a.csv")]);

        fs::write(&plan_path, "assets:\n  manifest: b.csv\n").unwrap();
        let plan = load_plan(&plan_path).unwrap();
        let watched = rewatch(&mut watcher, watched, &plan, &plan_path);
        assert_eq!(watched, vec![plan_path.clone(), dir.path().join("b.csv")]);
    }

    #[test]
    fn test_rewatch_skips_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let plan_path = dir.path().join("plan.yaml");
        fs::write(&plan_path, "assets:\n  manifest: missing.csv\n").unwrap();

        let mut watcher = idle_watcher();
        let plan = load_plan(&plan_path).unwrap();
        let watched = rewatch(&mut watcher, Vec::new(), &plan, &plan_path);
        assert_eq!(watched, vec![plan_path]);
    }

    #[tokio::test]
    async fn test_failed_rerun_keeps_watching() {
        let dir = tempfile::tempdir().unwrap();
        let plan_path = dir.path().join("plan.yaml");
        fs::write(&plan_path, "meta:\n  name: First\n").unwrap();

        let mut watcher = idle_watcher();
        let mut plan = load_plan(&plan_path).unwrap();
        let mut watched = rewatch(&mut watcher, Vec::new(), &plan, &plan_path);

        fs::write(
            &plan_path,
            "meta:\n  name: Broken\nassets:\n  rest:\n    base_url: not a url\n",
        )
        .unwrap();
        assert!(run_plan(&load_plan(&plan_path).unwrap(), &plan_path)
            .await
            .is_err());

        handle_change(&mut watcher, &mut watched, &mut plan, &plan_path).await;
        assert_eq!(plan.name(), "Broken");
        assert_eq!(watched, vec![plan_path.clone()]);

        fs::write(&plan_path, "meta: [unclosed\n").unwrap();
        handle_change(&mut watcher, &mut watched, &mut plan, &plan_path).await;
        assert_eq!(plan.name(), "Broken");
    }
}
