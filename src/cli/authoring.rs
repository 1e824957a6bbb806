//! Authoring and housekeeping commands: create_lesson, prune_repodata, clean.

use crate::{
    catalog::{self, Catalog},
    setup::{Workspace, prune_packages, snapshot_path},
    storage::Storage,
};

pub(super) fn cmd_create_lesson(
    catalog: &Catalog,
    workspace: &Workspace,
    name: &str,
    target_platform: Option<&str>,
    repodata_snapshot: bool,
) -> Result<(), String> {
    let path = catalog
        .create(name, target_platform)
        .map_err(|e| format!("failed to create lesson: {e}"))?;
    eprintln!("Created new lesson.yaml template at {}", path.display());

    if repodata_snapshot {
        let subdirs = snapshot_subdirs(target_platform);
        let written = workspace
            .repodata()
            .snapshot(&catalog.lesson_dir(name), &subdirs)
            .map_err(|e| format!("failed to snapshot repodata: {e}"))?;
        for path in &written {
            eprintln!("  Saved {}", path.display());
        }
        eprintln!("Set `modified_repodata: true` in lesson.yaml to serve these snapshots.");
    }

    Ok(())
}

pub(super) fn cmd_prune_repodata(
    catalog: &Catalog,
    lesson: &str,
    subdir: &str,
    packages: &[String],
) -> Result<(), String> {
    catalog::validate_name(lesson).map_err(|e| e.to_string())?;
    let path = snapshot_path(&catalog.lesson_dir(lesson), subdir);

    let removed = prune_packages(&path, packages)
        .map_err(|e| format!("failed to prune repodata: {e}"))?;

    println!("Removed {removed} package entries from {}", path.display());
    Ok(())
}

pub(super) fn cmd_clean(storage: &Storage, workspace: &Workspace) -> Result<(), String> {
    let mut removed = storage
        .clear()
        .map_err(|e| format!("failed to clear progress: {e}"))?;
    removed.extend(
        workspace
            .clean()
            .map_err(|e| format!("failed to clean workspace: {e}"))?,
    );

    if removed.is_empty() {
        eprintln!("Nothing to clean");
        return Ok(());
    }
    for path in &removed {
        eprintln!("Removed {}", path.display());
    }
    Ok(())
}

/// Subdirs to snapshot for a new lesson: `noarch` plus its platform.
fn snapshot_subdirs(target_platform: Option<&str>) -> Vec<&str> {
    let mut subdirs = vec!["noarch"];
    if let Some(platform) = target_platform
        && platform != "noarch"
    {
        subdirs.push(platform);
    }
    subdirs
}
