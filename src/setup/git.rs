//! Feedstock checkout via the `git` executable.

use std::{fs, path::Path, process::Command};

use super::{Result, SetupError};

/// Clones `url` into `dest` and checks out `commit`.
///
/// Any existing checkout at `dest` is removed first: each start gets a pristine snapshot.
pub(super) fn clone_checkout(url: &str, commit: &str, dest: &Path) -> Result<()> {
    if dest.exists() {
        tracing::debug!(path = %dest.display(), "removing previous checkout");
        fs::remove_dir_all(dest)?;
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    tracing::info!(url, commit, path = %dest.display(), "cloning feedstock");
    let mut clone = Command::new("git");
    clone.arg("clone").arg("--quiet").arg(url).arg(dest);
    run_git(clone, "clone")?;

    let mut checkout = Command::new("git");
    checkout
        .arg("checkout")
        .arg("--quiet")
        .arg(commit)
        .current_dir(dest);
    run_git(checkout, "checkout")?;

    Ok(())
}

/// Run a prepared git command and return its stdout on success.
fn run_git(mut command: Command, name: &str) -> Result<String> {
    let output = command.output().map_err(SetupError::GitUnavailable)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SetupError::Git {
            command: name.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
