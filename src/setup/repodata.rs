//! Package-index snapshots: fetching `repodata.json` and pruning packages from it.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde_json::Value;

use super::{Result, SetupError, snapshot_path};

/// The two package maps of a `repodata.json`: legacy `.tar.bz2` and `.conda` archives.
const PACKAGE_KEYS: [&str; 2] = ["packages", "packages.conda"];

/// Fetches `repodata.json` documents from a channel over HTTP.
pub struct RepodataClient {
    http: reqwest::blocking::Client,
    channel_url: String,
}

impl RepodataClient {
    /// A client for the channel at `channel_url`, e.g. `https://repo.anaconda.com/pkgs/main`.
    pub fn new(channel_url: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(SetupError::Client)?;
        Ok(Self {
            http,
            channel_url: channel_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of the channel's index for `subdir`.
    pub fn url(&self, subdir: &str) -> String {
        format!("{}/{subdir}/repodata.json", self.channel_url)
    }

    /// GETs and parses the channel's index for `subdir`. Non-2xx statuses are errors.
    pub fn fetch(&self, subdir: &str) -> Result<Value> {
        let url = self.url(subdir);
        tracing::info!(%url, "fetching repodata");
        let http_err = |source| SetupError::Http {
            url: url.clone(),
            source,
        };
        self.http
            .get(&url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(http_err)?
            .json()
            .map_err(http_err)
    }

    /// Fetches the index for `subdir` and writes it to `dest`.
    pub fn download(&self, subdir: &str, dest: &Path) -> Result<()> {
        let repodata = self.fetch(subdir)?;
        write_repodata(dest, &repodata)
    }

    /// Stores current snapshots for `subdirs` under a lesson directory.
    ///
    /// Returns the paths written. Nothing is written unless every fetch succeeds.
    pub fn snapshot(&self, lesson_dir: &Path, subdirs: &[&str]) -> Result<Vec<PathBuf>> {
        let fetched = subdirs
            .iter()
            .map(|subdir| Ok((*subdir, self.fetch(subdir)?)))
            .collect::<Result<Vec<_>>>()?;

        let mut written = Vec::new();
        for (subdir, repodata) in fetched {
            let path = snapshot_path(lesson_dir, subdir);
            write_repodata(&path, &repodata)?;
            written.push(path);
        }
        Ok(written)
    }
}

/// Removes every package named in `names` from the snapshot at `path`.
///
/// Matches on each entry's `name` field across both package maps.
/// Returns how many entries were removed; the file is rewritten only if any were.
pub fn prune_packages(path: &Path, names: &[String]) -> Result<usize> {
    let contents = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SetupError::SnapshotNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    let mut repodata: Value =
        serde_json::from_str(&contents).map_err(|source| SetupError::Repodata {
            path: path.to_path_buf(),
            source,
        })?;

    let mut removed = 0;
    for key in PACKAGE_KEYS {
        let Some(packages) = repodata.get_mut(key).and_then(Value::as_object_mut) else {
            continue;
        };
        let before = packages.len();
        packages.retain(|_, entry| {
            let name = entry.get("name").and_then(Value::as_str);
            !name.is_some_and(|n| names.iter().any(|wanted| wanted == n))
        });
        removed += before - packages.len();
    }

    if removed > 0 {
        write_repodata(path, &repodata)?;
    }
    tracing::info!(path = %path.display(), removed, "pruned repodata");
    Ok(removed)
}

fn write_repodata(path: &Path, repodata: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_vec(repodata).map_err(|source| SetupError::Repodata {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use tempfile::TempDir;

    fn sample_repodata() -> Value {
        json!({
            "info": { "subdir": "linux-64" },
            "packages": {
                "numpy-1.16.0-py37_0.tar.bz2": { "name": "numpy", "version": "1.16.0" },
                "zlib-1.2.11-0.tar.bz2": { "name": "zlib", "version": "1.2.11" }
            },
            "packages.conda": {
                "numpy-1.16.0-py38_0.conda": { "name": "numpy", "version": "1.16.0" },
                "python-3.9.0-0.conda": { "name": "python", "version": "3.9.0" }
            }
        })
    }

    fn write_sample(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("repodata.json");
        fs::write(&path, sample_repodata().to_string()).unwrap();
        path
    }

    #[test]
    fn url_joins_channel_and_subdir() {
        let client = RepodataClient::new("https://repo.anaconda.com/pkgs/main/").unwrap();
        assert_eq!(
            client.url("noarch"),
            "https://repo.anaconda.com/pkgs/main/noarch/repodata.json"
        );
    }

    #[test]
    fn prune_removes_matching_names_from_both_maps() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir);

        let removed = prune_packages(&path, &["numpy".to_string()]).unwrap();

        assert_eq!(removed, 2);
        let pruned: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(pruned["packages"].as_object().unwrap().len(), 1);
        assert_eq!(pruned["packages.conda"].as_object().unwrap().len(), 1);
        assert_eq!(pruned["info"]["subdir"], "linux-64");
    }

    #[test]
    fn prune_without_matches_leaves_file_alone() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir);
        let before = fs::read_to_string(&path).unwrap();

        assert_eq!(prune_packages(&path, &["scipy".to_string()]).unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn prune_missing_snapshot_fails() {
        let dir = TempDir::new().unwrap();
        let err = prune_packages(&dir.path().join("nope.json"), &[]).unwrap_err();
        assert!(matches!(err, SetupError::SnapshotNotFound(_)));
    }

    #[test]
    fn prune_invalid_json_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("repodata.json");
        fs::write(&path, "not json").unwrap();

        let err = prune_packages(&path, &["numpy".to_string()]).unwrap_err();
        assert!(matches!(err, SetupError::Repodata { .. }));
    }

    #[test]
    fn snapshot_writes_nothing_when_fetch_fails() {
        let dir = TempDir::new().unwrap();
        let client = RepodataClient::new("http://127.0.0.1:9").unwrap();

        let err = client
            .snapshot(dir.path(), &["noarch", "linux-64"])
            .unwrap_err();

        assert!(matches!(err, SetupError::Http { .. }));
        assert!(!dir.path().join("repodata").exists());
    }
}
