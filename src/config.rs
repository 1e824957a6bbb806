//! Dojo configuration.
//!
//! Loaded from `<root>/config.toml`, where the root is `$DOJO_HOME` or `~/.dojo`.
//! Every key is optional; a missing file means all defaults.
//!
//! ```toml
//! lessons-dir = "lessons"                      # relative paths resolve against the root
//! curriculum = "curriculum.yaml"
//! feedstocks-dir = "training_feedstocks"
//! channels-dir = "channels"
//! channel-url = "https://repo.anaconda.com/pkgs/main"
//! ```

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_CHANNEL_URL: &str = "https://repo.anaconda.com/pkgs/main";

/// Dojo configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Where lesson directories live.
    pub lessons_dir: Option<PathBuf>,

    /// The curriculum document grouping lessons into topics.
    pub curriculum: Option<PathBuf>,

    /// Where feedstocks are cloned.
    pub feedstocks_dir: Option<PathBuf>,

    /// Where local package channels are installed.
    pub channels_dir: Option<PathBuf>,

    /// Package channel that repodata is fetched from.
    pub channel_url: Option<String>,

    #[serde(skip)]
    root: PathBuf,
}

impl Config {
    /// Load config from `<root>/config.toml`.
    /// Returns defaults if the file is missing, an error if it is unreadable or invalid.
    pub fn load(root: &Path) -> Result<Self, String> {
        let path = Self::path(root);

        let mut config: Self = if path.exists() {
            let contents = fs::read_to_string(&path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            toml::from_str(&contents)
                .map_err(|e| format!("invalid config at {}: {e}", path.display()))?
        } else {
            Self::default()
        };
        config.root = root.to_path_buf();

        if config.channel_url.as_deref().is_some_and(str::is_empty) {
            return Err(format!("channel-url is empty in {}", path.display()));
        }

        Ok(config)
    }

    /// The config file path: `<root>/config.toml`.
    pub fn path(root: &Path) -> PathBuf {
        root.join("config.toml")
    }

    /// The data root: `$DOJO_HOME`, else `~/.dojo`.
    pub fn default_root() -> Option<PathBuf> {
        resolve_root(std::env::var_os("DOJO_HOME"), dirs::home_dir())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn lessons_dir(&self) -> PathBuf {
        self.resolve(self.lessons_dir.as_deref(), "lessons")
    }

    pub fn curriculum_path(&self) -> PathBuf {
        self.resolve(self.curriculum.as_deref(), "curriculum.yaml")
    }

    pub fn feedstocks_dir(&self) -> PathBuf {
        self.resolve(self.feedstocks_dir.as_deref(), "training_feedstocks")
    }

    pub fn channels_dir(&self) -> PathBuf {
        self.resolve(self.channels_dir.as_deref(), "channels")
    }

    pub fn channel_url(&self) -> &str {
        self.channel_url.as_deref().unwrap_or(DEFAULT_CHANNEL_URL)
    }

    fn resolve(&self, configured: Option<&Path>, default: &str) -> PathBuf {
        // Joining an absolute path replaces the root.
        self.root.join(configured.unwrap_or(Path::new(default)))
    }
}

fn resolve_root(dojo_home: Option<OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
    match dojo_home {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => home.map(|h| h.join(".dojo")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn missing_file_means_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();

        assert_eq!(config.root(), dir.path());
        assert_eq!(config.lessons_dir(), dir.path().join("lessons"));
        assert_eq!(config.curriculum_path(), dir.path().join("curriculum.yaml"));
        assert_eq!(
            config.feedstocks_dir(),
            dir.path().join("training_feedstocks")
        );
        assert_eq!(config.channels_dir(), dir.path().join("channels"));
        assert_eq!(config.channel_url(), DEFAULT_CHANNEL_URL);
    }

    #[test]
    fn relative_paths_resolve_against_root() {
        let dir = TempDir::new().unwrap();
        let elsewhere = dir.path().join("shared-lessons");
        fs::write(
            Config::path(dir.path()),
            format!(
                "lessons-dir = \"{}\"\nfeedstocks-dir = \"clones\"\nchannel-url = \"https://conda.anaconda.org/conda-forge\"\n",
                elsewhere.display()
            ),
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();

        assert_eq!(config.lessons_dir(), elsewhere);
        assert_eq!(config.feedstocks_dir(), dir.path().join("clones"));
        assert_eq!(config.channel_url(), "https://conda.anaconda.org/conda-forge");
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(Config::path(dir.path()), "lessons-dir = [").unwrap();

        let err = Config::load(dir.path()).unwrap_err();
        assert!(err.starts_with("invalid config at"));
    }

    #[test]
    fn empty_channel_url_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(Config::path(dir.path()), "channel-url = \"\"").unwrap();

        let err = Config::load(dir.path()).unwrap_err();
        assert!(err.contains("channel-url is empty"));
    }

    #[test]
    fn root_prefers_dojo_home() {
        let home = Some(PathBuf::from("/home/learner"));

        assert_eq!(
            resolve_root(Some("/srv/dojo".into()), home.clone()),
            Some(PathBuf::from("/srv/dojo"))
        );
        assert_eq!(
            resolve_root(Some(OsString::new()), home.clone()),
            Some(PathBuf::from("/home/learner/.dojo"))
        );
        assert_eq!(
            resolve_root(None, home),
            Some(PathBuf::from("/home/learner/.dojo"))
        );
        assert_eq!(resolve_root(None, None), None);
    }
}
