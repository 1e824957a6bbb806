//! Lesson setup: the outside world a lesson runs against.
//!
//! Starting or resuming a lesson clones its feedstock at the pinned commit and,
//! for lessons with `modified_repodata`, installs a local package channel built
//! from the lesson's index snapshots. Stopping or completing removes the channel.
//!
//! ```text
//! <feedstocks>/<repo_name>/                  # Fresh clone per start
//! <channels>/<lesson>/<subdir>/repodata.json # Local channel while the lesson runs
//! ```

mod git;
mod repodata;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::model::LessonSpec;

pub use repodata::{RepodataClient, prune_packages};

/// Errors from external setup: git, HTTP, and the files they produce.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("failed to run git: {0}")]
    GitUnavailable(io::Error),

    #[error("git {command} failed: {stderr}")]
    Git { command: String, stderr: String },

    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("failed to fetch {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("invalid repodata at {path}: {source}")]
    Repodata {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("no repodata snapshot at {0}")]
    SnapshotNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = core::result::Result<T, SetupError>;

/// What the navigation engine needs from the outside world.
pub trait Setup {
    /// Makes the lesson's feedstock (and channel, if any) ready. Returns the feedstock path.
    fn prepare(&self, lesson: &LessonSpec) -> Result<PathBuf>;

    /// Where the lesson's feedstock is checked out. Pure: touches nothing.
    fn feedstock_path(&self, lesson: &LessonSpec) -> PathBuf;

    /// Where the lesson's local channel lives, for lessons that have one.
    fn channel_path(&self, lesson: &LessonSpec) -> Option<PathBuf>;

    /// Undoes what `prepare` set up beyond the feedstock clone.
    fn teardown(&self, lesson: &LessonSpec) -> Result<()>;
}

/// The package-index subdirs a lesson needs: `noarch` plus its target platform.
pub fn subdirs(lesson: &LessonSpec) -> Vec<&str> {
    let mut subdirs = vec!["noarch"];
    if lesson.target_platform != "noarch" && !lesson.target_platform.is_empty() {
        subdirs.push(lesson.target_platform.as_str());
    }
    subdirs
}

/// Path of an authored snapshot inside a lesson directory.
pub fn snapshot_path(lesson_dir: &Path, subdir: &str) -> PathBuf {
    lesson_dir
        .join("repodata")
        .join(subdir)
        .join("repodata.json")
}

/// Local directories for feedstock clones and lesson channels.
pub struct Workspace {
    lessons_dir: PathBuf,
    feedstocks_dir: PathBuf,
    channels_dir: PathBuf,
    index: RepodataClient,
}

impl Workspace {
    pub fn new(
        lessons_dir: impl Into<PathBuf>,
        feedstocks_dir: impl Into<PathBuf>,
        channels_dir: impl Into<PathBuf>,
        index: RepodataClient,
    ) -> Self {
        Self {
            lessons_dir: lessons_dir.into(),
            feedstocks_dir: feedstocks_dir.into(),
            channels_dir: channels_dir.into(),
            index,
        }
    }

    /// The client for the configured package channel.
    pub fn repodata(&self) -> &RepodataClient {
        &self.index
    }

    /// Removes every feedstock clone and lesson channel. Returns what was removed.
    pub fn clean(&self) -> Result<Vec<PathBuf>> {
        let mut removed = Vec::new();
        for dir in [&self.feedstocks_dir, &self.channels_dir] {
            if dir.exists() {
                fs::remove_dir_all(dir)?;
                removed.push(dir.clone());
            }
        }
        Ok(removed)
    }

    /// Copies the lesson's snapshots into its local channel, fetching any
    /// subdir the lesson doesn't carry a snapshot for.
    fn install_channel(&self, lesson: &LessonSpec) -> Result<PathBuf> {
        let channel = self.channels_dir.join(&lesson.name);
        let lesson_dir = self.lessons_dir.join(&lesson.name);
        for subdir in subdirs(lesson) {
            let dest = channel.join(subdir).join("repodata.json");
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            let authored = snapshot_path(&lesson_dir, subdir);
            if authored.is_file() {
                tracing::debug!(subdir, from = %authored.display(), "installing authored snapshot");
                fs::copy(&authored, &dest)?;
            } else {
                eprintln!("  Downloading {subdir}/repodata.json");
                self.index.download(subdir, &dest)?;
            }
        }
        Ok(channel)
    }
}

impl Setup for Workspace {
    fn prepare(&self, lesson: &LessonSpec) -> Result<PathBuf> {
        eprintln!("Setting up feedstock snapshot...");
        let path = self.feedstock_path(lesson);
        eprintln!("Cloning {} at {}", lesson.repo_name(), lesson.commit);
        git::clone_checkout(&lesson.feedstock_url, &lesson.commit, &path)?;

        if lesson.modified_repodata {
            let channel = self.install_channel(lesson)?;
            eprintln!("Local channel ready at {}", channel.display());
        }
        eprintln!("...success!");
        Ok(path)
    }

    fn feedstock_path(&self, lesson: &LessonSpec) -> PathBuf {
        self.feedstocks_dir.join(lesson.repo_name())
    }

    fn channel_path(&self, lesson: &LessonSpec) -> Option<PathBuf> {
        lesson
            .modified_repodata
            .then(|| self.channels_dir.join(&lesson.name))
    }

    fn teardown(&self, lesson: &LessonSpec) -> Result<()> {
        let channel = self.channels_dir.join(&lesson.name);
        if channel.exists() {
            tracing::info!(lesson = %lesson.name, "removing local channel");
            fs::remove_dir_all(channel)?;
        }
        Ok(())
    }
}
