//! Local persistence for lesson history and progress.
//!
//! History is shared by every lesson and lives at the data root. Progress lives
//! next to each lesson's content:
//!
//! ```text
//! <root>/history.jsonl                      # Append-only lifecycle events
//! <lessons>/<name>/progress.jsonl           # Append-only step snapshots and notes
//! ```
//!
//! Both files are JSON Lines: one record per line, in the order written.

mod history;
#[cfg(test)]
pub mod memory;
mod progress;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

// Traits must be in scope for `.lines()` on `BufReader` and `.write_all()` on `File`.
use io::{BufRead, Write};

use serde::{Serialize, de::DeserializeOwned};

use crate::model::{HistoryRecord, ProgressRecord};

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("lesson directory not found: {0}")]
    LessonDirNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Read-all and append capabilities over the history and progress logs.
///
/// The file-backed [`Storage`] is what the tool runs on; tests substitute an in-memory store.
pub trait Store {
    /// Loads every history record, oldest first. A missing log is empty.
    fn load_history(&self) -> Result<Vec<HistoryRecord>>;

    /// Appends one record to the history log.
    fn append_history(&self, record: &HistoryRecord) -> Result<()>;

    /// Loads every progress record for a lesson, oldest first. A missing log is empty.
    fn load_progress(&self, lesson_name: &str) -> Result<Vec<ProgressRecord>>;

    /// Appends one record to the progress log of `record.lesson_name`.
    fn append_progress(&self, record: &ProgressRecord) -> Result<()>;
}

/// Local file-based storage for history and progress logs.
pub struct Storage {
    root: PathBuf,
    lessons_dir: PathBuf,
}

impl Storage {
    /// Creates a new storage instance rooted at the given directory.
    ///
    /// The root is created if it doesn't exist. Lesson directories are not:
    /// they belong to authored content.
    pub fn new(root: impl Into<PathBuf>, lessons_dir: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            lessons_dir: lessons_dir.into(),
        })
    }

    /// Removes the history log and every lesson's progress log.
    ///
    /// Returns the paths that were removed.
    pub fn clear(&self) -> Result<Vec<PathBuf>> {
        let mut removed = Vec::new();

        let history = self.history_path();
        if history.exists() {
            fs::remove_file(&history)?;
            removed.push(history);
        }

        let entries = match fs::read_dir(&self.lessons_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(removed),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let path = entry?.path().join(PROGRESS_FILE);
            if path.is_file() {
                fs::remove_file(&path)?;
                removed.push(path);
            }
        }
        removed.sort();
        Ok(removed)
    }

    fn history_path(&self) -> PathBuf {
        self.root.join("history.jsonl")
    }

    fn lesson_dir(&self, lesson_name: &str) -> PathBuf {
        self.lessons_dir.join(lesson_name)
    }
}

impl Store for Storage {
    fn load_history(&self) -> Result<Vec<HistoryRecord>> {
        self.read_history()
    }

    fn append_history(&self, record: &HistoryRecord) -> Result<()> {
        self.write_history(record)
    }

    fn load_progress(&self, lesson_name: &str) -> Result<Vec<ProgressRecord>> {
        self.read_progress(lesson_name)
    }

    fn append_progress(&self, record: &ProgressRecord) -> Result<()> {
        self.write_progress(record)
    }
}

const PROGRESS_FILE: &str = "progress.jsonl";

/// Reads every record of a JSONL file. A missing file reads as empty.
fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let reader = io::BufReader::new(file);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| StorageError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Appends one record to a JSONL file, creating the file if needed.
fn append_jsonl<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let mut line = serde_json::to_string(record).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    line.push('\n');
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    file.write_all(line.as_bytes())?;
    Ok(())
}
