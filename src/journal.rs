//! History and progress logs: lesson state reconstructed from append-only records.
//!
//! Every invocation starts from nothing and rebuilds state from the store.
//! The last history record decides which lesson, if any, is active; the last
//! progress record of a lesson decides which step the learner is on.

mod history;
mod progress;

pub use history::HistoryLog;
pub use progress::ProgressLog;

use crate::storage::StorageError;

/// Errors reading or extending the logs.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("no active lesson. Start one with `dojo start <lesson_name>`")]
    NoActiveLesson,

    #[error("progress for lesson {0} already exists")]
    AlreadyExists(String),

    #[error("no progress recorded for lesson {0}")]
    EmptyLog(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = core::result::Result<T, JournalError>;
