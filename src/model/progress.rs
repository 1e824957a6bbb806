//! Progress types: where a learner is within a lesson, and what they noted.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// One snapshot of a learner's position, serialized as one line of JSONL.
///
/// A note never edits an earlier record; it arrives as a new record at the same index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub lesson_name: String,

    /// When this record was written.
    pub start_timestamp: Timestamp,

    /// Zero-based step index.
    pub lesson_index: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ProgressRecord {
    /// The note text, if the record carries a non-empty one.
    pub fn note_text(&self) -> Option<&str> {
        self.note.as_deref().filter(|n| !n.is_empty())
    }
}

/// A note attached to a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub date: Timestamp,
    pub content: String,
}
