//! History types: lesson lifecycle events.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A lifecycle transition of a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Start,
    Resume,
    StartOver,
    Stop,
    Completed,
}

impl HistoryAction {
    /// Whether the lesson is still in progress after this transition.
    pub fn leaves_active(self) -> bool {
        !matches!(self, Self::Stop | Self::Completed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Resume => "resume",
            Self::StartOver => "start_over",
            Self::Stop => "stop",
            Self::Completed => "completed",
        }
    }
}

/// One line of the history log, serialized as one line of JSONL.
///
/// `active` and `completed` are derived from `action` when the record is built
/// and stored alongside it, so each line stands on its own when read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub timestamp: Timestamp,
    pub lesson_name: String,
    pub action: HistoryAction,
    pub active: bool,
    pub completed: bool,
}

impl HistoryRecord {
    pub fn new(lesson_name: &str, action: HistoryAction, timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            lesson_name: lesson_name.to_string(),
            action,
            active: action.leaves_active(),
            completed: action == HistoryAction::Completed,
        }
    }
}
