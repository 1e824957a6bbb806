//! Core data model for Dojo.
//!
//! Lessons are authored and read-only. History and progress are append-only
//! records: the current state of a lesson is whatever the last record says.

mod history;
mod lesson;
mod progress;

pub use history::{HistoryAction, HistoryRecord};
pub use lesson::LessonSpec;
pub use progress::{Note, ProgressRecord};
