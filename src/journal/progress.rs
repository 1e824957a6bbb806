//! The progress log of a single lesson.

use jiff::Timestamp;

use crate::{
    model::{Note, ProgressRecord},
    storage::Store,
};

use super::{JournalError, Result};

/// Step snapshots for one lesson.
///
/// A dumb append-only store: it does not know how many steps the lesson has,
/// so bounds are the caller's business.
pub struct ProgressLog<'a> {
    store: &'a dyn Store,
    lesson_name: &'a str,
}

impl<'a> ProgressLog<'a> {
    pub fn new(store: &'a dyn Store, lesson_name: &'a str) -> Self {
        Self { store, lesson_name }
    }

    /// Whether the lesson has been started before (the log is non-empty).
    pub fn exists(&self) -> Result<bool> {
        Ok(!self.records()?.is_empty())
    }

    /// Starts the log with a single record at step 0.
    pub fn create(&self) -> Result<()> {
        if self.exists()? {
            return Err(JournalError::AlreadyExists(self.lesson_name.to_string()));
        }
        self.append_step(0, None)
    }

    /// Appends a snapshot at `step_index`, optionally carrying a note.
    pub fn append_step(&self, step_index: usize, note: Option<&str>) -> Result<()> {
        let record = ProgressRecord {
            lesson_name: self.lesson_name.to_string(),
            start_timestamp: Timestamp::now(),
            lesson_index: step_index,
            note: note.map(String::from),
        };
        self.store.append_progress(&record)?;
        Ok(())
    }

    /// Moves back to `step_index` without a note. Earlier records are kept.
    pub fn reset_to(&self, step_index: usize) -> Result<()> {
        self.append_step(step_index, None)
    }

    /// The lesson name and step index of the last record.
    pub fn current(&self) -> Result<(String, usize)> {
        let records = self.records()?;
        let last = records
            .last()
            .ok_or_else(|| JournalError::EmptyLog(self.lesson_name.to_string()))?;
        Ok((last.lesson_name.clone(), last.lesson_index))
    }

    /// Notes recorded at `step_index`, in the order they were added.
    pub fn notes_for(&self, step_index: usize) -> Result<Vec<Note>> {
        Ok(self
            .records()?
            .iter()
            .filter(|r| r.lesson_index == step_index)
            .filter_map(|r| {
                r.note_text().map(|content| Note {
                    date: r.start_timestamp,
                    content: content.to_string(),
                })
            })
            .collect())
    }

    pub fn records(&self) -> Result<Vec<ProgressRecord>> {
        Ok(self.store.load_progress(self.lesson_name)?)
    }
}
