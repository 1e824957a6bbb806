//! The history log: which lessons were started, stopped, and completed.

use jiff::Timestamp;

use crate::{
    model::{HistoryAction, HistoryRecord},
    storage::Store,
};

use super::{JournalError, Result};

/// The shared lifecycle log across all lessons.
pub struct HistoryLog<'a> {
    store: &'a dyn Store,
}

impl<'a> HistoryLog<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Records a lifecycle transition, stamped with the current time.
    pub fn append(&self, lesson_name: &str, action: HistoryAction) -> Result<HistoryRecord> {
        let record = HistoryRecord::new(lesson_name, action, Timestamp::now());
        self.store.append_history(&record)?;
        Ok(record)
    }

    /// The active lesson's name.
    ///
    /// Only the final record counts: a lesson started earlier and never stopped
    /// is not active if anything inactive was recorded after it.
    pub fn resolve_active(&self) -> Result<String> {
        let records = self.store.load_history()?;
        match records.last() {
            Some(last) if last.active => Ok(last.lesson_name.clone()),
            _ => Err(JournalError::NoActiveLesson),
        }
    }

    /// Whether the lesson has ever been completed.
    pub fn has_completed(&self, lesson_name: &str) -> Result<bool> {
        Ok(self
            .store
            .load_history()?
            .iter()
            .any(|r| r.lesson_name == lesson_name && r.completed))
    }

    /// Every record, oldest first.
    pub fn records(&self) -> Result<Vec<HistoryRecord>> {
        Ok(self.store.load_history()?)
    }
}
