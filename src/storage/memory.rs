//! In-memory store for tests.

use std::{cell::RefCell, collections::HashMap};

use crate::model::{HistoryRecord, ProgressRecord};

use super::{Result, Store};

#[derive(Default)]
pub struct MemoryStore {
    history: RefCell<Vec<HistoryRecord>>,
    progress: RefCell<HashMap<String, Vec<ProgressRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<HistoryRecord> {
        self.history.borrow().clone()
    }

    pub fn progress(&self, lesson_name: &str) -> Vec<ProgressRecord> {
        self.progress
            .borrow()
            .get(lesson_name)
            .cloned()
            .unwrap_or_default()
    }
}

impl Store for MemoryStore {
    fn load_history(&self) -> Result<Vec<HistoryRecord>> {
        Ok(self.history())
    }

    fn append_history(&self, record: &HistoryRecord) -> Result<()> {
        self.history.borrow_mut().push(record.clone());
        Ok(())
    }

    fn load_progress(&self, lesson_name: &str) -> Result<Vec<ProgressRecord>> {
        Ok(self.progress(lesson_name))
    }

    fn append_progress(&self, record: &ProgressRecord) -> Result<()> {
        self.progress
            .borrow_mut()
            .entry(record.lesson_name.clone())
            .or_default()
            .push(record.clone());
        Ok(())
    }
}
