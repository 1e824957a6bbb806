//! History storage: append and load lifecycle events.

use crate::model::HistoryRecord;

use super::{Result, Storage, append_jsonl, read_jsonl};

impl Storage {
    pub(super) fn read_history(&self) -> Result<Vec<HistoryRecord>> {
        read_jsonl(&self.history_path())
    }

    pub(super) fn write_history(&self, record: &HistoryRecord) -> Result<()> {
        tracing::debug!(
            lesson = %record.lesson_name,
            action = record.action.as_str(),
            "appending history record"
        );
        append_jsonl(&self.history_path(), record)
    }
}
