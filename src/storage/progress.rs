//! Progress storage: per-lesson step snapshots and notes.

use crate::model::ProgressRecord;

use super::{PROGRESS_FILE, Result, Storage, StorageError, append_jsonl, read_jsonl};

impl Storage {
    pub(super) fn read_progress(&self, lesson_name: &str) -> Result<Vec<ProgressRecord>> {
        read_jsonl(&self.lesson_dir(lesson_name).join(PROGRESS_FILE))
    }

    /// Appends to the lesson's progress log. The lesson directory must already exist.
    pub(super) fn write_progress(&self, record: &ProgressRecord) -> Result<()> {
        let dir = self.lesson_dir(&record.lesson_name);
        if !dir.is_dir() {
            return Err(StorageError::LessonDirNotFound(record.lesson_name.clone()));
        }
        tracing::debug!(
            lesson = %record.lesson_name,
            index = record.lesson_index,
            with_note = record.note.is_some(),
            "appending progress record"
        );
        append_jsonl(&dir.join(PROGRESS_FILE), record)
    }
}
