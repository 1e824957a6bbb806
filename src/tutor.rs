//! The navigation engine: moving a learner through a lesson.
//!
//! Each command resolves the active lesson from the history log, reads the
//! current step from that lesson's progress log, appends whatever the move
//! produces, and hands back a view to render. Nothing is held between
//! invocations; the logs are the state.
//!
//! Preconditions are checked before anything is written, so a command that
//! fails leaves both logs untouched.

use std::{io, path::PathBuf};

use crate::{
    catalog::{CatalogError, LessonSource},
    journal::{HistoryLog, JournalError, ProgressLog},
    model::{HistoryAction, LessonSpec, Note},
    prompt::{Prompter, RestartChoice},
    setup::{Setup, SetupError},
    storage::Store,
};

/// Errors from navigation commands. All of them end the command.
#[derive(Debug, thiserror::Error)]
pub enum TutorError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Journal(#[from] JournalError),

    #[error("lesson setup failed: {0}")]
    ExternalSetupFailed(#[from] SetupError),

    #[error("invalid step {step}: {lesson} has steps 1 to {total}")]
    InvalidStep {
        lesson: String,
        step: usize,
        total: usize,
    },

    #[error(
        "corrupt progress for {lesson}: step index {index} is outside a {total}-step lesson"
    )]
    CorruptProgress {
        lesson: String,
        index: usize,
        total: usize,
    },

    #[error("failed to read input: {0}")]
    Input(#[from] io::Error),
}

pub type Result<T> = core::result::Result<T, TutorError>;

/// The lesson in progress and the learner's step within it.
#[derive(Debug, Clone)]
pub struct ActiveLesson {
    pub lesson: LessonSpec,
    pub index: usize,
}

/// Everything needed to render one step.
#[derive(Debug, Clone)]
pub struct StepView {
    pub lesson: LessonSpec,
    pub index: usize,
    pub notes: Vec<Note>,
    pub verbose: bool,
    pub feedstock_path: PathBuf,
    pub channel_path: Option<PathBuf>,
}

/// A whole lesson laid out for review: every prompt with its notes.
#[derive(Debug, Clone)]
pub struct Review {
    pub lesson: LessonSpec,
    /// Notes per step, indexed like the lesson's prompts.
    pub notes: Vec<Vec<Note>>,
    pub current: Option<usize>,
    pub completed: bool,
}

/// What a command did.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The learner is on a step.
    Step(StepView),
    /// The learner finished the last step.
    Completed(LessonSpec),
    /// The learner stopped the lesson.
    Stopped(LessonSpec),
    /// The learner declined to resume or restart.
    Cancelled(LessonSpec),
}

pub struct Tutor<'a> {
    lessons: &'a dyn LessonSource,
    store: &'a dyn Store,
    setup: &'a dyn Setup,
}

impl<'a> Tutor<'a> {
    pub fn new(lessons: &'a dyn LessonSource, store: &'a dyn Store, setup: &'a dyn Setup) -> Self {
        Self {
            lessons,
            store,
            setup,
        }
    }

    /// Resolves the active lesson and the learner's current step.
    ///
    /// Fails with [`JournalError::NoActiveLesson`] when nothing is in progress,
    /// and with [`TutorError::CorruptProgress`] when the recorded step does not
    /// exist in the lesson.
    pub fn resolve_active(&self) -> Result<ActiveLesson> {
        let name = HistoryLog::new(self.store).resolve_active()?;
        let lesson = self.lessons.load(&name)?;
        let index = self.current_index(&lesson)?;
        Ok(ActiveLesson { lesson, index })
    }

    /// Starts a lesson, or resumes/restarts it if it has progress.
    pub fn start(&self, lesson_name: &str, prompter: &mut dyn Prompter) -> Result<Outcome> {
        let lesson = self.lessons.load(lesson_name)?;
        let progress = ProgressLog::new(self.store, &lesson.name);
        let history = HistoryLog::new(self.store);

        if !progress.exists()? {
            let path = self.setup.prepare(&lesson)?;
            progress.create()?;
            history.append(&lesson.name, HistoryAction::Start)?;
            tracing::info!(lesson = %lesson.name, path = %path.display(), "started lesson");
            return Ok(Outcome::Step(self.view(lesson, 0, true)?));
        }

        match prompter.restart_choice(&lesson)? {
            RestartChoice::Resume => {
                let index = self.current_index(&lesson)?;
                self.setup.prepare(&lesson)?;
                history.append(&lesson.name, HistoryAction::Resume)?;
                tracing::info!(lesson = %lesson.name, index, "resumed lesson");
                Ok(Outcome::Step(self.view(lesson, index, true)?))
            }
            RestartChoice::StartOver => {
                self.setup.prepare(&lesson)?;
                history.append(&lesson.name, HistoryAction::StartOver)?;
                progress.reset_to(0)?;
                tracing::info!(lesson = %lesson.name, "restarted lesson");
                Ok(Outcome::Step(self.view(lesson, 0, true)?))
            }
            RestartChoice::Cancel => Ok(Outcome::Cancelled(lesson)),
        }
    }

    /// Steps back one step, staying on the first step if already there.
    pub fn previous(&self, active: &ActiveLesson, verbose: bool) -> Result<Outcome> {
        self.move_to(active, active.index.saturating_sub(1), verbose)
    }

    /// Shows the current step without recording anything.
    pub fn current(&self, active: &ActiveLesson, verbose: bool) -> Result<Outcome> {
        Ok(Outcome::Step(self.view(
            active.lesson.clone(),
            active.index,
            verbose,
        )?))
    }

    /// Advances one step. Past the last step, the lesson is completed.
    pub fn next(&self, active: &ActiveLesson, verbose: bool) -> Result<Outcome> {
        if active.index + 1 < active.lesson.step_count() {
            return self.move_to(active, active.index + 1, verbose);
        }

        HistoryLog::new(self.store).append(&active.lesson.name, HistoryAction::Completed)?;
        tracing::info!(lesson = %active.lesson.name, "completed lesson");
        self.cleanup(&active.lesson);
        Ok(Outcome::Completed(active.lesson.clone()))
    }

    /// Jumps to a one-based step number.
    pub fn jump(&self, active: &ActiveLesson, step: usize, verbose: bool) -> Result<Outcome> {
        let total = active.lesson.step_count();
        if step == 0 || step > total {
            return Err(TutorError::InvalidStep {
                lesson: active.lesson.name.clone(),
                step,
                total,
            });
        }
        self.move_to(active, step - 1, verbose)
    }

    /// Asks for a note and records it on the current step.
    ///
    /// A blank note is not recorded; the step is shown unchanged.
    pub fn add_note(&self, active: &ActiveLesson, prompter: &mut dyn Prompter) -> Result<Outcome> {
        let text = prompter.note()?;
        let text = text.trim();
        if text.is_empty() {
            tracing::info!(lesson = %active.lesson.name, "empty note, nothing recorded");
        } else {
            ProgressLog::new(self.store, &active.lesson.name)
                .append_step(active.index, Some(text))?;
        }
        Ok(Outcome::Step(self.view(
            active.lesson.clone(),
            active.index,
            false,
        )?))
    }

    /// Stops the active lesson. Progress is kept for a later resume.
    pub fn stop(&self, active: &ActiveLesson) -> Result<Outcome> {
        HistoryLog::new(self.store).append(&active.lesson.name, HistoryAction::Stop)?;
        tracing::info!(lesson = %active.lesson.name, "stopped lesson");
        self.cleanup(&active.lesson);
        Ok(Outcome::Stopped(active.lesson.clone()))
    }

    /// Lays out a lesson with every note taken on it. Reads only.
    pub fn review(&self, lesson_name: &str) -> Result<Review> {
        let lesson = self.lessons.load(lesson_name)?;
        let progress = ProgressLog::new(self.store, &lesson.name);

        let current = if progress.exists()? {
            Some(self.current_index(&lesson)?)
        } else {
            None
        };
        let notes = (0..lesson.step_count())
            .map(|i| progress.notes_for(i))
            .collect::<core::result::Result<Vec<_>, _>>()?;
        let completed = HistoryLog::new(self.store).has_completed(&lesson.name)?;

        Ok(Review {
            lesson,
            notes,
            current,
            completed,
        })
    }

    fn move_to(&self, active: &ActiveLesson, index: usize, verbose: bool) -> Result<Outcome> {
        ProgressLog::new(self.store, &active.lesson.name).append_step(index, None)?;
        tracing::debug!(lesson = %active.lesson.name, from = active.index, to = index, "moved");
        Ok(Outcome::Step(self.view(
            active.lesson.clone(),
            index,
            verbose,
        )?))
    }

    /// The lesson's recorded step, checked against its prompts.
    fn current_index(&self, lesson: &LessonSpec) -> Result<usize> {
        let (_, index) = ProgressLog::new(self.store, &lesson.name).current()?;
        let total = lesson.step_count();
        if index >= total {
            return Err(TutorError::CorruptProgress {
                lesson: lesson.name.clone(),
                index,
                total,
            });
        }
        Ok(index)
    }

    fn view(&self, lesson: LessonSpec, index: usize, verbose: bool) -> Result<StepView> {
        let notes = ProgressLog::new(self.store, &lesson.name).notes_for(index)?;
        Ok(StepView {
            feedstock_path: self.setup.feedstock_path(&lesson),
            channel_path: self.setup.channel_path(&lesson),
            lesson,
            index,
            notes,
            verbose,
        })
    }

    /// Lesson-stop cleanup. The lifecycle record is already written, so a
    /// failure here is reported and otherwise ignored.
    fn cleanup(&self, lesson: &LessonSpec) {
        if let Err(e) = self.setup.teardown(lesson) {
            tracing::warn!(lesson = %lesson.name, error = %e, "lesson cleanup failed");
        }
    }
}
