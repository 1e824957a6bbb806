//! CLI interface for Dojo.
//!
//! One subcommand per learner action. Every invocation resolves the active
//! lesson from the logs on disk, so commands can be run from any shell in any
//! order: `dojo start`, then `dojo n`, `dojo p`, `dojo a` as the lesson goes.
//!
//! Commands split into three groups:
//!
//! - Browsing: `lessons`, `search`, `history`, `review`.
//! - Navigating the active lesson: `start`, `p`, `c`, `n`, `j`, `a`, `stop`.
//! - Authoring and housekeeping: `create_lesson`, `prune_repodata`, `clean`.

mod authoring;
mod browse;
mod format;
mod navigate;

use clap::{Parser, Subcommand};

use crate::{catalog::Catalog, setup::Workspace, storage::Storage, tutor::Outcome};

use format::{format_completion, format_prompt};

/// Conda-Build Dojo guides you through debugging scenarios encountered during package building.
#[derive(Debug, Parser)]
#[command(name = "dojo", version, after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r"Workflow: working through a lesson
  1. dojo lessons
  2. dojo start numpy_patch
  3. dojo n            (repeat; `dojo p` goes back, `dojo j 3` jumps)
  4. dojo a            (jot down what you found on this step)
  5. dojo stop         (pick it up later with `dojo start numpy_patch`)

Finding lessons:
  dojo lessons --not-done
  dojo search patch";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show available lessons for this platform.
    Lessons {
        /// Show lessons for every platform.
        #[arg(long)]
        all: bool,

        /// Only lessons you have completed.
        #[arg(long, conflicts_with = "not_done")]
        done: bool,

        /// Only lessons you have not completed.
        #[arg(long)]
        not_done: bool,

        /// Show each author with the number of lessons they've written.
        #[arg(long, conflicts_with_all = ["done", "not_done"])]
        authors: bool,
    },

    /// Find lessons with a tag containing the given text.
    Search {
        /// Text to look for in lesson tags (case-insensitive).
        tag: String,
    },

    /// Show which lessons you've started, stopped, and completed.
    History,

    /// Show a whole lesson with every note you've taken on it.
    Review {
        /// Name of the lesson to review.
        lesson_name: String,
    },

    /// Start a lesson, or resume one you've started before.
    Start {
        /// Name of the lesson to start.
        lesson_name: String,
    },

    /// Stop the current lesson. Your progress is kept.
    Stop,

    /// (p)revious: go to the previous step of the current lesson.
    #[command(name = "p")]
    Previous {
        /// Include all info about the current lesson.
        #[arg(short, long)]
        verbose: bool,
    },

    /// (c)urrent: show the current step of the current lesson.
    #[command(name = "c")]
    Current {
        /// Include all info about the current lesson.
        #[arg(short, long)]
        verbose: bool,
    },

    /// (n)ext: go to the next step of the current lesson.
    #[command(name = "n")]
    Next {
        /// Include all info about the current lesson.
        #[arg(short, long)]
        verbose: bool,
    },

    /// (j)ump: go to a step of the current lesson, counting from 1.
    #[command(name = "j")]
    Jump {
        /// Step number to jump to.
        step: usize,

        /// Include all info about the current lesson.
        #[arg(short, long)]
        verbose: bool,
    },

    /// (a)dd: add a note to the current step.
    #[command(name = "a")]
    AddNote,

    /// Create a new lesson directory from the authoring template.
    #[command(name = "create_lesson", hide = true)]
    CreateLesson {
        /// Name of the lesson (letters, digits, `_` and `-`).
        #[arg(long)]
        name: String,

        /// Platform the lesson runs on (e.g. linux-64, osx-arm64, win-64).
        #[arg(long)]
        target_platform: Option<String>,

        /// Store a snapshot of the channel's current repodata.json with the lesson.
        #[arg(long, requires = "target_platform")]
        repodata_snapshot: bool,
    },

    /// Remove packages from a lesson's repodata snapshot.
    #[command(name = "prune_repodata", hide = true)]
    PruneRepodata {
        /// Lesson whose snapshot to prune.
        #[arg(long)]
        lesson: String,

        /// Snapshot subdir (e.g. noarch, linux-64).
        #[arg(long)]
        subdir: String,

        /// Package name to remove. Can be specified multiple times.
        #[arg(long = "package", required = true)]
        packages: Vec<String>,
    },

    /// Remove your history, progress, notes, feedstock clones and local channels.
    Clean,
}

/// Run the CLI, returning an error message on failure.
pub fn run(storage: &Storage, catalog: &Catalog, workspace: &Workspace) -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Lessons {
            all,
            done,
            not_done,
            authors,
        } => {
            if authors {
                browse::cmd_authors(catalog)
            } else {
                let filter = browse::LessonFilter {
                    all_platforms: all,
                    done: done.then_some(true).or(not_done.then_some(false)),
                };
                browse::cmd_lessons(storage, catalog, &filter)
            }
        }
        Command::Search { tag } => browse::cmd_search(catalog, &tag),
        Command::History => browse::cmd_history(storage),
        Command::Review { lesson_name } => {
            navigate::cmd_review(storage, catalog, workspace, &lesson_name)
        }
        Command::Start { lesson_name } => {
            navigate::cmd_start(storage, catalog, workspace, &lesson_name)
        }
        Command::Stop => navigate::cmd_move(storage, catalog, workspace, navigate::Move::Stop),
        Command::Previous { verbose } => navigate::cmd_move(
            storage,
            catalog,
            workspace,
            navigate::Move::Previous { verbose },
        ),
        Command::Current { verbose } => navigate::cmd_move(
            storage,
            catalog,
            workspace,
            navigate::Move::Current { verbose },
        ),
        Command::Next { verbose } => {
            navigate::cmd_move(storage, catalog, workspace, navigate::Move::Next { verbose })
        }
        Command::Jump { step, verbose } => navigate::cmd_move(
            storage,
            catalog,
            workspace,
            navigate::Move::Jump { step, verbose },
        ),
        Command::AddNote => {
            navigate::cmd_move(storage, catalog, workspace, navigate::Move::AddNote)
        }
        Command::CreateLesson {
            name,
            target_platform,
            repodata_snapshot,
        } => authoring::cmd_create_lesson(
            catalog,
            workspace,
            &name,
            target_platform.as_deref(),
            repodata_snapshot,
        ),
        Command::PruneRepodata {
            lesson,
            subdir,
            packages,
        } => authoring::cmd_prune_repodata(catalog, &lesson, &subdir, &packages),
        Command::Clean => authoring::cmd_clean(storage, workspace),
    }
}

/// Print what a navigation command did.
fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Step(view) => println!("{}", format_prompt(view)),
        Outcome::Completed(lesson) => println!("{}", format_completion(lesson)),
        Outcome::Stopped(lesson) => {
            eprintln!("Stopped \"{}\".", lesson.title);
            eprintln!("Pick it up again with: dojo start {}", lesson.name);
        }
        Outcome::Cancelled(lesson) => eprintln!("Left \"{}\" as it was.", lesson.title),
    }
}
