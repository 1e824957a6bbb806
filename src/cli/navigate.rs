//! Navigation commands: start, stop, step moves, notes, review.

use crate::{
    catalog::Catalog,
    prompt::Terminal,
    setup::Workspace,
    storage::Storage,
    tutor::Tutor,
};

use super::{format::format_review, print_outcome};

/// A command on the active lesson.
#[derive(Debug, Clone, Copy)]
pub(super) enum Move {
    Previous { verbose: bool },
    Current { verbose: bool },
    Next { verbose: bool },
    Jump { step: usize, verbose: bool },
    AddNote,
    Stop,
}

pub(super) fn cmd_start(
    storage: &Storage,
    catalog: &Catalog,
    workspace: &Workspace,
    lesson_name: &str,
) -> Result<(), String> {
    let tutor = Tutor::new(catalog, storage, workspace);
    let outcome = tutor
        .start(lesson_name, &mut Terminal::stdio())
        .map_err(|e| e.to_string())?;
    print_outcome(&outcome);
    Ok(())
}

pub(super) fn cmd_move(
    storage: &Storage,
    catalog: &Catalog,
    workspace: &Workspace,
    command: Move,
) -> Result<(), String> {
    let tutor = Tutor::new(catalog, storage, workspace);
    let active = tutor.resolve_active().map_err(|e| e.to_string())?;

    let outcome = match command {
        Move::Previous { verbose } => tutor.previous(&active, verbose),
        Move::Current { verbose } => tutor.current(&active, verbose),
        Move::Next { verbose } => tutor.next(&active, verbose),
        Move::Jump { step, verbose } => tutor.jump(&active, step, verbose),
        Move::AddNote => tutor.add_note(&active, &mut Terminal::stdio()),
        Move::Stop => tutor.stop(&active),
    }
    .map_err(|e| e.to_string())?;

    print_outcome(&outcome);
    Ok(())
}

pub(super) fn cmd_review(
    storage: &Storage,
    catalog: &Catalog,
    workspace: &Workspace,
    lesson_name: &str,
) -> Result<(), String> {
    let review = Tutor::new(catalog, storage, workspace)
        .review(lesson_name)
        .map_err(|e| e.to_string())?;
    println!("{}", format_review(&review));
    Ok(())
}
