//! Browsing commands: lessons, search, history.

use std::collections::HashMap;

use crate::{
    catalog::Catalog,
    journal::HistoryLog,
    model::LessonSpec,
    storage::Storage,
};

use super::format::{LessonRow, format_authors, format_history, format_lessons, format_search};

/// Which lessons `dojo lessons` shows.
pub(super) struct LessonFilter {
    /// Include lessons for platforms other than this one.
    pub all_platforms: bool,
    /// `Some(true)` for completed lessons only, `Some(false)` for the rest.
    pub done: Option<bool>,
}

pub(super) fn cmd_lessons(
    storage: &Storage,
    catalog: &Catalog,
    filter: &LessonFilter,
) -> Result<(), String> {
    let lessons = catalog
        .list_all()
        .map_err(|e| format!("failed to list lessons: {e}"))?;
    let history = HistoryLog::new(storage);
    let host = host_platform();

    let mut rows = Vec::new();
    for (topic, lesson) in &lessons {
        if !filter.all_platforms && !runs_on(lesson, host) {
            continue;
        }
        let completed = history
            .has_completed(&lesson.name)
            .map_err(|e| format!("failed to read history: {e}"))?;
        if filter.done.is_some_and(|done| done != completed) {
            continue;
        }
        rows.push(LessonRow {
            topic,
            lesson,
            completed,
        });
    }

    if rows.is_empty() {
        println!("No lessons");
        if !filter.all_platforms {
            eprintln!("Lessons for other platforms are listed with --all.");
        }
        return Ok(());
    }

    println!("{}", format_lessons(&rows));
    Ok(())
}

pub(super) fn cmd_authors(catalog: &Catalog) -> Result<(), String> {
    let lessons = catalog
        .list_all()
        .map_err(|e| format!("failed to list lessons: {e}"))?;
    let lessons: Vec<LessonSpec> = lessons.into_iter().map(|(_, lesson)| lesson).collect();
    println!("{}", format_authors(&tally_authors(&lessons)));
    Ok(())
}

pub(super) fn cmd_search(catalog: &Catalog, tag: &str) -> Result<(), String> {
    let results = catalog
        .search(tag)
        .map_err(|e| format!("failed to search lessons: {e}"))?;
    println!("{}", format_search(tag, &results));
    Ok(())
}

pub(super) fn cmd_history(storage: &Storage) -> Result<(), String> {
    let records = HistoryLog::new(storage)
        .records()
        .map_err(|e| format!("failed to read history: {e}"))?;
    println!("{}", format_history(&records));
    Ok(())
}

/// Each author with their lesson count, most prolific first, then by name.
fn tally_authors(lessons: &[LessonSpec]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for author in lessons.iter().flat_map(|l| &l.authors) {
        *counts.entry(author.as_str()).or_default() += 1;
    }
    let mut tally: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(author, count)| (author.to_string(), count))
        .collect();
    tally.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    tally
}

fn runs_on(lesson: &LessonSpec, host: Option<&str>) -> bool {
    lesson.target_platform == "noarch" || host == Some(lesson.target_platform.as_str())
}

/// The conda subdir name of the machine we're running on.
fn host_platform() -> Option<&'static str> {
    platform_for(std::env::consts::OS, std::env::consts::ARCH)
}

fn platform_for(os: &str, arch: &str) -> Option<&'static str> {
    match (os, arch) {
        ("linux", "x86_64") => Some("linux-64"),
        ("linux", "aarch64") => Some("linux-aarch64"),
        ("linux", "powerpc64") => Some("linux-ppc64le"),
        ("linux", "s390x") => Some("linux-s390x"),
        ("macos", "x86_64") => Some("osx-64"),
        ("macos", "aarch64") => Some("osx-arm64"),
        ("windows", "x86_64") => Some("win-64"),
        ("windows", "x86") => Some("win-32"),
        _ => None,
    }
}
