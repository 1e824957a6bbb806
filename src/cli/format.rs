//! Output formatting for CLI display.

use jiff::Timestamp;

use crate::model::{HistoryRecord, LessonSpec, Note};
use crate::tutor::{Review, StepView};

const BANNER: &str = "############### CONDA-BUILD DOJO ###############";
const RULE: &str = "################################################";
const OPTIONS: &str = "OPTIONS: dojo (p)revious step; (c)urrent step; (n)ext step; \
                       (j)ump to step; (a)dd note; (stop) lesson.";

/// A row of the `lessons` table.
pub(super) struct LessonRow<'a> {
    pub topic: &'a str,
    pub lesson: &'a LessonSpec,
    pub completed: bool,
}

fn format_timestamp(ts: Timestamp) -> String {
    ts.strftime("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Render one step: the banner, lesson details when verbose, the prompt, its notes.
pub(super) fn format_prompt(view: &StepView) -> String {
    let lesson = &view.lesson;
    let mut out = format!("{BANNER}\n");

    if view.verbose {
        out.push_str(&format!("\nTitle: {}\nObjectives:\n", lesson.title));
        for objective in &lesson.objectives {
            out.push_str(&format!("  - {objective}\n"));
        }
        out.push_str(&format!(
            "Recipe path: {}\n",
            view.feedstock_path.join("recipe").display()
        ));
        if let Some(channel) = &view.channel_path {
            out.push_str(&format!("Local channel: {}\n", channel.display()));
        }
    }

    let prompt = lesson.prompts.get(view.index).map_or("", String::as_str);
    out.push_str(&format!(
        "\n(Step {} of {}) {prompt}\n",
        view.index + 1,
        lesson.step_count()
    ));
    out.push_str(&format_notes(&view.notes));

    out.push_str(&format!("\n{OPTIONS}\n{RULE}"));
    out
}

fn format_notes(notes: &[Note]) -> String {
    if notes.is_empty() {
        return String::new();
    }
    let mut out = String::from("\nNotes:\n");
    for note in notes {
        let mut lines = note.content.lines();
        let first = lines.next().unwrap_or_default();
        out.push_str(&format!("  [{}] {first}\n", format_timestamp(note.date)));
        for line in lines {
            out.push_str(&format!("    {line}\n"));
        }
    }
    out
}

pub(super) fn format_completion(lesson: &LessonSpec) -> String {
    format!(
        "{BANNER}\n\nCongratulations! You completed \"{}\" ({}).\n\
         Find another with `dojo lessons --not-done`.\n{RULE}",
        lesson.title, lesson.name
    )
}

/// Render a lesson with its notes, marking where the learner is.
pub(super) fn format_review(review: &Review) -> String {
    let lesson = &review.lesson;
    let status = match (review.completed, review.current) {
        (true, _) => "completed".to_string(),
        (false, Some(index)) => format!("in progress, on step {}", index + 1),
        (false, None) => "not started".to_string(),
    };

    let mut out = format!("{BANNER}\n\nTitle: {} ({status})\n", lesson.title);
    for (index, prompt) in lesson.prompts.iter().enumerate() {
        let marker = if review.current == Some(index) { ">" } else { " " };
        out.push_str(&format!("\n{marker} (Step {}) {prompt}\n", index + 1));
        if let Some(notes) = review.notes.get(index) {
            out.push_str(&format_notes(notes));
        }
    }
    out.push_str(RULE);
    out
}

pub(super) fn format_lessons(rows: &[LessonRow<'_>]) -> String {
    let headers = ["Topic", "Title", "Lesson name", "Platform", "Author(s)", "Tags", "Done"];
    let cells = rows
        .iter()
        .map(|row| {
            vec![
                row.topic.to_string(),
                row.lesson.title.clone(),
                row.lesson.name.clone(),
                row.lesson.target_platform.clone(),
                row.lesson.authors.join(", "),
                row.lesson.tags.join("; "),
                if row.completed { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    format_table(&headers, &cells)
}

pub(super) fn format_search(query: &str, results: &[(LessonSpec, String)]) -> String {
    if results.is_empty() {
        return format!("No results for: \"{query}\"");
    }
    let headers = ["Title", "Lesson name", "Objectives", "Matching tag"];
    let cells = results
        .iter()
        .map(|(lesson, tag)| {
            vec![
                lesson.title.clone(),
                lesson.name.clone(),
                lesson.objectives.join(" * "),
                tag.clone(),
            ]
        })
        .collect::<Vec<_>>();
    format!(
        "Search results for: \"{query}\"\n\n{}",
        format_table(&headers, &cells)
    )
}

pub(super) fn format_authors(tally: &[(String, usize)]) -> String {
    let mut out = String::from("Authors and the number of lessons they've written\n");
    out.push_str("=================================================\n");
    for (author, count) in tally {
        out.push_str(&format!("{author}: {count}\n"));
    }
    out
}

pub(super) fn format_history(records: &[HistoryRecord]) -> String {
    if records.is_empty() {
        return "You have no lesson history. Start a lesson to begin one.".to_string();
    }
    let headers = ["Timestamp", "Lesson name", "Action", "Active", "Completed"];
    let cells = records
        .iter()
        .map(|r| {
            vec![
                format_timestamp(r.timestamp),
                r.lesson_name.clone(),
                r.action.as_str().to_string(),
                r.active.to_string(),
                r.completed.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    format_table(&headers, &cells)
}

/// Left-aligned columns, two spaces apart, with a dashed rule under the header.
fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut lines = vec![
        table_line(headers.iter().copied(), &widths),
        table_line(rule.iter().map(String::as_str), &widths),
    ];
    for row in rows {
        lines.push(table_line(row.iter().map(String::as_str), &widths));
    }
    lines.join("\n")
}

fn table_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use crate::model::HistoryAction;

    fn lesson() -> LessonSpec {
        LessonSpec {
            name: "numpy_patch".into(),
            title: "Patch numpy".into(),
            objectives: vec!["Apply a patch".into(), "Rebuild".into()],
            tags: vec!["patch".into(), "version".into()],
            authors: vec!["Paul".into(), "Ana".into()],
            target_package: "numpy-1.16.0".into(),
            target_platform: "linux-64".into(),
            feedstock_url: "https://github.com/AnacondaRecipes/numpy-feedstock.git".into(),
            commit: "abc1234".into(),
            modified_repodata: false,
            prompts: vec!["Open meta.yaml".into(), "Add the patch".into()],
        }
    }

    fn view(verbose: bool, notes: Vec<Note>) -> StepView {
        StepView {
            lesson: lesson(),
            index: 1,
            notes,
            verbose,
            feedstock_path: PathBuf::from("/dojo/training_feedstocks/numpy-feedstock"),
            channel_path: None,
        }
    }

    fn ts() -> Timestamp {
        "2024-03-05T14:07:09Z".parse().unwrap()
    }

    #[test]
    fn step_shows_position_and_prompt() {
        let out = format_prompt(&view(false, vec![]));

        assert!(out.starts_with(BANNER));
        assert!(out.contains("(Step 2 of 2) Add the patch"));
        assert!(out.contains("OPTIONS:"));
        assert!(!out.contains("Title:"));
        assert!(!out.contains("Notes:"));
    }

    #[test]
    fn verbose_step_shows_lesson_details() {
        let out = format_prompt(&view(true, vec![]));

        assert!(out.contains("Title: Patch numpy"));
        assert!(out.contains("  - Apply a patch\n  - Rebuild"));
        assert!(out.contains("Recipe path: /dojo/training_feedstocks/numpy-feedstock/recipe"));
        assert!(!out.contains("Local channel"));
    }

    #[test]
    fn verbose_step_shows_channel_when_present() {
        let mut view = view(true, vec![]);
        view.channel_path = Some(PathBuf::from("/dojo/channels/numpy_patch"));

        assert!(format_prompt(&view).contains("Local channel: /dojo/channels/numpy_patch"));
    }

    #[test]
    fn step_lists_notes_with_utc_dates() {
        let notes = vec![Note {
            date: ts(),
            content: "first line\nsecond line".into(),
        }];
        let out = format_prompt(&view(false, notes));

        assert!(out.contains("Notes:\n  [2024-03-05 14:07:09 UTC] first line\n    second line\n"));
    }

    #[test]
    fn completion_names_the_lesson() {
        let out = format_completion(&lesson());
        assert!(out.contains("You completed \"Patch numpy\" (numpy_patch)"));
    }

    #[test]
    fn review_marks_current_step() {
        let review = Review {
            lesson: lesson(),
            notes: vec![
                vec![Note {
                    date: ts(),
                    content: "meta.yaml is in recipe/".into(),
                }],
                vec![],
            ],
            current: Some(1),
            completed: false,
        };
        let out = format_review(&review);

        assert!(out.contains("(in progress, on step 2)"));
        assert!(out.contains("  (Step 1) Open meta.yaml\n\nNotes:\n  [2024-03-05 14:07:09 UTC] meta.yaml"));
        assert!(out.contains("> (Step 2) Add the patch"));
    }

    #[test]
    fn review_of_unstarted_lesson() {
        let review = Review {
            lesson: lesson(),
            notes: vec![vec![], vec![]],
            current: None,
            completed: false,
        };
        let out = format_review(&review);

        assert!(out.contains("(not started)"));
        assert!(!out.contains('>'));
    }

    #[test]
    fn search_without_results() {
        assert_eq!(format_search("zzz", &[]), "No results for: \"zzz\"");
    }

    #[test]
    fn search_lists_matching_tag() {
        let out = format_search("ver", &[(lesson(), "version".into())]);
        let last = out.lines().last().unwrap();

        assert!(out.starts_with("Search results for: \"ver\""));
        assert!(last.starts_with("Patch numpy"));
        assert!(last.contains("Apply a patch * Rebuild"));
        assert!(last.ends_with("version"));
    }

    #[test]
    fn lessons_table_aligns_columns() {
        let lesson = lesson();
        let rows = [LessonRow {
            topic: "patching",
            lesson: &lesson,
            completed: true,
        }];
        let out = format_lessons(&rows);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Topic     Title"));
        assert!(lines[1].starts_with("--------  -----------"));
        assert!(lines[2].starts_with("patching  Patch numpy  numpy_patch"));
        assert!(lines[2].contains("Paul, Ana"));
        assert!(lines[2].ends_with("yes"));
    }

    #[test]
    fn authors_tally() {
        let out = format_authors(&[("Paul".into(), 3), ("Ana".into(), 1)]);
        assert!(out.ends_with("Paul: 3\nAna: 1\n"));
    }

    #[test]
    fn empty_history() {
        assert!(format_history(&[]).starts_with("You have no lesson history"));
    }

    #[test]
    fn history_rows() {
        let record = HistoryRecord::new("numpy_patch", HistoryAction::StartOver, ts());
        let out = format_history(&[record]);
        let row = out.lines().nth(2).unwrap();

        assert!(row.starts_with("2024-03-05 14:07:09 UTC  numpy_patch  start_over"));
        assert!(row.ends_with("true    false"));
    }
}
