//! Lesson types: authored scenario definitions.

use serde::{Deserialize, Serialize};

/// A debugging scenario: metadata plus the ordered prompts a learner steps through.
///
/// Deserialized from a lesson's `lesson.yaml`. The `name` is not part of the document;
/// it comes from the directory the document lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonSpec {
    #[serde(skip)]
    pub name: String,

    pub title: String,

    /// What the learner will be able to do by the end of the lesson.
    #[serde(default)]
    pub objectives: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub authors: Vec<String>,

    /// Package name and version the learner builds (e.g. `numpy-1.16.0`).
    pub target_package: String,

    /// Platform subdir the package is built for (e.g. `linux-64`, `noarch`).
    pub target_platform: String,

    /// HTTPS URL of the feedstock repository.
    pub feedstock_url: String,

    /// The commit checked out as the lesson's starting point.
    pub commit: String,

    /// Whether the lesson runs against a prepared package-index snapshot.
    #[serde(default)]
    pub modified_repodata: bool,

    pub prompts: Vec<String>,
}

impl LessonSpec {
    /// Number of steps in the lesson.
    pub fn step_count(&self) -> usize {
        self.prompts.len()
    }

    /// The feedstock's repository name: the last URL segment without `.git`.
    ///
    /// `https://github.com/AnacondaRecipes/tqdm-feedstock.git` → `tqdm-feedstock`.
    pub fn repo_name(&self) -> &str {
        let last = self
            .feedstock_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();
        last.strip_suffix(".git").unwrap_or(last)
    }
}
