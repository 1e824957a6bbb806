//! The lesson catalog: authored lesson content on disk.
//!
//! ```text
//! <root>/curriculum.yaml          # topics: { <topic>: [<lesson_name>, ...] }
//! <lessons>/<name>/lesson.yaml    # One lesson definition
//! ```
//!
//! The catalog only reads. Loading the same lesson twice yields the same lesson.

mod template;

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::model::LessonSpec;

pub use template::lesson_template;

/// Errors loading or creating lesson content.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("lesson not found: {0}")]
    LessonNotFound(String),

    #[error("invalid lesson name '{0}': use only letters, digits, '_' and '-'")]
    InvalidName(String),

    #[error("lesson already exists: {0}")]
    LessonExists(String),

    #[error("invalid lesson {name}: {reason}")]
    InvalidLesson { name: String, reason: String },

    #[error("curriculum not found at {0}")]
    CurriculumNotFound(PathBuf),

    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = core::result::Result<T, CatalogError>;

/// Anything lessons can be loaded from by name.
pub trait LessonSource {
    fn load(&self, lesson_name: &str) -> Result<LessonSpec>;
}

/// Lesson content rooted at a lessons directory, plus the curriculum index.
pub struct Catalog {
    lessons_dir: PathBuf,
    curriculum_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct Curriculum {
    #[serde(default)]
    topics: BTreeMap<String, Vec<String>>,
}

impl Catalog {
    pub fn new(lessons_dir: impl Into<PathBuf>, curriculum_path: impl Into<PathBuf>) -> Self {
        Self {
            lessons_dir: lessons_dir.into(),
            curriculum_path: curriculum_path.into(),
        }
    }

    /// The directory holding a lesson's content.
    pub fn lesson_dir(&self, lesson_name: &str) -> PathBuf {
        self.lessons_dir.join(lesson_name)
    }

    /// Every lesson in the curriculum, paired with its topic.
    ///
    /// Topics come out sorted; lessons keep their curriculum order within a topic.
    pub fn list_all(&self) -> Result<Vec<(String, LessonSpec)>> {
        let curriculum = self.load_curriculum()?;
        let mut lessons = Vec::new();
        for (topic, names) in curriculum.topics {
            for name in names {
                lessons.push((topic.clone(), self.load(&name)?));
            }
        }
        Ok(lessons)
    }

    /// Lessons with a tag containing `query`, case-insensitively.
    ///
    /// Yields one `(lesson, tag)` pair per matching tag, sorted by title then name.
    /// No matches is an empty result, not an error.
    pub fn search(&self, query: &str) -> Result<Vec<(LessonSpec, String)>> {
        let query = query.to_lowercase();
        let mut results = Vec::new();
        for name in self.lesson_names()? {
            let lesson = self.load(&name)?;
            for tag in &lesson.tags {
                if tag.to_lowercase().contains(&query) {
                    results.push((lesson.clone(), tag.clone()));
                }
            }
        }
        results.sort_by(|(a, _), (b, _)| a.title.cmp(&b.title).then_with(|| a.name.cmp(&b.name)));
        Ok(results)
    }

    /// Names of every directory under the lessons root that holds a `lesson.yaml`, sorted.
    pub fn lesson_names(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.lessons_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.path().join(LESSON_FILE).is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Creates a new lesson directory holding the authoring template.
    ///
    /// Returns the path of the new `lesson.yaml`.
    pub fn create(&self, lesson_name: &str, target_platform: Option<&str>) -> Result<PathBuf> {
        validate_name(lesson_name)?;
        let dir = self.lesson_dir(lesson_name);
        if dir.exists() {
            return Err(CatalogError::LessonExists(lesson_name.to_string()));
        }
        fs::create_dir_all(&dir)?;
        let path = dir.join(LESSON_FILE);
        fs::write(&path, lesson_template(target_platform))?;
        tracing::info!(lesson = lesson_name, path = %path.display(), "created lesson template");
        Ok(path)
    }

    fn load_curriculum(&self) -> Result<Curriculum> {
        let contents = match fs::read_to_string(&self.curriculum_path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CatalogError::CurriculumNotFound(
                    self.curriculum_path.clone(),
                ));
            }
            Err(e) => return Err(e.into()),
        };
        parse_yaml(&self.curriculum_path, &contents)
    }
}

impl LessonSource for Catalog {
    fn load(&self, lesson_name: &str) -> Result<LessonSpec> {
        validate_name(lesson_name)?;
        let path = self.lesson_dir(lesson_name).join(LESSON_FILE);
        let contents = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CatalogError::LessonNotFound(lesson_name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let mut lesson: LessonSpec = parse_yaml(&path, &contents)?;
        lesson.name = lesson_name.to_string();

        if lesson.prompts.is_empty() {
            return Err(CatalogError::InvalidLesson {
                name: lesson.name,
                reason: "a lesson needs at least one prompt".into(),
            });
        }
        Ok(lesson)
    }
}

const LESSON_FILE: &str = "lesson.yaml";

/// Checks that a lesson name is a plain slug: it doubles as a directory name.
pub fn validate_name(lesson_name: &str) -> Result<()> {
    let valid = !lesson_name.is_empty()
        && lesson_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(CatalogError::InvalidName(lesson_name.to_string()))
    }
}

fn parse_yaml<T: serde::de::DeserializeOwned>(path: &Path, contents: &str) -> Result<T> {
    serde_yaml::from_str(contents).map_err(|source| CatalogError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use tempfile::TempDir;

    /// Writes a minimal valid lesson document.
    pub(crate) fn write_lesson(lessons_dir: &Path, name: &str, tags: &[&str], prompts: usize) {
        let dir = lessons_dir.join(name);
        fs::create_dir_all(&dir).unwrap();
        let tags = tags
            .iter()
            .map(|t| format!("\"{t}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let prompts = (1..=prompts)
            .map(|i| format!("  - Prompt {i}\n"))
            .collect::<String>();
        let yaml = format!(
            "title: Lesson {name}\n\
             authors: [Paul, Ana]\n\
             objectives: [Learn {name}]\n\
             tags: [{tags}]\n\
             target_package: pkg-1.0\n\
             target_platform: noarch\n\
             feedstock_url: https://github.com/AnacondaRecipes/{name}-feedstock.git\n\
             commit: abc1234\n\
             prompts:\n{prompts}"
        );
        fs::write(dir.join(LESSON_FILE), yaml).unwrap();
    }

    fn test_catalog() -> (TempDir, Catalog) {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::new(dir.path().join("lessons"), dir.path().join("curriculum.yaml"));
        (dir, catalog)
    }

    #[test]
    fn load_sets_name_from_directory() {
        let (dir, catalog) = test_catalog();
        write_lesson(&dir.path().join("lessons"), "numpy_patch", &["patch"], 3);

        let lesson = catalog.load("numpy_patch").unwrap();

        assert_eq!(lesson.name, "numpy_patch");
        assert_eq!(lesson.step_count(), 3);
        assert_eq!(lesson.authors, ["Paul", "Ana"]);
    }

    #[test]
    fn load_is_idempotent() {
        let (dir, catalog) = test_catalog();
        write_lesson(&dir.path().join("lessons"), "numpy_patch", &["patch"], 3);

        assert_eq!(
            catalog.load("numpy_patch").unwrap(),
            catalog.load("numpy_patch").unwrap()
        );
    }

    #[test]
    fn load_missing_lesson_fails() {
        let (_dir, catalog) = test_catalog();
        let err = catalog.load("nope").unwrap_err();
        assert!(matches!(err, CatalogError::LessonNotFound(name) if name == "nope"));
    }

    #[test]
    fn load_rejects_path_like_names() {
        let (_dir, catalog) = test_catalog();
        for name in ["../etc", "a/b", "", "has space"] {
            let err = catalog.load(name).unwrap_err();
            assert!(matches!(err, CatalogError::InvalidName(_)), "{name}");
        }
    }

    #[test]
    fn load_rejects_lesson_without_prompts() {
        let (dir, catalog) = test_catalog();
        write_lesson(&dir.path().join("lessons"), "empty", &[], 0);
        // `prompts:` with nothing under it parses as null; make it an explicit empty list.
        let path = dir.path().join("lessons").join("empty").join(LESSON_FILE);
        let yaml = fs::read_to_string(&path).unwrap().replace("prompts:\n", "prompts: []\n");
        fs::write(&path, yaml).unwrap();

        let err = catalog.load("empty").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidLesson { .. }));
    }

    #[test]
    fn load_malformed_yaml_reports_path() {
        let (dir, catalog) = test_catalog();
        let lesson_dir = dir.path().join("lessons").join("broken");
        fs::create_dir_all(&lesson_dir).unwrap();
        fs::write(lesson_dir.join(LESSON_FILE), "title: [unclosed").unwrap();

        let err = catalog.load("broken").unwrap_err();
        assert!(matches!(err, CatalogError::Yaml { .. }));
    }

    #[test]
    fn search_matches_substring_case_insensitively() {
        let (dir, catalog) = test_catalog();
        let lessons = dir.path().join("lessons");
        write_lesson(&lessons, "numpy_patch", &["patch", "version"], 3);
        write_lesson(&lessons, "tqdm_bump", &["Version"], 2);

        let results = catalog.search("VER").unwrap();
        let names: Vec<(&str, &str)> = results
            .iter()
            .map(|(l, t)| (l.name.as_str(), t.as_str()))
            .collect();
        assert_eq!(names, [("numpy_patch", "version"), ("tqdm_bump", "Version")]);

        assert!(catalog.search("zzz").unwrap().is_empty());
    }

    #[test]
    fn search_yields_one_pair_per_matching_tag() {
        let (dir, catalog) = test_catalog();
        write_lesson(
            &dir.path().join("lessons"),
            "numpy_patch",
            &["patch", "patching"],
            1,
        );

        assert_eq!(catalog.search("patch").unwrap().len(), 2);
    }

    #[test]
    fn search_without_lessons_dir_is_empty() {
        let (_dir, catalog) = test_catalog();
        assert!(catalog.search("ver").unwrap().is_empty());
    }

    #[test]
    fn list_all_groups_by_topic() {
        let (dir, catalog) = test_catalog();
        let lessons = dir.path().join("lessons");
        write_lesson(&lessons, "numpy_patch", &[], 3);
        write_lesson(&lessons, "tqdm_bump", &[], 2);
        write_lesson(&lessons, "zlib_pin", &[], 1);
        fs::write(
            dir.path().join("curriculum.yaml"),
            "topics:\n  Versions:\n    - tqdm_bump\n    - numpy_patch\n  Pinning:\n    - zlib_pin\n",
        )
        .unwrap();

        let listed: Vec<(String, String)> = catalog
            .list_all()
            .unwrap()
            .into_iter()
            .map(|(topic, lesson)| (topic, lesson.name))
            .collect();

        assert_eq!(
            listed,
            [
                ("Pinning".to_string(), "zlib_pin".to_string()),
                ("Versions".to_string(), "tqdm_bump".to_string()),
                ("Versions".to_string(), "numpy_patch".to_string()),
            ]
        );
    }

    #[test]
    fn list_all_without_curriculum_fails() {
        let (_dir, catalog) = test_catalog();
        let err = catalog.list_all().unwrap_err();
        assert!(matches!(err, CatalogError::CurriculumNotFound(_)));
    }

    #[test]
    fn list_all_with_unknown_lesson_fails() {
        let (dir, catalog) = test_catalog();
        fs::write(
            dir.path().join("curriculum.yaml"),
            "topics:\n  Versions:\n    - ghost\n",
        )
        .unwrap();

        let err = catalog.list_all().unwrap_err();
        assert!(matches!(err, CatalogError::LessonNotFound(_)));
    }

    #[test]
    fn create_writes_template() {
        let (dir, catalog) = test_catalog();

        let path = catalog.create("new_lesson", Some("osx-64")).unwrap();

        assert_eq!(
            path,
            dir.path().join("lessons").join("new_lesson").join(LESSON_FILE)
        );
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("target_platform: osx-64"));
        assert!(contents.contains("prompts:"));
    }

    #[test]
    fn create_existing_lesson_fails() {
        let (dir, catalog) = test_catalog();
        write_lesson(&dir.path().join("lessons"), "numpy_patch", &[], 1);

        let err = catalog.create("numpy_patch", None).unwrap_err();
        assert!(matches!(err, CatalogError::LessonExists(_)));
    }

    #[test]
    fn create_invalid_name_fails_without_touching_disk() {
        let (dir, catalog) = test_catalog();

        let err = catalog.create("bad name!", None).unwrap_err();

        assert!(matches!(err, CatalogError::InvalidName(_)));
        assert!(!dir.path().join("lessons").exists());
    }
}
