//! The `lesson.yaml` skeleton handed to lesson authors.

/// Renders the authoring template, pre-filling the target platform when known.
pub fn lesson_template(target_platform: Option<&str>) -> String {
    TEMPLATE.replace("{target_platform}", target_platform.unwrap_or(""))
}

const TEMPLATE: &str = r#"# Fill in every key below.
#
# Lessons that need a package index in a particular state (for example, one
# that is missing a dependency) set `modified_repodata: true` and keep their
# snapshots next to this file:
#
#   <lesson>/
#     lesson.yaml
#     repodata/
#       noarch/repodata.json
#       <target_platform>/repodata.json
#
# `dojo create_lesson --repodata-snapshot` downloads current snapshots, and
# `dojo prune_repodata` removes packages from them.

# Lesson title, e.g. "How to do a version bump".
title:

# Who wrote this lesson.
authors:
  - AUTHOR NAME

# Each objective completes the sentence
# "By the end of this lesson, the learner will be able to...".
objectives:
  - "EXAMPLE OBJECTIVE"

# Learners find lessons by searching these tags.
tags: []

# Package name and version the learner builds, e.g. numpy-1.16.0.
target_package:

# Platform the package is built for: linux-64, osx-64, osx-arm64, win-64 or noarch.
target_platform: {target_platform}

# HTTPS URL of the feedstock, e.g. https://github.com/AnacondaRecipes/tqdm-feedstock.git
feedstock_url:

# Commit checked out when the lesson starts: the learner's starting point.
commit:

# Whether the lesson runs against the snapshots under repodata/.
modified_repodata: false

# The steps the learner walks through, in order. A prompt can pose a question
# whose answer is the next prompt, or promise a hint one step later.
prompts:
  - EXAMPLE - Open the meta.yaml...
  - EXAMPLE - Increment the build number...
  - |
    EXAMPLE step spanning several lines.

      Indented lines are kept as written.
"#;
