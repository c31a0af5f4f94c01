//! Output layout: where the artifacts for a document live.
//!
//! A document at `<input>/<dir>/<name>.<ext>` produces three artifacts under the
//! output root, mirroring its relative path with the final extension removed:
//!
//! - `<output>/<dir>/<name>.md`
//! - `<output>/<dir>/<name>.parsed.json`
//! - `<output>/<dir>/<name>.rules.json`

use std::path::{Path, PathBuf};

pub const MARKDOWN_SUFFIX: &str = "md";
pub const PARSED_SUFFIX: &str = "parsed.json";
pub const RULES_SUFFIX: &str = "rules.json";

/// Strip the final extension from the file name of a relative path.
///
/// Only the last extension is removed: `a.b.txt` → `a.b`. Names without an
/// extension, and dotfiles such as `.rules`, are returned unchanged.
pub fn artifact_stem(relative: &Path) -> PathBuf {
    match relative.file_stem() {
        Some(stem) => relative.with_file_name(stem),
        None => relative.to_path_buf(),
    }
}

/// Append a suffix to a stem without treating dots in the stem as an extension.
pub fn with_suffix(stem: &Path, suffix: &str) -> PathBuf {
    let mut name = stem.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// The three artifact paths for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub markdown: PathBuf,
    pub parsed_json: PathBuf,
    pub rules_json: PathBuf,
}

impl ArtifactPaths {
    /// Resolve artifact paths for `relative` (a path relative to the input root).
    pub fn under(output_root: &Path, relative: &Path) -> Self {
        let stem = output_root.join(artifact_stem(relative));
        Self {
            markdown: with_suffix(&stem, MARKDOWN_SUFFIX),
            parsed_json: with_suffix(&stem, PARSED_SUFFIX),
            rules_json: with_suffix(&stem, RULES_SUFFIX),
        }
    }

    pub fn all(&self) -> [&Path; 3] {
        [&self.markdown, &self.parsed_json, &self.rules_json]
    }
}
