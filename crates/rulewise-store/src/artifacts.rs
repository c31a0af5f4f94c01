//! Artifact persistence: one `.md` / `.parsed.json` / `.rules.json` triple per document.

use std::path::{Path, PathBuf};

use rulewise_core::{ArtifactPaths, ParsedRuleSet, RenderedRuleSet};
use tracing::{debug, warn};

use crate::StoreError;

/// Writes artifacts under an output root, mirroring input-relative paths.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Artifact paths for a document identified by its input-relative path.
    pub fn paths_for(&self, relative: &Path) -> ArtifactPaths {
        ArtifactPaths::under(&self.root, relative)
    }

    /// Write all three artifacts for one document, overwriting earlier runs.
    ///
    /// Each artifact is staged in a sibling `.tmp` file and renamed into place
    /// only after all three are staged. On failure the staged files and every
    /// artifact path for the document are removed, so a failed write leaves
    /// none of the document's artifacts behind.
    pub async fn write(
        &self,
        relative: &Path,
        parsed: &ParsedRuleSet,
        rendered: &RenderedRuleSet,
    ) -> Result<ArtifactPaths, StoreError> {
        let paths = self.paths_for(relative);
        let markdown = rendered.to_prose();
        let parsed_json = serde_json::to_string_pretty(parsed)?;
        let rules_json = serde_json::to_string_pretty(rendered)?;

        if let Some(parent) = paths.markdown.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let staged = [
            (&paths.markdown, markdown.as_str()),
            (&paths.parsed_json, parsed_json.as_str()),
            (&paths.rules_json, rules_json.as_str()),
        ];

        let mut temps: Vec<PathBuf> = Vec::with_capacity(staged.len());
        for (path, contents) in staged {
            let temp = staging_path(path);
            if let Err(e) = write_file(&temp, contents).await {
                remove_all(&temps[..]).await;
                return Err(e);
            }
            temps.push(temp);
        }

        for (temp, (path, _)) in temps.iter().zip(staged) {
            if let Err(source) = tokio::fs::rename(temp, path).await {
                warn!(path = %path.display(), error = %source, "rolling back artifacts");
                remove_all(&temps[..]).await;
                remove_all(&paths.all()[..]).await;
                return Err(StoreError::Write {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }

        debug!(path = %paths.markdown.display(), "wrote artifacts");
        Ok(paths)
    }

    /// Read the generated prose for a document, if it exists.
    pub async fn read_markdown(&self, relative: &Path) -> Result<String, StoreError> {
        let path = self.paths_for(relative).markdown;
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| StoreError::Read { path, source })
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Best-effort cleanup; missing files and directories are skipped.
async fn remove_all<P: AsRef<Path>>(paths: &[P]) {
    for path in paths {
        let _ = tokio::fs::remove_file(path).await;
    }
}

async fn write_file(path: &Path, contents: &str) -> Result<(), StoreError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })
}
