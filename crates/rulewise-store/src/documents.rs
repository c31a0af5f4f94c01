//! Input discovery: every visible regular file under the input root.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::StoreError;

/// A discovered input file, not yet read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSource {
    /// Full path on disk.
    pub path: PathBuf,
    /// Path relative to the input root; the document's stable identifier.
    pub relative_path: PathBuf,
}

/// Raw document text plus its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub relative_path: PathBuf,
    pub text: String,
}

impl DocumentSource {
    /// Read the whole file as UTF-8 text.
    pub async fn load(&self) -> Result<Document, StoreError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| StoreError::Read {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.relative_path.display(), bytes = text.len(), "loaded document");
        Ok(Document {
            relative_path: self.relative_path.clone(),
            text,
        })
    }
}

/// Recursively list regular files under `root`, in a stable order.
///
/// Entries whose name starts with `.` (files or directories) are skipped, as
/// are symlinks. Directories are walked depth-first with entries sorted by
/// file name.
pub fn discover_documents(root: &Path) -> Result<Vec<DocumentSource>, StoreError> {
    if !root.is_dir() {
        return Err(StoreError::InputNotFound(root.to_path_buf()));
    }

    let mut sources = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = entry.map_err(|source| StoreError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative_path = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_path_buf();
        sources.push(DocumentSource {
            path: entry.path().to_path_buf(),
            relative_path,
        });
    }

    info!(root = %root.display(), count = sources.len(), "discovered documents");
    Ok(sources)
}

/// List every regular file under `root` (used to summarise a finished run).
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>, StoreError> {
    Ok(discover_documents(root)?
        .into_iter()
        .map(|s| s.path)
        .collect())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
