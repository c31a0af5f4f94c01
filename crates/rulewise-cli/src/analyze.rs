//! Size comparison between source documents and their generated prose.

use std::path::{Path, PathBuf};

use anyhow::Context;
use rulewise_store::{ArtifactStore, discover_documents};
use tracing::warn;

/// Byte-size comparison for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub file: PathBuf,
    pub original_bytes: u64,
    pub generated_bytes: u64,
    /// `original - generated`; positive means the prose is smaller.
    pub difference: i64,
    pub savings: bool,
    /// `difference / original * 100`, or 0 for an empty original.
    pub percent_change: f64,
}

impl Comparison {
    pub fn new(file: PathBuf, original_bytes: u64, generated_bytes: u64) -> Self {
        let difference = original_bytes as i64 - generated_bytes as i64;
        Self {
            file,
            original_bytes,
            generated_bytes,
            difference,
            savings: difference > 0,
            percent_change: percent(difference, original_bytes),
        }
    }
}

/// Aggregate over every compared document.
#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    pub original_bytes: u64,
    pub generated_bytes: u64,
    pub difference: i64,
    pub savings: bool,
    pub percent_change: f64,
}

impl Totals {
    pub fn of(rows: &[Comparison]) -> Self {
        let original_bytes: u64 = rows.iter().map(|r| r.original_bytes).sum();
        let generated_bytes: u64 = rows.iter().map(|r| r.generated_bytes).sum();
        let difference = original_bytes as i64 - generated_bytes as i64;
        Self {
            original_bytes,
            generated_bytes,
            difference,
            savings: difference > 0,
            percent_change: percent(difference, original_bytes),
        }
    }
}

fn percent(difference: i64, original: u64) -> f64 {
    if original == 0 {
        0.0
    } else {
        difference as f64 / original as f64 * 100.0
    }
}

/// Largest absolute change first; ties keep discovery order.
pub fn sort_by_magnitude(rows: &mut [Comparison]) {
    rows.sort_by_key(|r| std::cmp::Reverse(r.difference.unsigned_abs()));
}

/// Compare every document under `input` with its `.md` under `output`.
///
/// Documents without generated prose are logged and skipped.
pub async fn compare_dirs(input: &Path, output: &Path) -> anyhow::Result<Vec<Comparison>> {
    let sources = discover_documents(input)
        .with_context(|| format!("discovering documents in {}", input.display()))?;
    let store = ArtifactStore::new(output);

    let mut rows = Vec::with_capacity(sources.len());
    for source in &sources {
        let original = match tokio::fs::read(&source.path).await {
            Ok(bytes) => bytes.len() as u64,
            Err(e) => {
                warn!(path = %source.path.display(), error = %e, "cannot read document");
                continue;
            }
        };
        let generated = match store.read_markdown(&source.relative_path).await {
            Ok(text) => text.len() as u64,
            Err(e) => {
                warn!(path = %source.relative_path.display(), error = %e, "no generated prose");
                continue;
            }
        };
        rows.push(Comparison::new(
            source.relative_path.clone(),
            original,
            generated,
        ));
    }

    sort_by_magnitude(&mut rows);
    Ok(rows)
}
