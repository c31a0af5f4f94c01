//! Pipeline orchestrator: extraction, rendering, and persistence per document,
//! one document at a time, with failures isolated to the document that caused them.

use std::path::{Path, PathBuf};

use rulewise_ai::{ExtractionError, Generator, RenderingError, extract, render};
use rulewise_core::ArtifactPaths;
use rulewise_store::{ArtifactStore, DocumentSource, StoreError, discover_documents};
use thiserror::Error;
use tracing::{debug, error, info};

/// Where a document's processing stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Extraction,
    Rendering,
    Persist,
}

/// Per-document lifecycle: `Pending → Extracted → Rendered → Persisted`,
/// or `Failed` at any transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    Pending,
    Extracted,
    Rendered,
    Persisted,
    Failed(Stage),
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("read failed: {0}")]
    Load(#[source] StoreError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Rendering(#[from] RenderingError),
    #[error("write failed: {0}")]
    Persist(#[source] StoreError),
}

impl DocumentError {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Load(_) => Stage::Load,
            Self::Extraction(_) => Stage::Extraction,
            Self::Rendering(_) => Stage::Rendering,
            Self::Persist(_) => Stage::Persist,
        }
    }
}

/// Host-side audit entry with a timestamp added when recorded.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub event_type: String,
    pub path: Option<PathBuf>,
    pub detail: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Result of processing one document.
#[derive(Debug)]
pub struct DocumentOutcome {
    pub relative_path: PathBuf,
    pub state: DocumentState,
    pub rule_count: usize,
    pub artifacts: Option<ArtifactPaths>,
    pub error: Option<DocumentError>,
}

impl DocumentOutcome {
    pub fn is_persisted(&self) -> bool {
        self.state == DocumentState::Persisted
    }
}

/// Result of a full run, in processing order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<DocumentOutcome>,
    pub audit_entries: Vec<AuditRecord>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_persisted()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes.iter().filter(|o| !o.is_persisted())
    }
}

/// Sequences extraction → rendering → persistence for each document.
pub struct Pipeline<G> {
    generator: G,
    store: ArtifactStore,
}

impl<G: Generator> Pipeline<G> {
    pub fn new(generator: G, store: ArtifactStore) -> Self {
        Self { generator, store }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Discover every document under `input_root` and process them all.
    ///
    /// Only discovery failure is returned as an error; per-document failures
    /// are recorded in the report.
    pub async fn run_dir(&self, input_root: &Path) -> Result<RunReport, StoreError> {
        let sources = discover_documents(input_root)?;
        Ok(self.run(&sources).await)
    }

    /// Process documents strictly in order. Document N's artifacts are written
    /// (or N is marked failed) before N+1 starts.
    pub async fn run(&self, sources: &[DocumentSource]) -> RunReport {
        let mut report = RunReport::default();
        record(
            &mut report.audit_entries,
            "run-started",
            None,
            format!("{} documents, backend {}", sources.len(), self.generator.name()),
        );

        for source in sources {
            let outcome = self.process(source).await;
            match &outcome.error {
                None => record(
                    &mut report.audit_entries,
                    "document-persisted",
                    Some(&outcome.relative_path),
                    format!("{} rules", outcome.rule_count),
                ),
                Some(err) => record(
                    &mut report.audit_entries,
                    "document-failed",
                    Some(&outcome.relative_path),
                    err.to_string(),
                ),
            }
            report.outcomes.push(outcome);
        }

        let summary = format!(
            "{} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        );
        record(&mut report.audit_entries, "run-complete", None, summary);
        report
    }

    /// Process a single document through every stage.
    pub async fn process(&self, source: &DocumentSource) -> DocumentOutcome {
        let mut rule_count = 0;
        let result = self.advance(source, &mut rule_count).await;

        match result {
            Ok(paths) => DocumentOutcome {
                relative_path: source.relative_path.clone(),
                state: DocumentState::Persisted,
                rule_count,
                artifacts: Some(paths),
                error: None,
            },
            Err(err) => {
                error!(
                    path = %source.relative_path.display(),
                    stage = ?err.stage(),
                    error = %err,
                    "document failed"
                );
                DocumentOutcome {
                    relative_path: source.relative_path.clone(),
                    state: DocumentState::Failed(err.stage()),
                    rule_count,
                    artifacts: None,
                    error: Some(err),
                }
            }
        }
    }

    async fn advance(
        &self,
        source: &DocumentSource,
        rule_count: &mut usize,
    ) -> Result<ArtifactPaths, DocumentError> {
        let path = source.relative_path.as_path();
        let document = source.load().await.map_err(DocumentError::Load)?;

        let parsed = extract(&self.generator, &document.text).await?;
        *rule_count = parsed.len();
        transition(path, DocumentState::Pending, DocumentState::Extracted);

        let rendered = render(&self.generator, &parsed).await?;
        transition(path, DocumentState::Extracted, DocumentState::Rendered);

        let paths = self
            .store
            .write(&document.relative_path, &parsed, &rendered)
            .await
            .map_err(DocumentError::Persist)?;
        transition(path, DocumentState::Rendered, DocumentState::Persisted);

        info!(
            path = %document.relative_path.display(),
            rules = parsed.len(),
            "document persisted"
        );
        Ok(paths)
    }
}

fn transition(path: &Path, from: DocumentState, to: DocumentState) {
    debug!(path = %path.display(), ?from, ?to, "document advanced");
}

fn record(entries: &mut Vec<AuditRecord>, event_type: &str, path: Option<&Path>, detail: String) {
    let entry = AuditRecord {
        event_type: event_type.to_string(),
        path: path.map(Path::to_path_buf),
        detail,
        timestamp: chrono::Utc::now(),
    };
    let shown = entry
        .path
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    info!(
        event_type = %entry.event_type,
        path = %shown,
        detail = %entry.detail,
        "audit event recorded"
    );
    entries.push(entry);
}
