//! `build`: run the pipeline over every document under the input root.

use std::path::Path;

use anyhow::Context;
use rulewise_ai::Generator;
use rulewise_pipeline::{Pipeline, RunReport};
use rulewise_store::{ArtifactStore, list_files};

/// Run the pipeline and print a per-run summary. Returns the report so the
/// caller can decide on an exit status.
pub async fn run_build<G: Generator>(
    generator: G,
    input: &Path,
    output: &Path,
) -> anyhow::Result<RunReport> {
    tokio::fs::create_dir_all(output)
        .await
        .with_context(|| format!("creating output directory {}", output.display()))?;

    let pipeline = Pipeline::new(generator, ArtifactStore::new(output));
    let report = pipeline
        .run_dir(input)
        .await
        .with_context(|| format!("discovering documents in {}", input.display()))?;

    for outcome in report.failures() {
        if let Some(err) = &outcome.error {
            eprintln!("  failed: {} ({err})", outcome.relative_path.display());
        }
    }

    let outputs = list_files(output).context("listing generated files")?;
    eprintln!("Output files in {}:", output.display());
    for path in &outputs {
        eprintln!("  {}", path.display());
    }
    eprintln!(
        "Processed {} documents: {} succeeded, {} failed",
        report.outcomes.len(),
        report.succeeded(),
        report.failed()
    );

    Ok(report)
}
