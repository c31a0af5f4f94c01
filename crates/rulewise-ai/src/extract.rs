//! Extraction stage: raw instruction text → validated parsed rules.

use rulewise_core::{ParsedRuleSet, SchemaViolation, rules, validate_parsed_rule_set};
use thiserror::Error;
use tracing::{debug, info};

use crate::generator::{GenerationError, Generator};

const TASK: &str =
    "You are a rule parser that converts raw instructions into structured parsed rules.";

const DIRECTIVES: [&str; 3] = [
    "Take the provided instructions and break them down into structured components.",
    "Each rule should have: strength (obligatory/forbidden/etc), action, target, context (optional), and reason.",
    "Focus on extracting the core components without adding extra details.",
];

const INPUT_HEADING: &str = "Instructions to parse:";

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("extraction backend failed: {0}")]
    Generation(#[from] GenerationError),
    #[error("extraction output failed validation: {0}")]
    Schema(#[from] SchemaViolation),
}

/// Build the system instruction: task statement and directives, then the
/// document text verbatim.
pub fn extraction_instruction(document: &str) -> String {
    let mut header = vec![TASK];
    header.extend(DIRECTIVES);
    [header.join("\n").as_str(), INPUT_HEADING, document].join("\n\n")
}

/// Decompose one document into structured rules.
///
/// An empty rule list is a valid result.
pub async fn extract<G: Generator + ?Sized>(
    generator: &G,
    document: &str,
) -> Result<ParsedRuleSet, ExtractionError> {
    let instruction = extraction_instruction(document);
    let schema = rules::parsed_rule_set_schema();

    debug!(backend = generator.name(), bytes = document.len(), "extracting rules");
    let value = generator.generate(&instruction, &schema).await?;
    let parsed = validate_parsed_rule_set(&value)?;

    info!(count = parsed.len(), "extracted rules");
    Ok(parsed)
}
