//! Rendering stage: parsed rules → one natural-language sentence per rule.

use rulewise_core::{
    ParsedRule, ParsedRuleSet, RenderedRuleSet, SchemaViolation, rules, validate_rendered_rule_set,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::generator::{GenerationError, Generator};

const TASK: &str =
    "You are a rule formatter that converts structured parsed rules into human-readable rules.";

const DIRECTIVES: [&str; 3] = [
    "Take the provided parsed rule components and create natural language versions, one sentence per rule.",
    "Each human-readable rule should directly correspond to the parsed components without adding extra details.",
    "Make the rules clear, concise, and actionable.",
];

const INPUT_HEADING: &str = "Parsed rules to convert:";

#[derive(Error, Debug)]
pub enum RenderingError {
    #[error("rendering backend failed: {0}")]
    Generation(#[from] GenerationError),
    #[error("rendering output failed validation: {0}")]
    Schema(#[from] SchemaViolation),
    #[error("rendered {rendered} sentences for {parsed} parsed rules")]
    CountMismatch { parsed: usize, rendered: usize },
    #[error("failed to serialise parsed rules: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Build the system instruction: task statement and directives, then the
/// parsed rules as pretty-printed JSON.
pub fn rendering_instruction(rules: &[ParsedRule]) -> Result<String, serde_json::Error> {
    let mut header = vec![TASK];
    header.extend(DIRECTIVES);
    let rules_json = serde_json::to_string_pretty(rules)?;
    Ok([header.join("\n").as_str(), INPUT_HEADING, rules_json.as_str()].join("\n\n"))
}

/// Render parsed rules into standalone sentences, in input order.
///
/// An empty input returns an empty set without calling the backend. The
/// output must contain exactly one sentence per input rule.
pub async fn render<G: Generator + ?Sized>(
    generator: &G,
    parsed: &ParsedRuleSet,
) -> Result<RenderedRuleSet, RenderingError> {
    if parsed.is_empty() {
        debug!("no parsed rules, skipping rendering backend");
        return Ok(RenderedRuleSet::default());
    }

    let instruction = rendering_instruction(&parsed.rules)?;
    let schema = rules::rendered_rule_set_schema();

    debug!(backend = generator.name(), count = parsed.len(), "rendering rules");
    let value = generator.generate(&instruction, &schema).await?;
    let rendered = validate_rendered_rule_set(&value)?;

    if rendered.len() != parsed.len() {
        return Err(RenderingError::CountMismatch {
            parsed: parsed.len(),
            rendered: rendered.len(),
        });
    }

    info!(count = rendered.len(), "rendered rules");
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::StubGenerator;
    use rulewise_core::Strength;
    use serde_json::json;

    fn parsed(n: usize) -> ParsedRuleSet {
        let rule = ParsedRule {
            strength: Strength::Obligatory,
            action: "ask".into(),
            target: "confirmation".into(),
            context: Some("before deleting files".into()),
            reason: "prevents data loss".into(),
        };
        ParsedRuleSet::new(vec![rule; n])
    }

    #[test]
    fn instruction_embeds_pretty_json() {
        let set = parsed(1);
        let instruction = rendering_instruction(&set.rules).unwrap();
        assert!(instruction.starts_with(TASK));
        assert!(instruction.contains("Parsed rules to convert:\n\n[\n  {\n"));
        assert!(instruction.contains("\"strength\": \"obligatory\""));
        assert!(instruction.ends_with(&serde_json::to_string_pretty(&set.rules).unwrap()));
    }

    #[test]
    fn instruction_carries_every_directive() {
        let instruction = rendering_instruction(&parsed(1).rules).unwrap();
        for directive in DIRECTIVES {
            assert!(instruction.contains(directive), "missing: {directive}");
        }
    }

    #[tokio::test]
    async fn empty_input_skips_backend() {
        let stub = StubGenerator::new();
        let rendered = render(&stub, &ParsedRuleSet::default()).await.unwrap();
        assert!(rendered.is_empty());
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn returns_sentences_in_order() {
        let stub = StubGenerator::new().respond(json!({
            "rules": ["First sentence.", "Second sentence."]
        }));
        let rendered = render(&stub, &parsed(2)).await.unwrap();
        assert_eq!(rendered.rules, ["First sentence.", "Second sentence."]);
        assert_eq!(stub.calls()[0].schema_name, "rendered_rules");
    }

    #[tokio::test]
    async fn backend_failure_is_rendering_failure() {
        let stub = StubGenerator::new().fail("503");
        let err = render(&stub, &parsed(1)).await.unwrap_err();
        assert!(matches!(err, RenderingError::Generation(_)));
    }

    #[tokio::test]
    async fn empty_sentence_is_rendering_failure() {
        let stub = StubGenerator::new().respond(json!({ "rules": [""] }));
        let err = render(&stub, &parsed(1)).await.unwrap_err();
        assert!(matches!(err, RenderingError::Schema(_)));
    }

    #[tokio::test]
    async fn count_mismatch_is_rendering_failure() {
        let stub = StubGenerator::new().respond(json!({ "rules": ["Only one."] }));
        let err = render(&stub, &parsed(2)).await.unwrap_err();
        assert!(matches!(
            err,
            RenderingError::CountMismatch {
                parsed: 2,
                rendered: 1
            }
        ));
    }
}
