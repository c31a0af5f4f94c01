pub mod layout;
pub mod rule;
pub mod schema;
pub mod validate;

pub use layout::{ArtifactPaths, artifact_stem};
pub use rule::{ParsedRule, ParsedRuleSet, RenderedRuleSet, Strength};
pub use schema::{TargetSchema, rules};
pub use validate::{
    SchemaViolation, validate_parsed_rule_set, validate_parsed_rules, validate_rendered_rule_set,
    validate_rendered_rules,
};
