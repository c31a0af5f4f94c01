use serde::Serialize;
use serde_json::Value;

/// A named JSON Schema handed to a generation backend as its target shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetSchema {
    /// Identifier sent alongside the schema (`^[a-zA-Z0-9_-]+$`).
    pub name: &'static str,
    pub schema: Value,
}

/// JSON Schema definitions for the two pipeline representations.
pub mod rules {
    use serde_json::{Value, json};

    use super::TargetSchema;
    use crate::rule::Strength;

    /// Schema for a single deontic strength token.
    pub fn strength_schema() -> Value {
        let tokens: Vec<&str> = Strength::ALL.iter().map(|s| s.as_str()).collect();
        json!({
            "type": "string",
            "enum": tokens,
            "description": "How strongly this rule should be enforced"
        })
    }

    /// Schema for one structured rule record.
    pub fn parsed_rule_schema() -> Value {
        json!({
            "type": "object",
            "description": "Structured breakdown of a rule for AI processing",
            "properties": {
                "strength": strength_schema(),
                "action": {
                    "type": "string",
                    "description": "The action verb that describes what to do",
                    "examples": ["use", "avoid", "format", "follow", "keep", "combine", "search", "ask"]
                },
                "target": {
                    "type": "string",
                    "description": "What the action applies to - the object of the rule",
                    "examples": ["commit messages", "type assertions", "command line tools", "file operations", "code formatting", "user instructions"]
                },
                "context": {
                    "type": "string",
                    "description": "When, where, or under what conditions this rule applies",
                    "examples": ["before removing files", "in async functions", "when returning promises", "for new features", "under 50 characters", "if unclear"]
                },
                "reason": {
                    "type": "string",
                    "description": "Why this rule exists - the justification or benefit",
                    "examples": ["prevents data loss", "better stack traces", "consistent code style", "automated tooling", "accurate execution", "clear completion signal"]
                }
            },
            "required": ["strength", "action", "target", "reason"],
            "examples": [
                {
                    "strength": "obligatory",
                    "action": "use",
                    "target": "return await",
                    "context": "when returning promises from async functions",
                    "reason": "better stack traces and error handling"
                },
                {
                    "strength": "forbidden",
                    "action": "use",
                    "target": "type assertions",
                    "context": "anywhere",
                    "reason": "maintains type safety"
                },
                {
                    "strength": "obligatory",
                    "action": "ask",
                    "target": "confirmation",
                    "context": "before removing files",
                    "reason": "prevents accidental data loss"
                },
                {
                    "strength": "obligatory",
                    "action": "follow",
                    "target": "user instructions",
                    "context": "exactly",
                    "reason": "accurate execution"
                },
                {
                    "strength": "obligatory",
                    "action": "reply",
                    "target": "Done",
                    "context": "after completing tasks",
                    "reason": "clear completion signal"
                }
            ]
        })
    }

    /// Schema for one natural-language rule.
    pub fn rendered_rule_schema() -> Value {
        json!({
            "type": "string",
            "minLength": 1,
            "description": "The rule expressed in natural human language",
            "examples": [
                "Use return await when returning promises from async functions for better stack traces and error handling",
                "Do not use type assertions anywhere to maintain type safety",
                "Ask for confirmation before removing files to prevent accidental data loss",
                "Follow user instructions exactly for accurate execution",
                "Reply \"Done\" after completing tasks for clear completion signal"
            ]
        })
    }

    /// Target schema for the extraction stage: `{ rules: ParsedRule[] }`.
    pub fn parsed_rule_set_schema() -> TargetSchema {
        TargetSchema {
            name: "parsed_rules",
            schema: wrap_rules(parsed_rule_schema(), "Array of structured parsed rules"),
        }
    }

    /// Target schema for the rendering stage: `{ rules: string[] }`.
    pub fn rendered_rule_set_schema() -> TargetSchema {
        TargetSchema {
            name: "rendered_rules",
            schema: wrap_rules(rendered_rule_schema(), "Array of human-readable rules"),
        }
    }

    fn wrap_rules(items: Value, description: &str) -> Value {
        json!({
            "type": "object",
            "properties": {
                "rules": {
                    "type": "array",
                    "description": description,
                    "items": items
                }
            },
            "required": ["rules"]
        })
    }
}
