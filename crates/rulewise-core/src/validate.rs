//! Structural checks applied to every value a generation backend returns.
//!
//! The backend is asked for schema-conforming output but is never trusted to
//! deliver it: these validators are the only way to turn a raw JSON value into
//! a [`ParsedRuleSet`] or [`RenderedRuleSet`].

use serde_json::{Map, Value};
use thiserror::Error;

use crate::rule::{ParsedRule, ParsedRuleSet, RenderedRuleSet, Strength};

/// A structured value does not match its target schema.
///
/// `path` locates the offending node, e.g. `rules[2].strength`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("{path}: expected an object")]
    NotAnObject { path: String },

    #[error("{path}: expected an array")]
    NotAnArray { path: String },

    #[error("{path}: missing required field")]
    MissingField { path: String },

    #[error("{path}: expected a non-empty string")]
    EmptyText { path: String },

    #[error("{path}: expected a string")]
    NotAString { path: String },

    #[error("{path}: unknown strength {value:?}")]
    UnknownStrength { path: String, value: String },
}

/// Validate an extraction result object (`{ "rules": [...] }`).
pub fn validate_parsed_rule_set(value: &Value) -> Result<ParsedRuleSet, SchemaViolation> {
    let rules = rules_field(value)?;
    Ok(ParsedRuleSet::new(validate_parsed_rules(rules)?))
}

/// Validate a bare array of parsed rules.
///
/// Fails on the first element that is missing a required field, carries a
/// strength outside the vocabulary, or has an empty required text field.
/// Unknown extra fields are ignored.
pub fn validate_parsed_rules(value: &Value) -> Result<Vec<ParsedRule>, SchemaViolation> {
    let items = value.as_array().ok_or_else(|| SchemaViolation::NotAnArray {
        path: "rules".to_string(),
    })?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_rule(item, &format!("rules[{i}]")))
        .collect()
}

/// Validate a rendering result object (`{ "rules": [...] }`).
pub fn validate_rendered_rule_set(value: &Value) -> Result<RenderedRuleSet, SchemaViolation> {
    let rules = rules_field(value)?;
    Ok(RenderedRuleSet::new(validate_rendered_rules(rules)?))
}

/// Validate a bare array of rendered sentences: every element must be a
/// non-empty string.
pub fn validate_rendered_rules(value: &Value) -> Result<Vec<String>, SchemaViolation> {
    let items = value.as_array().ok_or_else(|| SchemaViolation::NotAnArray {
        path: "rules".to_string(),
    })?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let path = format!("rules[{i}]");
            match item.as_str() {
                Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
                _ => Err(SchemaViolation::EmptyText { path }),
            }
        })
        .collect()
}

fn rules_field(value: &Value) -> Result<&Value, SchemaViolation> {
    let obj = value.as_object().ok_or_else(|| SchemaViolation::NotAnObject {
        path: "$".to_string(),
    })?;
    obj.get("rules").ok_or_else(|| SchemaViolation::MissingField {
        path: "rules".to_string(),
    })
}

fn parse_rule(item: &Value, path: &str) -> Result<ParsedRule, SchemaViolation> {
    let obj = item.as_object().ok_or_else(|| SchemaViolation::NotAnObject {
        path: path.to_string(),
    })?;

    let strength_path = format!("{path}.strength");
    let strength = required_text(obj, path, "strength")?;
    let strength = strength
        .parse::<Strength>()
        .map_err(|_| SchemaViolation::UnknownStrength {
            path: strength_path,
            value: strength.to_string(),
        })?;

    Ok(ParsedRule {
        strength,
        action: required_text(obj, path, "action")?.to_string(),
        target: required_text(obj, path, "target")?.to_string(),
        context: optional_text(obj, path, "context")?,
        reason: required_text(obj, path, "reason")?.to_string(),
    })
}

fn required_text<'a>(
    obj: &'a Map<String, Value>,
    path: &str,
    field: &str,
) -> Result<&'a str, SchemaViolation> {
    let field_path = format!("{path}.{field}");
    match obj.get(field) {
        None | Some(Value::Null) => Err(SchemaViolation::MissingField { path: field_path }),
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s),
        Some(_) => Err(SchemaViolation::EmptyText { path: field_path }),
    }
}

/// `context` may be absent or null (unconditional); if present it must be a string.
fn optional_text(
    obj: &Map<String, Value>,
    path: &str,
    field: &str,
) -> Result<Option<String>, SchemaViolation> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(SchemaViolation::NotAString {
            path: format!("{path}.{field}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ask_rule_json() -> Value {
        json!({
            "strength": "obligatory",
            "action": "ask",
            "target": "confirmation",
            "context": "before deleting files",
            "reason": "prevents data loss"
        })
    }

    #[test]
    fn accepts_well_formed_rule_set() {
        let set = validate_parsed_rule_set(&json!({ "rules": [ask_rule_json()] })).unwrap();
        assert_eq!(set.len(), 1);
        let rule = &set.rules[0];
        assert_eq!(rule.strength, Strength::Obligatory);
        assert_eq!(rule.action, "ask");
        assert_eq!(rule.context.as_deref(), Some("before deleting files"));
    }

    #[test]
    fn accepts_empty_rule_set() {
        let set = validate_parsed_rule_set(&json!({ "rules": [] })).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn accepts_every_strength_token() {
        for strength in Strength::ALL {
            let mut rule = ask_rule_json();
            rule["strength"] = json!(strength.as_str());
            let rules = validate_parsed_rules(&json!([rule])).unwrap();
            assert_eq!(rules[0].strength, strength);
        }
    }

    #[test]
    fn preserves_order_and_duplicates() {
        let mut second = ask_rule_json();
        second["action"] = json!("avoid");
        let rules =
            validate_parsed_rules(&json!([ask_rule_json(), second, ask_rule_json()])).unwrap();
        let actions: Vec<&str> = rules.iter().map(|r| r.action.as_str()).collect();
        assert_eq!(actions, ["ask", "avoid", "ask"]);
    }

    #[test]
    fn missing_context_is_unconditional() {
        let mut rule = ask_rule_json();
        rule.as_object_mut().unwrap().remove("context");
        let rules = validate_parsed_rules(&json!([rule])).unwrap();
        assert!(rules[0].context.is_none());
    }

    #[test]
    fn null_context_is_unconditional() {
        let mut rule = ask_rule_json();
        rule["context"] = Value::Null;
        let rules = validate_parsed_rules(&json!([rule])).unwrap();
        assert!(rules[0].context.is_none());
    }

    #[test]
    fn empty_context_is_distinct_from_absent() {
        let mut rule = ask_rule_json();
        rule["context"] = json!("");
        let rules = validate_parsed_rules(&json!([rule])).unwrap();
        assert_eq!(rules[0].context.as_deref(), Some(""));
    }

    #[test]
    fn non_string_context_is_rejected() {
        let mut rule = ask_rule_json();
        rule["context"] = json!(3);
        let err = validate_parsed_rules(&json!([rule])).unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::NotAString {
                path: "rules[0].context".into()
            }
        );
    }

    #[test]
    fn action_only_rule_is_missing_strength() {
        let err = validate_parsed_rule_set(&json!({ "rules": [{ "action": "use" }] })).unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::MissingField {
                path: "rules[0].strength".into()
            }
        );
    }

    #[test]
    fn each_required_field_is_enforced() {
        for field in ["strength", "action", "target", "reason"] {
            let mut rule = ask_rule_json();
            rule.as_object_mut().unwrap().remove(field);
            let err = validate_parsed_rules(&json!([rule])).unwrap_err();
            assert_eq!(
                err,
                SchemaViolation::MissingField {
                    path: format!("rules[0].{field}")
                }
            );
        }
    }

    #[test]
    fn blank_required_text_is_rejected() {
        for field in ["action", "target", "reason"] {
            for blank in [json!(""), json!("   "), json!(42), json!(["x"])] {
                let mut rule = ask_rule_json();
                rule[field] = blank;
                let err = validate_parsed_rules(&json!([rule])).unwrap_err();
                assert_eq!(
                    err,
                    SchemaViolation::EmptyText {
                        path: format!("rules[0].{field}")
                    }
                );
            }
        }
    }

    #[test]
    fn unknown_strength_is_rejected() {
        let mut rule = ask_rule_json();
        rule["strength"] = json!("mandatory");
        let err = validate_parsed_rules(&json!([ask_rule_json(), rule])).unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::UnknownStrength {
                path: "rules[1].strength".into(),
                value: "mandatory".into()
            }
        );
    }

    #[test]
    fn non_object_element_is_rejected() {
        let err = validate_parsed_rules(&json!(["ask before deleting"])).unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::NotAnObject {
                path: "rules[0]".into()
            }
        );
    }

    #[test]
    fn missing_rules_wrapper_is_rejected() {
        assert_eq!(
            validate_parsed_rule_set(&json!({ "items": [] })).unwrap_err(),
            SchemaViolation::MissingField {
                path: "rules".into()
            }
        );
        assert_eq!(
            validate_parsed_rule_set(&json!([])).unwrap_err(),
            SchemaViolation::NotAnObject { path: "$".into() }
        );
        assert_eq!(
            validate_parsed_rule_set(&json!({ "rules": {} })).unwrap_err(),
            SchemaViolation::NotAnArray {
                path: "rules".into()
            }
        );
    }

    #[test]
    fn accepted_rules_satisfy_vocabulary_and_text_invariants() {
        let value = json!({ "rules": [
            ask_rule_json(),
            { "strength": "forbidden", "action": "use", "target": "type assertions", "reason": "maintains type safety" },
            { "strength": "omissible", "action": "explain", "target": "finished tasks", "context": "", "reason": "saves time" }
        ]});
        let set = validate_parsed_rule_set(&value).unwrap();
        for rule in &set.rules {
            assert!(Strength::ALL.contains(&rule.strength));
            assert!(!rule.action.is_empty());
            assert!(!rule.target.is_empty());
            assert!(!rule.reason.is_empty());
        }
    }

    #[test]
    fn rendered_rules_accept_sentences() {
        let set = validate_rendered_rule_set(&json!({
            "rules": ["Ask for confirmation before deleting files to prevent data loss."]
        }))
        .unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn rendered_rules_reject_empty_or_non_string() {
        for bad in [json!(""), json!(" \n"), json!(null), json!({ "text": "x" })] {
            let err = validate_rendered_rules(&json!(["Fine.", bad])).unwrap_err();
            assert_eq!(
                err,
                SchemaViolation::EmptyText {
                    path: "rules[1]".into()
                }
            );
        }
    }

    #[test]
    fn rendered_rule_set_requires_wrapper() {
        assert!(validate_rendered_rule_set(&json!(["A."])).is_err());
        assert!(validate_rendered_rule_set(&json!({ "rules": [] })).unwrap().is_empty());
    }
}
