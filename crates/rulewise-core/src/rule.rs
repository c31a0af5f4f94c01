//! Rule types shared by the extraction and rendering stages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validate::SchemaViolation;

/// Deontic strength: how strongly a rule should be followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    /// Required.
    Obligatory,
    /// Allowed.
    Permissible,
    /// Banned.
    Forbidden,
    /// Left to the reader's choice.
    Optional,
    /// Beyond what is required.
    Supererogatory,
    /// Neutral either way.
    Indifferent,
    /// May be skipped.
    Omissible,
}

impl Strength {
    /// Every token of the vocabulary, in canonical order.
    pub const ALL: [Strength; 7] = [
        Self::Obligatory,
        Self::Permissible,
        Self::Forbidden,
        Self::Optional,
        Self::Supererogatory,
        Self::Indifferent,
        Self::Omissible,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Obligatory => "obligatory",
            Self::Permissible => "permissible",
            Self::Forbidden => "forbidden",
            Self::Optional => "optional",
            Self::Supererogatory => "supererogatory",
            Self::Indifferent => "indifferent",
            Self::Omissible => "omissible",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strength {
    type Err = SchemaViolation;

    /// Exact, case-sensitive match against the vocabulary.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strength| strength.as_str() == s)
            .ok_or_else(|| SchemaViolation::UnknownStrength {
                path: "strength".to_string(),
                value: s.to_string(),
            })
    }
}

/// One instruction decomposed into its deontic components.
///
/// `context: None` means the rule is unconditional; `Some("")` is kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRule {
    pub strength: Strength,
    pub action: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub reason: String,
}

/// Extraction result object, persisted as `<stem>.parsed.json`.
///
/// Order is significant and duplicates are preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRuleSet {
    pub rules: Vec<ParsedRule>,
}

impl ParsedRuleSet {
    pub fn new(rules: Vec<ParsedRule>) -> Self {
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Rendering result object, persisted as `<stem>.rules.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedRuleSet {
    pub rules: Vec<String>,
}

impl RenderedRuleSet {
    pub fn new(rules: Vec<String>) -> Self {
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Join the sentences with one blank line between them.
    pub fn to_prose(&self) -> String {
        self.rules.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask_rule() -> ParsedRule {
        ParsedRule {
            strength: Strength::Obligatory,
            action: "ask".into(),
            target: "confirmation".into(),
            context: Some("before deleting files".into()),
            reason: "prevents data loss".into(),
        }
    }

    #[test]
    fn strength_tokens_are_lowercase() {
        let tokens: Vec<&str> = Strength::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            tokens,
            [
                "obligatory",
                "permissible",
                "forbidden",
                "optional",
                "supererogatory",
                "indifferent",
                "omissible"
            ]
        );
    }

    #[test]
    fn strength_from_str_is_exact() {
        assert_eq!("forbidden".parse::<Strength>().unwrap(), Strength::Forbidden);
        assert!("Forbidden".parse::<Strength>().is_err());
        assert!("mandatory".parse::<Strength>().is_err());
        assert!("".parse::<Strength>().is_err());
    }

    #[test]
    fn strength_serializes_as_token() {
        let json = serde_json::to_string(&Strength::Supererogatory).unwrap();
        assert_eq!(json, "\"supererogatory\"");
    }

    #[test]
    fn absent_context_is_omitted() {
        let mut rule = ask_rule();
        rule.context = None;
        let json = serde_json::to_value(&rule).unwrap();
        assert!(json.get("context").is_none());
    }

    #[test]
    fn empty_context_is_kept() {
        let mut rule = ask_rule();
        rule.context = Some(String::new());
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["context"], "");
    }

    #[test]
    fn parsed_rule_set_wraps_rules() {
        let set = ParsedRuleSet::new(vec![ask_rule(), ask_rule()]);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["rules"].as_array().unwrap().len(), 2);
        assert_eq!(json["rules"][0]["strength"], "obligatory");
    }

    #[test]
    fn prose_joins_with_blank_line() {
        let set = RenderedRuleSet::new(vec!["First.".into(), "Second.".into()]);
        assert_eq!(set.to_prose(), "First.\n\nSecond.");
    }

    #[test]
    fn prose_of_single_rule_has_no_separator() {
        let set = RenderedRuleSet::new(vec!["Only.".into()]);
        assert_eq!(set.to_prose(), "Only.");
    }

    #[test]
    fn prose_of_empty_set_is_empty() {
        assert_eq!(RenderedRuleSet::default().to_prose(), "");
    }
}
