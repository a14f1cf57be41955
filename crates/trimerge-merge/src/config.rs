use serde::{Deserialize, Serialize};
use trimerge_types::Path;

use crate::handlers::{IdentitySetMerger, ValueConflictHandler, DEFAULT_IDENTITY_FIELD};
use crate::merger::Merger;
use crate::report::Favor;

/// Declarative description of a [`Merger`].
///
/// Only the built-in handlers can be configured this way; custom handlers
/// are registered in code with [`Merger::with_value_handler`] and friends.
///
/// In TOML:
///
/// ```toml
/// default_favor = "update"
/// default_identity_field = "id"
///
/// [[value]]
/// path = "meta.owner"
/// favor = "head"
///
/// [[sequence]]
/// path = "items"
/// identity_field = "key"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergerConfig {
    /// Tie-break for scalar conflicts with no per-path rule.
    pub default_favor: Favor,
    /// Identity field for sequences with no per-path rule.
    pub default_identity_field: String,
    /// Per-path scalar tie-breaks.
    #[serde(rename = "value", skip_serializing_if = "Vec::is_empty")]
    pub value_rules: Vec<ValueRule>,
    /// Per-path identity fields.
    #[serde(rename = "sequence", skip_serializing_if = "Vec::is_empty")]
    pub sequence_rules: Vec<SequenceRule>,
}

impl Default for MergerConfig {
    fn default() -> Self {
        Self {
            default_favor: Favor::Update,
            default_identity_field: DEFAULT_IDENTITY_FIELD.to_string(),
            value_rules: Vec::new(),
            sequence_rules: Vec::new(),
        }
    }
}

/// Scalar tie-break at one location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRule {
    pub path: Path,
    pub favor: Favor,
}

/// Identity field for the sequence at one location. Falls back to
/// [`MergerConfig::default_identity_field`] when omitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRule {
    pub path: Path,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_field: Option<String>,
}

impl MergerConfig {
    /// Build the merger this configuration describes. A later rule for the
    /// same path replaces an earlier one.
    pub fn build(&self) -> Merger {
        let mut merger = Merger::new()
            .with_default_value_handler(ValueConflictHandler::new(self.default_favor))
            .with_default_sequence_handler(IdentitySetMerger::new(
                self.default_identity_field.as_str(),
            ));

        for rule in &self.value_rules {
            merger = merger.with_value_handler(&rule.path, ValueConflictHandler::new(rule.favor));
        }
        for rule in &self.sequence_rules {
            let field = rule
                .identity_field
                .as_deref()
                .unwrap_or(&self.default_identity_field);
            merger = merger.with_sequence_handler(&rule.path, IdentitySetMerger::new(field));
        }
        merger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use trimerge_types::{Category, Value};

    #[test]
    fn default_config() {
        let c = MergerConfig::default();
        assert_eq!(c.default_favor, Favor::Update);
        assert_eq!(c.default_identity_field, "id");
        assert!(c.value_rules.is_empty());
        assert!(c.sequence_rules.is_empty());
    }

    #[test]
    fn parse_toml() {
        let text = r#"
            default_favor = "head"

            [[value]]
            path = "meta.owner"
            favor = "update"

            [[sequence]]
            path = ["items"]
            identity_field = "key"

            [[sequence]]
            path = "tags"
        "#;
        let c: MergerConfig = toml::from_str(text).unwrap();
        assert_eq!(c.default_favor, Favor::Head);
        assert_eq!(c.default_identity_field, "id");
        assert_eq!(c.value_rules[0].path, Path::from("meta.owner"));
        assert_eq!(c.value_rules[0].favor, Favor::Update);
        assert_eq!(c.sequence_rules[0].path, Path::from("items"));
        assert_eq!(c.sequence_rules[0].identity_field.as_deref(), Some("key"));
        assert_eq!(c.sequence_rules[1].identity_field, None);
    }

    #[test]
    fn unknown_favor_rejected() {
        let err = toml::from_str::<MergerConfig>(r#"default_favor = "root""#);
        assert!(err.is_err());
    }

    #[test]
    fn toml_roundtrip_of_rules() {
        let c = MergerConfig {
            value_rules: vec![ValueRule {
                path: Path::from("id"),
                favor: Favor::Head,
            }],
            ..Default::default()
        };
        let text = toml::to_string(&c).unwrap();
        assert!(text.contains("[[value]]"));
        let back: MergerConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn built_merger_uses_rules() {
        let c = MergerConfig {
            default_favor: Favor::Head,
            default_identity_field: "name".into(),
            value_rules: vec![ValueRule {
                path: Path::from("b"),
                favor: Favor::Update,
            }],
            sequence_rules: vec![SequenceRule {
                path: Path::from("items"),
                identity_field: Some("key".into()),
            }],
        };
        let merger = c.build();

        let root = Value::from(json!({"a": 1, "b": 1}));
        let head = Value::from(json!({"a": 2, "b": 2}));
        let update = Value::from(json!({"a": 3, "b": 3}));
        let merged = merger.merge(&root, &head, &update).unwrap();
        assert_eq!(merged, Value::from(json!({"a": 2, "b": 3})));

        assert_eq!(
            merger
                .handler_for(&Path::from("items"), Category::Sequence)
                .name(),
            "identity-set"
        );
    }

    #[test]
    fn sequence_rule_falls_back_to_default_field() {
        let c = MergerConfig {
            default_identity_field: "name".into(),
            sequence_rules: vec![SequenceRule {
                path: Path::from("items"),
                identity_field: None,
            }],
            ..Default::default()
        };
        let merger = c.build();
        let root = Value::from(json!({"items": []}));
        let head = Value::from(json!({"items": [{"name": "a"}]}));
        let update = Value::from(json!({"items": [{"name": "b"}]}));
        let merged = merger.merge(&root, &head, &update).unwrap();
        assert_eq!(
            merged,
            Value::from(json!({"items": [{"name": "b"}, {"name": "a"}]}))
        );
    }
}
