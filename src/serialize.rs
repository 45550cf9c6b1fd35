//! [`ParsedRuleSet`] → rule-spec wire form.
//!
//! Patterns are written as `{source, flags}` so the output is plain JSON/YAML and
//! parses back into an equivalent rule set.

use crate::error::SerializeError;
use crate::types::*;
use serde_json::{Map, Value};

/// Renders a parsed rule set back into its wire form.
pub fn to_spec(rules: &ParsedRuleSet) -> Value {
    let mut spec = Map::new();
    for field in rules.iter() {
        let items = field.rules.iter().map(item_to_value).collect();
        spec.insert(field.pattern.clone(), Value::Array(items));
    }
    Value::Object(spec)
}

fn item_to_value(item: &ParsedRuleItem) -> Value {
    match item {
        ParsedRuleItem::Rule(rule) => rule_to_value(rule),
        ParsedRuleItem::Conditional {
            condition,
            then,
            otherwise,
        } => {
            let mut out = vec![
                Value::from(crate::parse::WHEN),
                condition.to_value(),
                Value::Array(then.iter().map(rule_to_value).collect()),
            ];
            if let Some(otherwise) = otherwise {
                out.push(Value::Array(otherwise.iter().map(rule_to_value).collect()));
            }
            Value::Array(out)
        }
    }
}

fn rule_to_value(rule: &BoundRule) -> Value {
    if rule.params.is_empty() {
        return Value::String(rule.name.clone());
    }
    let mut out = vec![Value::String(rule.name.clone())];
    out.extend(rule.params.iter().map(Param::to_value));
    Value::Array(out)
}

/// Serializes a rule set as JSON text.
pub fn serialize_json(rules: &ParsedRuleSet) -> Result<String, SerializeError> {
    serde_json::to_string_pretty(&to_spec(rules)).map_err(|e| SerializeError {
        message: format!("failed to serialize rule set to JSON: {}", e),
    })
}

/// Serializes a rule set as YAML text.
#[cfg(feature = "yaml")]
pub fn serialize_yaml(rules: &ParsedRuleSet) -> Result<String, SerializeError> {
    serde_saphyr::to_string(&to_spec(rules)).map_err(|e| SerializeError {
        message: format!("failed to serialize rule set to YAML: {}", e),
    })
}
