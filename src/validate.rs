//! The validation engine.
//!
//! A [`Validator`] owns an immutable [`ParsedRuleSet`] and evaluates records against
//! it. Every call builds a fresh [`ValidationResult`]; the record is only read.

use crate::config::EngineConfig;
use crate::error::*;
use crate::evaluate::evaluate_condition;
use crate::parse;
use crate::primitives::{expand_wildcards, is_empty, set_path};
use crate::registry::RuleRegistry;
use crate::types::*;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Validates records against a rule set parsed once at construction.
///
/// Read-only after construction, so one instance can serve concurrent callers.
#[derive(Clone, Debug)]
pub struct Validator {
    rules: ParsedRuleSet,
}

impl Validator {
    /// Parses `spec` with the default [`EngineConfig`].
    ///
    /// # Errors
    ///
    /// Returns a [`SpecError`] for any malformed entry, invalid or unknown rule name.
    pub fn new(spec: &Value, registry: &RuleRegistry) -> Result<Validator, SpecError> {
        Validator::with_config(spec, registry, &EngineConfig::default())
    }

    pub fn with_config(
        spec: &Value,
        registry: &RuleRegistry,
        config: &EngineConfig,
    ) -> Result<Validator, SpecError> {
        let rules = parse::parse_rule_set(spec, registry, config)?;
        Ok(Validator { rules })
    }

    /// Builds a validator from JSON rule-spec text.
    pub fn from_json(input: &str, registry: &RuleRegistry) -> Result<Validator, SpecError> {
        let rules = parse::parse_json(input, registry, &EngineConfig::default())?;
        Ok(Validator { rules })
    }

    /// Builds a validator from YAML rule-spec text.
    #[cfg(feature = "yaml")]
    pub fn from_yaml(input: &str, registry: &RuleRegistry) -> Result<Validator, SpecError> {
        let rules = parse::parse_yaml(input, registry, &EngineConfig::default())?;
        Ok(Validator { rules })
    }

    pub fn from_rule_set(rules: ParsedRuleSet) -> Validator {
        Validator { rules }
    }

    pub fn rules(&self) -> &ParsedRuleSet {
        &self.rules
    }

    /// Validates `record` against every field pattern, in declaration order.
    ///
    /// Wildcard patterns are expanded against the record first; each concrete path
    /// gets its own error list. `validated` is only returned when nothing failed.
    pub fn validate(&self, record: &Value) -> ValidationResult {
        let mut errors: IndexMap<String, Vec<ValidationError>> = IndexMap::new();
        let mut validated = Value::Object(Map::new());

        for field in self.rules.iter() {
            for (path, value) in expand_wildcards(&field.pattern, record) {
                tracing::trace!(field = %path, pattern = %field.pattern, "validating field");
                let field_errors = validate_field(&path, value, record, &field.rules);

                if !field_errors.is_empty() {
                    errors.entry(path).or_default().extend(field_errors);
                } else if errors.is_empty()
                    && let Some(value) = value
                {
                    set_path(&mut validated, &path, value.clone());
                }
            }
        }

        let valid = errors.is_empty();
        if !valid {
            validated = Value::Object(Map::new());
        }
        tracing::debug!(valid, failed_fields = errors.len(), "validation finished");

        ValidationResult {
            valid,
            errors,
            validated,
        }
    }
}

/// Runs one field's rule list against a concrete value.
///
/// An empty value with a bare `nullable` anywhere in the list produces no errors.
/// Otherwise items run in order. A conditional runs its selected branch as its own
/// list: a bail inside the branch ends that branch only, and the field's list
/// carries on with the next item.
pub fn validate_field(
    field: &str,
    value: Option<&Value>,
    record: &Value,
    rules: &[ParsedRuleItem],
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let empty = is_empty(value);

    let nullable = rules
        .iter()
        .any(|item| matches!(item, ParsedRuleItem::Rule(rule) if rule.is_nullable_modifier()));
    if empty && nullable {
        return errors;
    }

    for item in rules {
        match item {
            ParsedRuleItem::Rule(rule) => {
                if let Flow::Bail = apply_rule(rule, field, value, record, empty, &mut errors) {
                    break;
                }
            }
            ParsedRuleItem::Conditional {
                condition,
                then,
                otherwise,
            } => {
                let branch = if evaluate_condition(condition, value, record) {
                    Some(then.as_slice())
                } else {
                    otherwise.as_deref()
                };
                for rule in branch.unwrap_or_default() {
                    if let Flow::Bail = apply_rule(rule, field, value, record, empty, &mut errors) {
                        break;
                    }
                }
            }
        }
    }

    errors
}

enum Flow {
    Continue,
    Bail,
}

fn apply_rule(
    rule: &BoundRule,
    field: &str,
    value: Option<&Value>,
    record: &Value,
    empty: bool,
    errors: &mut Vec<ValidationError>,
) -> Flow {
    if empty && rule.handler.skip_if_empty() {
        tracing::trace!(field, rule = %rule.name, "skipped on empty value");
        return Flow::Continue;
    }

    match rule.handler.validate(value, &rule.params, record, field) {
        Some(error) => {
            errors.push(error);
            if rule.handler.bail_on_failure() {
                tracing::trace!(field, rule = %rule.name, "bailed");
                Flow::Bail
            } else {
                Flow::Continue
            }
        }
        None => Flow::Continue,
    }
}
