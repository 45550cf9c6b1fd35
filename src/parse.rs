//! Rule-specification parsing.
//!
//! Decodes the wire form once into typed rules and conditions, resolving every rule
//! name through a [`RuleRegistry`]. Any problem is a [`SpecError`]; nothing here
//! looks at record data.

use crate::config::EngineConfig;
use crate::enums::*;
use crate::error::{SpecError, SpecErrorKind};
use crate::registry::RuleRegistry;
use crate::types::*;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static RULE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").unwrap());

/// Tag that introduces a conditional rule.
pub const WHEN: &str = "when";

/// Parses a rule specification: a map from field pattern to rule list.
pub fn parse_rule_set(
    spec: &Value,
    registry: &RuleRegistry,
    config: &EngineConfig,
) -> Result<ParsedRuleSet, SpecError> {
    let fields = spec.as_object().ok_or_else(|| {
        SpecError::new(
            SpecErrorKind::Structural,
            "rule specification must be a map of field patterns to rule lists",
            "",
        )
    })?;

    let mut parsed = Vec::with_capacity(fields.len());
    for (pattern, rules) in fields {
        check_field_pattern(pattern, config)?;

        let entries = rules.as_array().ok_or_else(|| {
            SpecError::new(
                SpecErrorKind::Structural,
                "rules for a field must be a sequence",
                pattern,
            )
        })?;

        let mut items = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let path = format!("{}[{}]", pattern, i);
            items.push(parse_item(entry, &path, registry, config)?);
        }

        parsed.push(FieldRules {
            pattern: pattern.clone(),
            rules: items,
        });
    }

    tracing::debug!(fields = parsed.len(), "parsed rule set");
    Ok(ParsedRuleSet::new(parsed))
}

/// Decodes JSON rule-spec text, then parses it.
pub fn parse_json(
    input: &str,
    registry: &RuleRegistry,
    config: &EngineConfig,
) -> Result<ParsedRuleSet, SpecError> {
    let value: Value = serde_json::from_str(input)
        .map_err(|e| SpecError::new(SpecErrorKind::Syntax, e.to_string(), ""))?;
    parse_rule_set(&value, registry, config)
}

/// Decodes YAML rule-spec text, then parses it.
#[cfg(feature = "yaml")]
pub fn parse_yaml(
    input: &str,
    registry: &RuleRegistry,
    config: &EngineConfig,
) -> Result<ParsedRuleSet, SpecError> {
    if input.trim().is_empty() {
        return Err(SpecError::new(SpecErrorKind::Syntax, "empty input", ""));
    }
    let value: Value = serde_saphyr::from_str(input)
        .map_err(|e| SpecError::new(SpecErrorKind::Syntax, e.to_string(), ""))?;
    parse_rule_set(&value, registry, config)
}

fn check_field_pattern(pattern: &str, config: &EngineConfig) -> Result<(), SpecError> {
    if pattern.is_empty() || pattern.split('.').any(str::is_empty) {
        return Err(SpecError::new(
            SpecErrorKind::InvalidFieldPattern,
            format!("field pattern '{}' has an empty segment", pattern),
            pattern,
        ));
    }
    let segments = pattern.split('.').count();
    if segments > config.max_pattern_segments {
        return Err(SpecError::new(
            SpecErrorKind::InvalidFieldPattern,
            format!(
                "field pattern has {} segments, limit is {}",
                segments, config.max_pattern_segments
            ),
            pattern,
        ));
    }
    Ok(())
}

// ─── rule entries ───────────────────────────────────────────────────────────

fn parse_item(
    entry: &Value,
    path: &str,
    registry: &RuleRegistry,
    config: &EngineConfig,
) -> Result<ParsedRuleItem, SpecError> {
    let Value::Array(parts) = entry else {
        return parse_rule(entry, path, registry, config).map(ParsedRuleItem::Rule);
    };
    if parts.first().and_then(Value::as_str) != Some(WHEN) {
        return parse_rule(entry, path, registry, config).map(ParsedRuleItem::Rule);
    }

    if parts.len() < 3 || parts.len() > 4 {
        return Err(SpecError::new(
            SpecErrorKind::Structural,
            "conditional rule must be [\"when\", condition, then, else?]",
            path,
        ));
    }

    let condition = parse_condition_at(&parts[1], &format!("{}[1]", path), 0, config)?;
    let then = parse_branch(&parts[2], &format!("{}[2]", path), registry, config)?;
    let otherwise = match parts.get(3) {
        None | Some(Value::Null) => None,
        Some(branch) => Some(parse_branch(branch, &format!("{}[3]", path), registry, config)?),
    };

    Ok(ParsedRuleItem::Conditional {
        condition,
        then,
        otherwise,
    })
}

fn parse_branch(
    branch: &Value,
    path: &str,
    registry: &RuleRegistry,
    config: &EngineConfig,
) -> Result<Vec<BoundRule>, SpecError> {
    let entries = branch.as_array().ok_or_else(|| {
        SpecError::new(
            SpecErrorKind::Structural,
            "conditional branch must be a sequence of rules",
            path,
        )
    })?;

    let mut rules = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let entry_path = format!("{}[{}]", path, i);
        let nested = entry
            .as_array()
            .and_then(|parts| parts.first())
            .and_then(Value::as_str)
            == Some(WHEN);
        if nested {
            return Err(SpecError::new(
                SpecErrorKind::Structural,
                "conditional rules cannot be nested inside a branch",
                &entry_path,
            ));
        }
        rules.push(parse_rule(entry, &entry_path, registry, config)?);
    }
    Ok(rules)
}

/// Parses a Simple (`"name"`) or Parameterized (`["name", ...params]`) rule.
fn parse_rule(
    entry: &Value,
    path: &str,
    registry: &RuleRegistry,
    config: &EngineConfig,
) -> Result<BoundRule, SpecError> {
    let (name, raw_params): (&str, &[Value]) = match entry {
        Value::String(name) => (name.as_str(), &[]),
        Value::Array(parts) => match parts.split_first() {
            Some((Value::String(name), rest)) => (name.as_str(), rest),
            Some(_) => {
                return Err(SpecError::new(
                    SpecErrorKind::Structural,
                    "parameterized rule must start with a rule name",
                    path,
                ));
            }
            None => {
                return Err(SpecError::new(
                    SpecErrorKind::Structural,
                    "rule sequence must not be empty",
                    path,
                ));
            }
        },
        _ => {
            return Err(SpecError::new(
                SpecErrorKind::Structural,
                "rule must be a string or a sequence",
                path,
            ));
        }
    };

    check_rule_name(name, path, config)?;

    let handler = registry.lookup(name).ok_or_else(|| {
        SpecError::new(
            SpecErrorKind::UnknownRule,
            format!("unknown rule '{}'", name),
            path,
        )
    })?;

    let mut params = Vec::with_capacity(raw_params.len());
    for raw in raw_params {
        if !handler.compiles_patterns() {
            params.push(Param::Value(raw.clone()));
            continue;
        }
        let compiled = match raw {
            Value::String(source) => Some(Pattern::new(source, "")),
            other => Pattern::from_wire(other),
        };
        let param = match compiled {
            Some(compiled) => Param::Pattern(compiled.map_err(|msg| {
                SpecError::new(SpecErrorKind::InvalidPattern, msg, path)
            })?),
            None => Param::Value(raw.clone()),
        };
        params.push(param);
    }

    handler.check_params(&params).map_err(|msg| {
        SpecError::new(
            SpecErrorKind::Structural,
            format!("rule '{}' {}", name, msg),
            path,
        )
    })?;

    Ok(BoundRule {
        name: name.to_string(),
        params,
        handler,
    })
}

/// Checks a rule name against the length budget and `^[a-z][a-z0-9_]*$`.
pub fn check_rule_name(name: &str, path: &str, config: &EngineConfig) -> Result<(), SpecError> {
    if name.len() > config.max_rule_name_length {
        return Err(SpecError::new(
            SpecErrorKind::InvalidRuleName,
            format!(
                "rule name is {} bytes long, limit is {}",
                name.len(),
                config.max_rule_name_length
            ),
            path,
        ));
    }
    if !RULE_NAME_RE.is_match(name) {
        return Err(SpecError::new(
            SpecErrorKind::InvalidRuleName,
            format!("invalid rule name '{}'", name),
            path,
        ));
    }
    Ok(())
}

// ─── conditions ─────────────────────────────────────────────────────────────

/// Parses a condition in its wire form.
pub fn parse_condition(value: &Value, config: &EngineConfig) -> Result<Condition, SpecError> {
    parse_condition_at(value, "", 0, config)
}

fn condition_error(message: impl Into<String>, path: &str) -> SpecError {
    SpecError::new(SpecErrorKind::InvalidCondition, message, path)
}

fn parse_condition_at(
    value: &Value,
    path: &str,
    depth: usize,
    config: &EngineConfig,
) -> Result<Condition, SpecError> {
    if depth > config.max_condition_depth {
        return Err(condition_error(
            format!("conditions nest deeper than {}", config.max_condition_depth),
            path,
        ));
    }

    let parts = value
        .as_array()
        .ok_or_else(|| condition_error("condition must be a sequence", path))?;
    let head = parts
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| condition_error("condition must start with a string", path))?;

    match head {
        "and" | "or" => {
            let logic = if head == "and" { Logic::And } else { Logic::Or };
            if parts.len() < 2 {
                return Err(condition_error(
                    format!("'{}' needs at least one sub-condition", head),
                    path,
                ));
            }
            let mut conditions = Vec::with_capacity(parts.len() - 1);
            for (i, child) in parts.iter().enumerate().skip(1) {
                let child_path = format!("{}[{}]", path, i);
                conditions.push(parse_condition_at(child, &child_path, depth + 1, config)?);
            }
            Ok(Condition::Compound { logic, conditions })
        }
        _ if head.starts_with('@') => parse_self_condition(head, &parts[1..], path).map(Condition::Current),
        _ => parse_field_condition(head, &parts[1..], path),
    }
}

fn parse_self_condition(head: &str, args: &[Value], path: &str) -> Result<SelfCondition, SpecError> {
    let arity = |n: usize| -> Result<(), SpecError> {
        if args.len() == n {
            Ok(())
        } else {
            Err(condition_error(
                format!("'{}' takes {} argument(s), got {}", head, n, args.len()),
                path,
            ))
        }
    };

    match head {
        "@empty" => arity(0).map(|_| SelfCondition::Empty),
        "@filled" => arity(0).map(|_| SelfCondition::Filled),
        "@length" => {
            arity(2)?;
            let op = parse_op(&args[0], path)?;
            let n = args[1]
                .as_f64()
                .ok_or_else(|| condition_error("'@length' expects a number", path))?;
            Ok(SelfCondition::Length(op, n))
        }
        "@value" => {
            arity(2)?;
            let op = parse_op(&args[0], path)?;
            if !op.is_equality() {
                return Err(condition_error("'@value' only supports '=' and '!='", path));
            }
            Ok(SelfCondition::Value(op, args[1].clone()))
        }
        "@type" => {
            arity(1)?;
            let name = args[0]
                .as_str()
                .and_then(TypeName::parse)
                .ok_or_else(|| condition_error(format!("unknown type name {}", args[0]), path))?;
            Ok(SelfCondition::Type(name))
        }
        "@matches" => {
            arity(1)?;
            let compiled = match &args[0] {
                Value::String(source) => Pattern::new(source, ""),
                other => Pattern::from_wire(other).unwrap_or_else(|| {
                    Err("'@matches' expects a string or {source, flags}".to_string())
                }),
            };
            compiled
                .map(SelfCondition::Matches)
                .map_err(|msg| SpecError::new(SpecErrorKind::InvalidPattern, msg, path))
        }
        other => Err(condition_error(format!("unknown condition '{}'", other), path)),
    }
}

fn parse_field_condition(field: &str, args: &[Value], path: &str) -> Result<Condition, SpecError> {
    let op = args
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| condition_error("field condition needs an operator", path))?;

    let test = match (op, args.len()) {
        ("filled", 1) => FieldTest::Filled,
        ("empty", 1) => FieldTest::Empty,
        ("in" | "not_in", 2) => {
            let items = args[1]
                .as_array()
                .ok_or_else(|| condition_error(format!("'{}' expects a list", op), path))?
                .clone();
            if op == "in" {
                FieldTest::In(items)
            } else {
                FieldTest::NotIn(items)
            }
        }
        (_, 2) => {
            let compare = CompareOp::parse(op)
                .ok_or_else(|| condition_error(format!("unknown operator '{}'", op), path))?;
            FieldTest::Compare(compare, args[1].clone())
        }
        _ => {
            return Err(condition_error(
                format!("malformed field condition on '{}'", field),
                path,
            ));
        }
    };

    Ok(Condition::Field {
        path: field.to_string(),
        test,
    })
}

fn parse_op(value: &Value, path: &str) -> Result<CompareOp, SpecError> {
    value
        .as_str()
        .and_then(CompareOp::parse)
        .ok_or_else(|| condition_error(format!("unknown operator {}", value), path))
}
