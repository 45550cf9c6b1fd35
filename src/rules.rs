//! Built-in leaf rules.
//!
//! Every rule is a small stateless value implementing [`RuleHandler`]. Error keys
//! share the `validation.` prefix and always carry the `field` parameter.

use crate::error::ValidationError;
use crate::primitives::{is_empty, number_value, resolve_path, strict_equal, value_to_string};
use crate::registry::{RuleHandler, RuleRegistry};
use crate::types::Param;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$").unwrap()
});

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://[^\s/?#]+[^\s]*$").unwrap());

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

static ALPHA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\p{L}+$").unwrap());

static ALPHA_NUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}]+$").unwrap());

static ALPHA_DASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}_-]+$").unwrap());

/// Registers every built-in rule into `registry`.
pub fn register_builtins(registry: &mut RuleRegistry) {
    registry.register(Required);
    registry.register(Nullable);
    registry.register(Present);
    registry.register(Accepted);
    registry.register(RequiredIf);
    registry.register(RequiredWith);

    registry.register(TypeRule::new("string", Value::is_string));
    registry.register(TypeRule::new("integer", is_integer));
    registry.register(TypeRule::new("numeric", is_numeric));
    registry.register(TypeRule::new("boolean", Value::is_boolean));
    registry.register(TypeRule::new("array", Value::is_array));
    registry.register(TypeRule::new("object", Value::is_object));

    registry.register(SizeRule::new("min", Bound::Min));
    registry.register(SizeRule::new("max", Bound::Max));
    registry.register(SizeRule::new("between", Bound::Between));
    registry.register(SizeRule::new("size", Bound::Exact));

    registry.register(Membership::new("in", true));
    registry.register(Membership::new("not_in", false));

    registry.register(PatternRule::new("regex", true));
    registry.register(PatternRule::new("not_regex", false));
    registry.register(FormatRule::new("email", &EMAIL_RE));
    registry.register(FormatRule::new("url", &URL_RE));
    registry.register(FormatRule::new("uuid", &UUID_RE));
    registry.register(FormatRule::new("alpha", &ALPHA_RE));
    registry.register(FormatRule::new("alpha_num", &ALPHA_NUM_RE));
    registry.register(FormatRule::new("alpha_dash", &ALPHA_DASH_RE));

    registry.register(SameAs::new("same", true));
    registry.register(SameAs::new("different", false));
    registry.register(Confirmed);
}

fn key(name: &str) -> String {
    format!("validation.{}", name)
}

fn expect_params(params: &[Param], min: usize, max: Option<usize>) -> Result<(), String> {
    if params.len() < min {
        return Err(format!("expects at least {} parameter(s), got {}", min, params.len()));
    }
    if let Some(max) = max
        && params.len() > max
    {
        return Err(format!("expects at most {} parameter(s), got {}", max, params.len()));
    }
    Ok(())
}

fn joined(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| value_to_string(&p.to_value()))
        .collect::<Vec<_>>()
        .join(", ")
}

// ─── presence ───────────────────────────────────────────────────────────────

/// Fails on empty values and stops the rest of the list.
pub struct Required;

impl RuleHandler for Required {
    fn name(&self) -> &str {
        "required"
    }

    fn validate(&self, value: Option<&Value>, _: &[Param], _: &Value, field: &str) -> Option<ValidationError> {
        is_empty(value).then(|| ValidationError::new(key("required"), field))
    }

    fn bail_on_failure(&self) -> bool {
        true
    }

    fn skip_if_empty(&self) -> bool {
        false
    }
}

/// Marker rule: an empty value short-circuits the whole field. Never fails.
pub struct Nullable;

impl RuleHandler for Nullable {
    fn name(&self) -> &str {
        "nullable"
    }

    fn validate(&self, _: Option<&Value>, _: &[Param], _: &Value, _: &str) -> Option<ValidationError> {
        None
    }
}

/// The key must exist; its value may be empty.
pub struct Present;

impl RuleHandler for Present {
    fn name(&self) -> &str {
        "present"
    }

    fn validate(&self, value: Option<&Value>, _: &[Param], _: &Value, field: &str) -> Option<ValidationError> {
        value
            .is_none()
            .then(|| ValidationError::new(key("present"), field))
    }

    fn skip_if_empty(&self) -> bool {
        false
    }
}

/// `true`, `1`, `"1"`, `"yes"`, `"on"` or `"true"`.
pub struct Accepted;

impl RuleHandler for Accepted {
    fn name(&self) -> &str {
        "accepted"
    }

    fn validate(&self, value: Option<&Value>, _: &[Param], _: &Value, field: &str) -> Option<ValidationError> {
        let accepted = match value {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64() == Some(1.0),
            Some(Value::String(s)) => matches!(s.as_str(), "1" | "yes" | "on" | "true"),
            _ => false,
        };
        (!accepted).then(|| ValidationError::new(key("accepted"), field))
    }

    fn skip_if_empty(&self) -> bool {
        false
    }
}

/// `["required_if", other, value, ...]`: required when `other` equals any listed value.
pub struct RequiredIf;

impl RuleHandler for RequiredIf {
    fn name(&self) -> &str {
        "required_if"
    }

    fn validate(&self, value: Option<&Value>, params: &[Param], record: &Value, field: &str) -> Option<ValidationError> {
        let other = params.first()?.as_str()?;
        let other_value = resolve_path(other, record)?;
        let triggered = params[1..]
            .iter()
            .filter_map(Param::as_value)
            .any(|expected| strict_equal(other_value, expected));
        (triggered && is_empty(value)).then(|| {
            ValidationError::new(key("required_if"), field)
                .with_param("other", other)
                .with_param("value", value_to_string(other_value))
        })
    }

    fn bail_on_failure(&self) -> bool {
        true
    }

    fn skip_if_empty(&self) -> bool {
        false
    }

    fn check_params(&self, params: &[Param]) -> Result<(), String> {
        expect_params(params, 2, None)?;
        match params[0].as_str() {
            Some(_) => Ok(()),
            None => Err("first parameter must be a field path".to_string()),
        }
    }
}

/// `["required_with", other, ...]`: required when any listed field is filled.
pub struct RequiredWith;

impl RuleHandler for RequiredWith {
    fn name(&self) -> &str {
        "required_with"
    }

    fn validate(&self, value: Option<&Value>, params: &[Param], record: &Value, field: &str) -> Option<ValidationError> {
        let others: Vec<&str> = params.iter().filter_map(Param::as_str).collect();
        let triggered = others
            .iter()
            .any(|other| !is_empty(resolve_path(other, record)));
        (triggered && is_empty(value)).then(|| {
            ValidationError::new(key("required_with"), field).with_param("values", others.join(", "))
        })
    }

    fn bail_on_failure(&self) -> bool {
        true
    }

    fn skip_if_empty(&self) -> bool {
        false
    }

    fn check_params(&self, params: &[Param]) -> Result<(), String> {
        expect_params(params, 1, None)?;
        if params.iter().all(|p| p.as_str().is_some()) {
            Ok(())
        } else {
            Err("parameters must be field paths".to_string())
        }
    }
}

// ─── types ──────────────────────────────────────────────────────────────────

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0),
        _ => false,
    }
}

fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
        _ => false,
    }
}

/// Runtime type check. Bails, since later rules assume the type.
pub struct TypeRule {
    name: &'static str,
    check: fn(&Value) -> bool,
}

impl TypeRule {
    pub fn new(name: &'static str, check: fn(&Value) -> bool) -> Self {
        TypeRule { name, check }
    }
}

impl RuleHandler for TypeRule {
    fn name(&self) -> &str {
        self.name
    }

    fn validate(&self, value: Option<&Value>, _: &[Param], _: &Value, field: &str) -> Option<ValidationError> {
        let ok = value.is_some_and(|v| (self.check)(v));
        (!ok).then(|| ValidationError::new(key(self.name), field))
    }

    fn bail_on_failure(&self) -> bool {
        true
    }
}

// ─── size ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Min,
    Max,
    Between,
    Exact,
}

/// Measures strings by characters, arrays by length and numbers by value.
/// Other shapes are left to type rules.
pub struct SizeRule {
    name: &'static str,
    bound: Bound,
}

impl SizeRule {
    pub fn new(name: &'static str, bound: Bound) -> Self {
        SizeRule { name, bound }
    }
}

fn measure(value: &Value) -> Option<(f64, &'static str)> {
    match value {
        Value::String(s) => Some((s.chars().count() as f64, "string")),
        Value::Array(items) => Some((items.len() as f64, "array")),
        Value::Number(n) => n.as_f64().map(|f| (f, "numeric")),
        _ => None,
    }
}

impl RuleHandler for SizeRule {
    fn name(&self) -> &str {
        self.name
    }

    fn validate(&self, value: Option<&Value>, params: &[Param], _: &Value, field: &str) -> Option<ValidationError> {
        let (actual, kind) = measure(value?)?;
        let first = params.first()?.as_f64()?;
        let error_key = format!("validation.{}.{}", self.name, kind);

        let failed = match self.bound {
            Bound::Min => actual < first,
            Bound::Max => actual > first,
            Bound::Exact => actual != first,
            Bound::Between => {
                let second = params.get(1)?.as_f64()?;
                actual < first || actual > second
            }
        };
        if !failed {
            return None;
        }

        let error = ValidationError::new(error_key, field).with_param("actual", number_value(actual));
        Some(match self.bound {
            Bound::Min => error.with_param("min", number_value(first)),
            Bound::Max => error.with_param("max", number_value(first)),
            Bound::Exact => error.with_param("size", number_value(first)),
            Bound::Between => error
                .with_param("min", number_value(first))
                .with_param(
                    "max",
                    number_value(params.get(1).and_then(Param::as_f64).unwrap_or(first)),
                ),
        })
    }

    fn check_params(&self, params: &[Param]) -> Result<(), String> {
        let count = if self.bound == Bound::Between { 2 } else { 1 };
        expect_params(params, count, Some(count))?;
        if params.iter().all(|p| p.as_f64().is_some()) {
            Ok(())
        } else {
            Err("parameters must be numbers".to_string())
        }
    }
}

// ─── membership ─────────────────────────────────────────────────────────────

/// `in` / `not_in` with strict equality.
pub struct Membership {
    name: &'static str,
    inclusive: bool,
}

impl Membership {
    pub fn new(name: &'static str, inclusive: bool) -> Self {
        Membership { name, inclusive }
    }
}

impl RuleHandler for Membership {
    fn name(&self) -> &str {
        self.name
    }

    fn validate(&self, value: Option<&Value>, params: &[Param], _: &Value, field: &str) -> Option<ValidationError> {
        let value = value?;
        let found = params
            .iter()
            .filter_map(Param::as_value)
            .any(|candidate| strict_equal(value, candidate));
        (found != self.inclusive).then(|| {
            ValidationError::new(key(self.name), field).with_param("values", joined(params))
        })
    }

    fn check_params(&self, params: &[Param]) -> Result<(), String> {
        expect_params(params, 1, None)
    }
}

// ─── formats ────────────────────────────────────────────────────────────────

/// `regex` / `not_regex`. The pattern is compiled once when the rule set is built.
pub struct PatternRule {
    name: &'static str,
    must_match: bool,
}

impl PatternRule {
    pub fn new(name: &'static str, must_match: bool) -> Self {
        PatternRule { name, must_match }
    }
}

impl RuleHandler for PatternRule {
    fn name(&self) -> &str {
        self.name
    }

    fn validate(&self, value: Option<&Value>, params: &[Param], _: &Value, field: &str) -> Option<ValidationError> {
        let pattern = params.first()?.as_pattern()?;
        let ok = match value {
            Some(Value::String(s)) => pattern.is_match(s) == self.must_match,
            _ => false,
        };
        (!ok).then(|| ValidationError::new(key(self.name), field))
    }

    fn check_params(&self, params: &[Param]) -> Result<(), String> {
        expect_params(params, 1, Some(1))?;
        match params[0].as_pattern() {
            Some(_) => Ok(()),
            None => Err("parameter must be a pattern".to_string()),
        }
    }

    fn compiles_patterns(&self) -> bool {
        true
    }
}

/// Fixed-format string check backed by a shared regex.
pub struct FormatRule {
    name: &'static str,
    regex: &'static LazyLock<Regex>,
}

impl FormatRule {
    pub fn new(name: &'static str, regex: &'static LazyLock<Regex>) -> Self {
        FormatRule { name, regex }
    }
}

impl RuleHandler for FormatRule {
    fn name(&self) -> &str {
        self.name
    }

    fn validate(&self, value: Option<&Value>, _: &[Param], _: &Value, field: &str) -> Option<ValidationError> {
        let ok = match value {
            Some(Value::String(s)) => self.regex.is_match(s),
            _ => false,
        };
        (!ok).then(|| ValidationError::new(key(self.name), field))
    }
}

// ─── cross-field ────────────────────────────────────────────────────────────

/// `same` / `different`: compares against another field path.
pub struct SameAs {
    name: &'static str,
    equal: bool,
}

impl SameAs {
    pub fn new(name: &'static str, equal: bool) -> Self {
        SameAs { name, equal }
    }
}

impl RuleHandler for SameAs {
    fn name(&self) -> &str {
        self.name
    }

    fn validate(&self, value: Option<&Value>, params: &[Param], record: &Value, field: &str) -> Option<ValidationError> {
        let other = params.first()?.as_str()?;
        let equal = match (value, resolve_path(other, record)) {
            (Some(a), Some(b)) => strict_equal(a, b),
            _ => false,
        };
        (equal != self.equal)
            .then(|| ValidationError::new(key(self.name), field).with_param("other", other))
    }

    fn check_params(&self, params: &[Param]) -> Result<(), String> {
        expect_params(params, 1, Some(1))?;
        match params[0].as_str() {
            Some(_) => Ok(()),
            None => Err("parameter must be a field path".to_string()),
        }
    }
}

/// The value must equal `<field>_confirmation`.
pub struct Confirmed;

impl RuleHandler for Confirmed {
    fn name(&self) -> &str {
        "confirmed"
    }

    fn validate(&self, value: Option<&Value>, _: &[Param], record: &Value, field: &str) -> Option<ValidationError> {
        let confirmation = resolve_path(&format!("{}_confirmation", field), record);
        let equal = match (value, confirmation) {
            (Some(a), Some(b)) => strict_equal(a, b),
            _ => false,
        };
        (!equal).then(|| ValidationError::new(key("confirmed"), field))
    }
}
