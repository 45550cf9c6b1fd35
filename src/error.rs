use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Error kind for rule-specification failures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecErrorKind {
    /// A rule entry has the wrong shape (not a string or sequence, missing branches,
    /// wrong parameter count).
    Structural,
    /// A rule name fails the pattern or length check.
    InvalidRuleName,
    /// A rule name is well formed but not present in the registry.
    UnknownRule,
    /// A condition could not be decoded.
    InvalidCondition,
    /// A regular-expression parameter failed to compile or carries unknown flags.
    InvalidPattern,
    /// A field pattern is empty or exceeds the segment budget.
    InvalidFieldPattern,
    /// Rule-spec text could not be decoded as JSON or YAML.
    Syntax,
}

/// Produced while building a [`ParsedRuleSet`](crate::types::ParsedRuleSet).
///
/// Always fatal: no validator exists for a spec that produced one of these.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecError {
    pub kind: SpecErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl SpecError {
    pub(crate) fn new(kind: SpecErrorKind, message: impl Into<String>, path: &str) -> Self {
        SpecError {
            kind,
            message: message.into(),
            path: if path.is_empty() {
                None
            } else {
                Some(path.to_string())
            },
        }
    }
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", path, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for SpecError {}

/// A single field failure: a translation key plus interpolation parameters.
///
/// `params` always carries `field`; rules add their own (`min`, `max`, `actual`, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub key: String,
    pub params: Map<String, Value>,
}

impl ValidationError {
    pub fn new(key: impl Into<String>, field: &str) -> Self {
        let mut params = Map::new();
        params.insert("field".to_string(), Value::String(field.to_string()));
        ValidationError {
            key: key.into(),
            params,
        }
    }

    /// Adds an interpolation parameter.
    #[must_use]
    pub fn with_param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.params.get("field").and_then(Value::as_str) {
            Some(field) => write!(f, "{} ({})", self.key, field),
            None => write!(f, "{}", self.key),
        }
    }
}

/// Outcome of one `validate` call.
///
/// `errors` is keyed by concrete (wildcard-expanded) field path in evaluation order.
/// `validated` holds every addressed field when `valid`, and is an empty object otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: IndexMap<String, Vec<ValidationError>>,
    pub validated: Value,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Errors recorded for one concrete field path.
    pub fn errors_for(&self, field: &str) -> &[ValidationError] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Translation keys recorded for one concrete field path, in order.
    pub fn keys_for(&self, field: &str) -> Vec<&str> {
        self.errors_for(field).iter().map(|e| e.key.as_str()).collect()
    }
}

/// Serialization error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerializeError {
    pub message: String,
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SerializeError {}
