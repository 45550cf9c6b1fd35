use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::enums::*;
use crate::primitives::number_value;
use crate::registry::RuleHandler;
use regex::{Regex, RegexBuilder};

/// The wildcard segment marker in field patterns.
pub const WILDCARD: &str = "*";

// ─── Pattern ────────────────────────────────────────────────────────────────

/// A regular expression carried as a `{source, flags}` pair and compiled once.
///
/// Equality and serialization only look at `source` and `flags`.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    flags: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles `source` with the given flag letters.
    ///
    /// `i`, `m`, `s` and `x` map onto the matching regex options; `u`, `g` and `y`
    /// are accepted without effect. Any other letter is an error.
    pub fn new(source: &str, flags: &str) -> Result<Pattern, String> {
        let mut builder = RegexBuilder::new(source);
        for flag in flags.chars() {
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                'x' => {
                    builder.ignore_whitespace(true);
                }
                'u' | 'g' | 'y' => {}
                other => return Err(format!("unsupported regex flag '{}'", other)),
            }
        }
        let regex = builder
            .build()
            .map_err(|e| format!("invalid regex '{}': {}", source, e))?;
        Ok(Pattern {
            source: source.to_string(),
            flags: flags.to_string(),
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Decodes the `{source, flags}` object form. Returns `None` for anything else.
    pub fn from_wire(value: &Value) -> Option<Result<Pattern, String>> {
        let obj = value.as_object()?;
        let source = obj.get("source")?.as_str()?;
        let allowed = obj.keys().all(|k| k == "source" || k == "flags");
        if !allowed {
            return None;
        }
        let flags = match obj.get("flags") {
            None | Some(Value::Null) => "",
            Some(Value::String(f)) => f.as_str(),
            Some(_) => return Some(Err("regex flags must be a string".to_string())),
        };
        Some(Pattern::new(source, flags))
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("source", &self.source)?;
        map.serialize_entry("flags", &self.flags)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match &value {
            Value::String(s) => Pattern::new(s, "").map_err(serde::de::Error::custom),
            _ => match Pattern::from_wire(&value) {
                Some(result) => result.map_err(serde::de::Error::custom),
                None => Err(serde::de::Error::custom(
                    "pattern must be a string or a {source, flags} object",
                )),
            },
        }
    }
}

// ─── Param ──────────────────────────────────────────────────────────────────

/// A rule parameter after parsing: plain data, or a compiled pattern.
#[derive(Clone, Debug, PartialEq)]
pub enum Param {
    Value(Value),
    Pattern(Pattern),
}

impl Param {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Param::Value(v) => Some(v),
            Param::Pattern(_) => None,
        }
    }

    pub fn as_pattern(&self) -> Option<&Pattern> {
        match self {
            Param::Pattern(p) => Some(p),
            Param::Value(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_value().and_then(Value::as_f64)
    }

    /// The parameter as it appears in interpolation and on the wire.
    pub fn to_value(&self) -> Value {
        match self {
            Param::Value(v) => v.clone(),
            Param::Pattern(p) => serde_json::json!({ "source": p.source(), "flags": p.flags() }),
        }
    }
}

impl Serialize for Param {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Param::Value(v) => v.serialize(serializer),
            Param::Pattern(p) => p.serialize(serializer),
        }
    }
}

// ─── Condition ──────────────────────────────────────────────────────────────

/// A boolean condition guarding a conditional rule.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    /// `["and" | "or", ...conditions]`
    Compound {
        logic: Logic,
        conditions: Vec<Condition>,
    },
    /// `["@...", ...]`: looks only at the value under validation.
    Current(SelfCondition),
    /// `[path, op, value]` or `[path, "filled" | "empty"]`
    Field { path: String, test: FieldTest },
}

/// Conditions on the current field's own value.
#[derive(Clone, Debug, PartialEq)]
pub enum SelfCondition {
    Empty,
    Filled,
    Length(CompareOp, f64),
    /// Only `=` and `!=` are accepted.
    Value(CompareOp, Value),
    Type(TypeName),
    Matches(Pattern),
}

/// What a field condition checks about the other field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldTest {
    Compare(CompareOp, Value),
    In(Vec<Value>),
    NotIn(Vec<Value>),
    Filled,
    Empty,
}

impl Condition {
    /// Renders the condition in its wire form.
    pub fn to_value(&self) -> Value {
        match self {
            Condition::Compound { logic, conditions } => {
                let mut out = vec![Value::from(logic.as_str())];
                out.extend(conditions.iter().map(Condition::to_value));
                Value::Array(out)
            }
            Condition::Current(check) => match check {
                SelfCondition::Empty => serde_json::json!(["@empty"]),
                SelfCondition::Filled => serde_json::json!(["@filled"]),
                SelfCondition::Length(op, n) => {
                    serde_json::json!(["@length", op.as_str(), number_value(*n)])
                }
                SelfCondition::Value(op, expected) => {
                    serde_json::json!(["@value", op.as_str(), expected])
                }
                SelfCondition::Type(name) => serde_json::json!(["@type", name.as_str()]),
                SelfCondition::Matches(pattern) => serde_json::json!(["@matches", pattern]),
            },
            Condition::Field { path, test } => match test {
                FieldTest::Compare(op, expected) => serde_json::json!([path, op.as_str(), expected]),
                FieldTest::In(items) => serde_json::json!([path, "in", items]),
                FieldTest::NotIn(items) => serde_json::json!([path, "not_in", items]),
                FieldTest::Filled => serde_json::json!([path, "filled"]),
                FieldTest::Empty => serde_json::json!([path, "empty"]),
            },
        }
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

// ─── Parsed rules ───────────────────────────────────────────────────────────

/// A Simple or Parameterized rule bound to its handler.
#[derive(Clone)]
pub struct BoundRule {
    pub name: String,
    pub params: Vec<Param>,
    pub handler: Arc<dyn RuleHandler>,
}

impl BoundRule {
    /// True for the bare `nullable` modifier.
    pub fn is_nullable_modifier(&self) -> bool {
        self.name == "nullable" && self.params.is_empty()
    }
}

impl PartialEq for BoundRule {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.params == other.params
    }
}

impl fmt::Debug for BoundRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundRule")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("bail_on_failure", &self.handler.bail_on_failure())
            .field("skip_if_empty", &self.handler.skip_if_empty())
            .finish()
    }
}

/// One entry in a field's rule list.
#[derive(Clone, Debug, PartialEq)]
pub enum ParsedRuleItem {
    Rule(BoundRule),
    Conditional {
        condition: Condition,
        then: Vec<BoundRule>,
        otherwise: Option<Vec<BoundRule>>,
    },
}

/// The rules declared for one field pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldRules {
    pub pattern: String,
    pub rules: Vec<ParsedRuleItem>,
}

impl FieldRules {
    pub fn is_wildcard(&self) -> bool {
        self.pattern.split('.').any(|segment| segment == WILDCARD)
    }
}

/// Field pattern → rule list, in declaration order. Immutable once built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedRuleSet {
    fields: Vec<FieldRules>,
}

impl ParsedRuleSet {
    pub(crate) fn new(fields: Vec<FieldRules>) -> Self {
        ParsedRuleSet { fields }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldRules> {
        self.fields.iter()
    }

    pub fn get(&self, pattern: &str) -> Option<&[ParsedRuleItem]> {
        self.fields
            .iter()
            .find(|f| f.pattern == pattern)
            .map(|f| f.rules.as_slice())
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.pattern.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
