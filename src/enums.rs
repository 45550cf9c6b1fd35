//! Closed enumerations used by conditions.
//!
//! Each enum has a fixed wire spelling; anything else is rejected while parsing.

use serde::{Deserialize, Serialize};

/// Comparator shared by `@length`, `@value` and field conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
}

impl CompareOp {
    pub fn parse(op: &str) -> Option<CompareOp> {
        match op {
            "=" | "==" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Ne),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Gte),
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Lte),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }

    /// True for `=` and `!=`.
    pub fn is_equality(self) -> bool {
        matches!(self, CompareOp::Eq | CompareOp::Ne)
    }

    /// Applies the comparator to two numbers. Any comparison involving NaN is false,
    /// except `!=`.
    pub fn compare_f64(self, left: f64, right: f64) -> bool {
        match self {
            CompareOp::Eq => left == right,
            CompareOp::Ne => left != right,
            CompareOp::Gt => left > right,
            CompareOp::Gte => left >= right,
            CompareOp::Lt => left < right,
            CompareOp::Lte => left <= right,
        }
    }
}

/// How a compound condition combines its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Logic {
    And,
    Or,
}

impl Logic {
    pub fn as_str(self) -> &'static str {
        match self {
            Logic::And => "and",
            Logic::Or => "or",
        }
    }
}

/// Runtime category tested by `@type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeName {
    String,
    Number,
    Boolean,
    Array,
    Object,
    Null,
    Undefined,
}

impl TypeName {
    pub fn parse(name: &str) -> Option<TypeName> {
        match name {
            "string" => Some(TypeName::String),
            "number" => Some(TypeName::Number),
            "boolean" => Some(TypeName::Boolean),
            "array" => Some(TypeName::Array),
            "object" => Some(TypeName::Object),
            "null" => Some(TypeName::Null),
            "undefined" => Some(TypeName::Undefined),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeName::String => "string",
            TypeName::Number => "number",
            TypeName::Boolean => "boolean",
            TypeName::Array => "array",
            TypeName::Object => "object",
            TypeName::Null => "null",
            TypeName::Undefined => "undefined",
        }
    }
}
