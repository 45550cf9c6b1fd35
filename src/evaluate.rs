//! Condition evaluation for conditional rules.
//!
//! Pure functions of the condition, the value under validation and the full record.

use crate::enums::*;
use crate::primitives::{is_empty, length_of, resolve_path, strict_equal, to_number};
use crate::types::*;
use serde_json::Value;

/// Evaluates `condition` against the current field value and the whole record.
///
/// `and` stops at the first false child, `or` at the first true one.
pub fn evaluate_condition(condition: &Condition, current: Option<&Value>, record: &Value) -> bool {
    match condition {
        Condition::Compound { logic, conditions } => match logic {
            Logic::And => conditions
                .iter()
                .all(|c| evaluate_condition(c, current, record)),
            Logic::Or => conditions
                .iter()
                .any(|c| evaluate_condition(c, current, record)),
        },
        Condition::Current(check) => evaluate_self(check, current),
        Condition::Field { path, test } => evaluate_field(test, resolve_path(path, record)),
    }
}

/// Checks that look only at the value under validation.
pub fn evaluate_self(check: &SelfCondition, value: Option<&Value>) -> bool {
    match check {
        SelfCondition::Empty => is_empty(value),
        SelfCondition::Filled => !is_empty(value),
        SelfCondition::Length(op, expected) => op.compare_f64(length_of(value) as f64, *expected),
        SelfCondition::Value(op, expected) => {
            let equal = value.is_some_and(|v| strict_equal(v, expected));
            match op {
                CompareOp::Ne => !equal,
                _ => equal,
            }
        }
        SelfCondition::Type(name) => type_matches(*name, value),
        SelfCondition::Matches(pattern) => match value {
            Some(Value::String(s)) => pattern.is_match(s),
            _ => false,
        },
    }
}

/// Checks against another field's resolved value.
///
/// Ordering comparators coerce both sides with [`to_number`]; a non-numeric side
/// becomes NaN and the comparison is false.
pub fn evaluate_field(test: &FieldTest, other: Option<&Value>) -> bool {
    match test {
        FieldTest::Compare(op, expected) => {
            if op.is_equality() {
                let equal = other.is_some_and(|v| strict_equal(v, expected));
                if *op == CompareOp::Eq { equal } else { !equal }
            } else {
                op.compare_f64(to_number(other), to_number(Some(expected)))
            }
        }
        FieldTest::In(items) => contains(items, other),
        FieldTest::NotIn(items) => !contains(items, other),
        FieldTest::Filled => !is_empty(other),
        FieldTest::Empty => is_empty(other),
    }
}

fn contains(items: &[Value], value: Option<&Value>) -> bool {
    match value {
        Some(v) => items.iter().any(|item| strict_equal(v, item)),
        None => false,
    }
}

fn type_matches(name: TypeName, value: Option<&Value>) -> bool {
    match (name, value) {
        (TypeName::Undefined, None) => true,
        (TypeName::Null, Some(Value::Null)) => true,
        (TypeName::String, Some(Value::String(_))) => true,
        (TypeName::Number, Some(Value::Number(_))) => true,
        (TypeName::Boolean, Some(Value::Bool(_))) => true,
        (TypeName::Array, Some(Value::Array(_))) => true,
        (TypeName::Object, Some(Value::Object(_))) => true,
        _ => false,
    }
}
