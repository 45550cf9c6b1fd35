//! Path resolution and value primitives.
//!
//! Shared by the condition evaluator, the validation engine and the built-in rules.
//! Nothing here mutates its input except [`set_path`], which only ever writes into
//! the output tree it is handed.

use crate::types::WILDCARD;
use serde_json::{Map, Value};

// ─── resolve_path ───────────────────────────────────────────────────────────

/// Resolves a dot-path against a value tree.
///
/// Object segments are looked up by key, array segments by canonical decimal index.
/// Returns `None` as soon as a segment cannot be followed. Empty path returns the
/// root value.
pub fn resolve_path<'a>(path: &str, value: &'a Value) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }

    let mut current = value;
    for segment in path.split('.') {
        current = child(current, segment)?;
    }
    Some(current)
}

fn child<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => parse_index(segment).and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Parses a non-negative integer literal with no sign or leading zeros.
pub fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if segment.len() > 1 && segment.starts_with('0') {
        return None;
    }
    segment.parse().ok()
}

// ─── set_path ───────────────────────────────────────────────────────────────

/// Writes `value` at `path` inside `tree`, creating intermediate containers.
///
/// A missing container becomes an array when the following segment is an index
/// literal, and an object otherwise. An array only grows by appending: an index
/// past its end re-keys the array as an object, so sparse numeric keys never
/// allocate holes.
pub fn set_path(tree: &mut Value, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('.').collect();
    let mut current = tree;

    for (i, segment) in segments.iter().enumerate() {
        let target = slot(current, segment);
        match segments.get(i + 1) {
            None => {
                *target = value;
                return;
            }
            Some(next) => {
                if !(target.is_object() || target.is_array()) {
                    *target = if parse_index(next).is_some() {
                        Value::Array(Vec::new())
                    } else {
                        Value::Object(Map::new())
                    };
                }
                current = target;
            }
        }
    }
}

fn slot<'a>(container: &'a mut Value, segment: &str) -> &'a mut Value {
    let index = parse_index(segment);
    let in_range = matches!((&*container, index), (Value::Array(items), Some(i)) if i <= items.len());
    if in_range {
        if let (Value::Array(items), Some(index)) = (container, index) {
            if index == items.len() {
                items.push(Value::Null);
            }
            return &mut items[index];
        }
        unreachable!();
    }
    match (container, index) {
        (Value::Object(map), _) => map.entry(segment.to_string()).or_insert(Value::Null),
        (other, _) => {
            // Keyed or out-of-range write into an array, or into a scalar: re-key as an object.
            let keyed: Map<String, Value> = match std::mem::take(other) {
                Value::Array(items) => items
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), v))
                    .collect(),
                _ => Map::new(),
            };
            *other = Value::Object(keyed);
            slot(other, segment)
        }
    }
}

// ─── expand_wildcards ───────────────────────────────────────────────────────

/// Expands a field pattern into `(concrete_path, value)` pairs.
///
/// Without a `*` segment this is a single pair with the resolved value (possibly
/// absent). With wildcards, arrays are walked in index order and objects in
/// insertion order; several wildcards expand outer-to-inner. A wildcard over a
/// missing or scalar value contributes nothing.
pub fn expand_wildcards<'a>(pattern: &str, record: &'a Value) -> Vec<(String, Option<&'a Value>)> {
    if !has_wildcard(pattern) {
        return vec![(pattern.to_string(), resolve_path(pattern, record))];
    }

    let segments: Vec<&str> = pattern.split('.').collect();
    let mut out = Vec::new();
    expand_into(&segments, Some(record), String::new(), &mut out);
    out
}

pub fn has_wildcard(pattern: &str) -> bool {
    pattern.split('.').any(|segment| segment == WILDCARD)
}

fn expand_into<'a>(
    segments: &[&str],
    current: Option<&'a Value>,
    prefix: String,
    out: &mut Vec<(String, Option<&'a Value>)>,
) {
    let Some((head, rest)) = segments.split_first() else {
        out.push((prefix, current));
        return;
    };

    if *head == WILDCARD {
        match current {
            Some(Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    expand_into(rest, Some(item), join_path(&prefix, &i.to_string()), out);
                }
            }
            Some(Value::Object(map)) => {
                for (key, item) in map {
                    expand_into(rest, Some(item), join_path(&prefix, key), out);
                }
            }
            _ => {}
        }
    } else {
        let next = current.and_then(|v| child(v, head));
        expand_into(rest, next, join_path(&prefix, head), out);
    }
}

fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

// ─── value predicates ───────────────────────────────────────────────────────

/// The canonical emptiness predicate.
///
/// Absent, `null`, whitespace-only strings and empty arrays are empty.
/// `0`, `false` and `{}` are not.
pub fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Strict equality between two present values.
///
/// No type coercion: `1` never equals `"1"`. Integer 42 equals float 42.0;
/// arrays and objects compare structurally, objects ignoring key order.
pub fn strict_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(fa), Some(fb)) => fa == fb,
            _ => a == b,
        },
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(a, b)| strict_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            if a.len() != b.len() {
                return false;
            }
            a.iter()
                .all(|(k, v)| b.get(k).is_some_and(|bv| strict_equal(v, bv)))
        }
        _ => false,
    }
}

/// Numeric coercion used by ordering comparators.
///
/// `null` → 0, booleans → 0/1, numeric strings → their value (blank → 0), anything
/// else (including absent) → NaN, so every ordering against it is false.
///
/// Strings go through Rust's `f64` parser: `"inf"`, `"infinity"` and `"nan"` are
/// accepted (case-insensitively), while hex (`"0x1A"`), binary and octal literals
/// are not and become NaN.
pub fn to_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        _ => f64::NAN,
    }
}

/// Character count for strings, element count for arrays, 0 for everything else.
pub fn length_of(value: Option<&Value>) -> usize {
    match value {
        Some(Value::String(s)) => s.chars().count(),
        Some(Value::Array(items)) => items.len(),
        _ => 0,
    }
}

/// A JSON number for `n`, integral when `n` has no fractional part.
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Scalars render naturally; arrays and objects render as compact JSON.
pub fn value_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        _ => serde_json::to_string(v).unwrap_or_default(),
    }
}
