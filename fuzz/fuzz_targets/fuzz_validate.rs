#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use fieldrules::{RuleRegistry, Validator};
use libfuzzer_sys::fuzz_target;
use serde_json::{Value, json};

/// Generate an arbitrary JSON value from fuzzer bytes.
fn arbitrary_value(u: &mut Unstructured<'_>, depth: u32) -> arbitrary::Result<Value> {
    let max = if depth == 0 { 3 } else { 5 };
    match u.int_in_range(0..=max)? {
        0 => Ok(Value::Null),
        1 => Ok(Value::Bool(bool::arbitrary(u)?)),
        2 => Ok(Value::from(f64::arbitrary(u)?)),
        3 => Ok(Value::String(String::arbitrary(u)?)),
        4 => {
            let len = u.int_in_range(0..=4)?;
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(arbitrary_value(u, depth - 1)?);
            }
            Ok(Value::Array(items))
        }
        _ => {
            let len = u.int_in_range(0..=4)?;
            let mut map = serde_json::Map::new();
            for _ in 0..len {
                map.insert(String::arbitrary(u)?, arbitrary_value(u, depth - 1)?);
            }
            Ok(Value::Object(map))
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let spec = json!({
        "name": ["required", "string", ["between", 1, 16], "alpha_dash"],
        "age": ["nullable", "integer", ["min", 0]],
        "items.*.qty": ["required", "numeric", ["max", 100]],
        "company": [["when", ["or", ["type", "=", "business"], ["@filled"]], ["required", "string"]]],
        "password": ["confirmed", ["regex", { "source": "[0-9]", "flags": "u" }]],
    });
    let Ok(validator) = Validator::new(&spec, &RuleRegistry::default()) else {
        return;
    };

    let mut u = Unstructured::new(data);
    let Ok(record) = arbitrary_value(&mut u, 3) else {
        return;
    };

    let first = validator.validate(&record);
    assert_eq!(first, validator.validate(&record));
    assert_eq!(first.valid, first.errors.is_empty());
});
