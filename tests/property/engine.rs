use super::common::arb_json;
use fieldrules::{RuleRegistry, Validator};
use proptest::prelude::*;
use serde_json::{Value, json};

fn validator() -> Validator {
    let spec = json!({
        "name": ["required", "string", ["between", 2, 8]],
        "age": ["nullable", "integer", ["min", 0]],
        "tags.*": ["string", "alpha_dash"],
        "kind": [["when", ["@filled"], [["in", "a", "b"]]]],
        "ref": [["when", ["kind", "=", "a"], ["required"], ["nullable"]]],
    });
    Validator::new(&spec, &RuleRegistry::default()).unwrap()
}

fn arb_record() -> impl Strategy<Value = Value> {
    (
        prop::option::of(arb_json(1)),
        prop::option::of(arb_json(1)),
        prop::option::of(prop::collection::vec(arb_json(0), 0..4)),
        prop::option::of(prop_oneof![Just(json!("a")), Just(json!("b")), arb_json(0)]),
        prop::option::of(arb_json(0)),
    )
        .prop_map(|(name, age, tags, kind, reference)| {
            let mut record = serde_json::Map::new();
            let fields = [
                ("name", name),
                ("age", age),
                ("tags", tags.map(Value::Array)),
                ("kind", kind),
                ("ref", reference),
            ];
            for (key, value) in fields {
                if let Some(value) = value {
                    record.insert(key.to_string(), value);
                }
            }
            Value::Object(record)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn validation_is_idempotent(record in arb_record()) {
        let v = validator();
        prop_assert_eq!(v.validate(&record), v.validate(&record));
    }

    // valid ⇔ no errors; validated is empty whenever anything failed.
    #[test]
    fn validity_matches_errors(record in arb_record()) {
        let result = validator().validate(&record);
        prop_assert_eq!(result.valid, result.errors.is_empty());
        if !result.valid {
            prop_assert_eq!(&result.validated, &json!({}));
        }
    }

    // Every validated leaf is copied unchanged from the record.
    #[test]
    fn validated_is_a_subset_of_the_record(record in arb_record()) {
        let result = validator().validate(&record);
        if let Some(fields) = result.validated.as_object() {
            for (key, value) in fields {
                prop_assert_eq!(Some(value), record.get(key));
            }
        }
    }

    // Error lists are never empty and every error names its field.
    #[test]
    fn errors_carry_their_field(record in arb_record()) {
        let result = validator().validate(&record);
        for (field, errors) in &result.errors {
            prop_assert!(!errors.is_empty());
            for error in errors {
                prop_assert_eq!(error.params.get("field"), Some(&json!(field)));
            }
        }
    }

    #[test]
    fn validation_does_not_mutate_record(record in arb_record()) {
        let before = record.clone();
        let _ = validator().validate(&record);
        prop_assert_eq!(record, before);
    }
}
