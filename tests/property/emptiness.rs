use super::common::arb_json;
use fieldrules::primitives::{is_empty, strict_equal};
use proptest::prelude::*;
use serde_json::{Value, json};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    // Strings are empty exactly when they trim to nothing.
    #[test]
    fn string_emptiness_matches_trim(s in "\\PC{0,20}") {
        let value = Value::String(s.clone());
        prop_assert_eq!(is_empty(Some(&value)), s.trim().is_empty());
    }

    #[test]
    fn numbers_and_booleans_are_never_empty(n in any::<i64>(), b in any::<bool>()) {
        prop_assert!(!is_empty(Some(&json!(n))));
        prop_assert!(!is_empty(Some(&json!(b))));
    }

    #[test]
    fn arrays_are_empty_only_without_items(items in prop::collection::vec(arb_json(1), 0..4)) {
        let len = items.len();
        prop_assert_eq!(is_empty(Some(&Value::Array(items))), len == 0);
    }

    #[test]
    fn strict_equality_is_reflexive(value in arb_json(3)) {
        prop_assert!(strict_equal(&value, &value));
    }

    #[test]
    fn integers_equal_their_float_form(n in -1_000_000i64..1_000_000) {
        prop_assert!(strict_equal(&json!(n), &json!(n as f64)));
        prop_assert!(!strict_equal(&json!(n), &json!(n.to_string())));
    }
}
