use super::common::{arb_json, arb_key_path};
use fieldrules::primitives::{expand_wildcards, resolve_path, set_path};
use proptest::prelude::*;
use serde_json::{Value, json};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn set_then_resolve_returns_value(segments in arb_key_path(), value in arb_json(2)) {
        let path = segments.join(".");
        let mut tree = json!({});
        set_path(&mut tree, &path, value.clone());
        prop_assert_eq!(resolve_path(&path, &tree), Some(&value));
    }

    #[test]
    fn plain_pattern_expands_to_resolve(segments in arb_key_path(), record in arb_json(3)) {
        let path = segments.join(".");
        let expanded = expand_wildcards(&path, &record);
        prop_assert_eq!(expanded.len(), 1);
        prop_assert_eq!(&expanded[0].0, &path);
        prop_assert_eq!(expanded[0].1, resolve_path(&path, &record));
    }

    // One concrete path per element, in index order, each resolving to its element.
    #[test]
    fn wildcard_over_array_yields_one_path_per_item(
        items in prop::collection::vec(arb_json(1), 0..8),
    ) {
        let record = json!({ "items": items });
        let expanded = expand_wildcards("items.*", &record);
        prop_assert_eq!(expanded.len(), items.len());
        for (i, (path, value)) in expanded.iter().enumerate() {
            prop_assert_eq!(path, &format!("items.{}", i));
            prop_assert_eq!(*value, Some(&items[i]));
            prop_assert_eq!(resolve_path(path, &record), Some(&items[i]));
        }
    }

    #[test]
    fn expansion_is_deterministic(record in arb_json(3)) {
        let first: Vec<(String, Option<Value>)> = expand_wildcards("*.*", &record)
            .into_iter()
            .map(|(p, v)| (p, v.cloned()))
            .collect();
        let second: Vec<(String, Option<Value>)> = expand_wildcards("*.*", &record)
            .into_iter()
            .map(|(p, v)| (p, v.cloned()))
            .collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn resolve_never_panics(path in "\\PC{0,30}", value in arb_json(2)) {
        let _ = resolve_path(&path, &value);
        let _ = expand_wildcards(&path, &value);
    }
}
