use fieldrules::{Param, RuleHandler, RuleRegistry, ValidationError, Validator};
use serde_json::{Value, json};

fn validator(spec: Value) -> Validator {
    Validator::new(&spec, &RuleRegistry::default()).expect("spec should parse")
}

// ─── Emptiness and presence ─────────────────────────────────────────────────

#[test]
fn required_treats_zero_and_false_as_filled() {
    let v = validator(json!({ "n": ["required"] }));

    assert!(v.validate(&json!({ "n": 0 })).valid);
    assert!(v.validate(&json!({ "n": false })).valid);
    assert!(v.validate(&json!({ "n": {} })).valid);

    for empty in [json!(null), json!(""), json!("   "), json!([])] {
        let result = v.validate(&json!({ "n": empty }));
        assert_eq!(result.keys_for("n"), ["validation.required"], "value {:?}", empty);
    }
    assert_eq!(v.validate(&json!({})).keys_for("n"), ["validation.required"]);
}

#[test]
fn optional_rules_skip_empty_values() {
    let v = validator(json!({ "nick": ["string", ["min", 3]] }));

    let result = v.validate(&json!({}));
    assert!(result.valid);
    assert_eq!(result.validated, json!({}));

    assert!(v.validate(&json!({ "nick": null })).valid);
    assert!(v.validate(&json!({ "nick": "" })).valid);
    assert_eq!(
        v.validate(&json!({ "nick": "ab" })).keys_for("nick"),
        ["validation.min.string"]
    );
}

#[test]
fn nullable_short_circuits_empty_values() {
    let v = validator(json!({ "age": ["nullable", "integer", ["min", 18]] }));

    assert!(v.validate(&json!({ "age": null })).valid);
    assert!(v.validate(&json!({})).valid);
    assert!(v.validate(&json!({ "age": 21 })).valid);
    assert_eq!(
        v.validate(&json!({ "age": "x" })).keys_for("age"),
        ["validation.integer"]
    );
}

#[test]
fn nullable_position_in_list_does_not_matter() {
    let v = validator(json!({ "age": ["required", "integer", "nullable"] }));
    assert!(v.validate(&json!({ "age": null })).valid);
}

// ─── Bail semantics ─────────────────────────────────────────────────────────

#[test]
fn required_failure_stops_the_list() {
    let v = validator(json!({ "name": ["required", "string", ["min", 5]] }));
    let result = v.validate(&json!({ "name": "" }));
    assert_eq!(result.keys_for("name"), ["validation.required"]);
}

#[test]
fn type_failure_stops_the_list() {
    let v = validator(json!({ "name": ["required", "string", ["min", 5]] }));
    let result = v.validate(&json!({ "name": 42 }));
    assert_eq!(result.keys_for("name"), ["validation.string"]);
}

#[test]
fn non_bailing_failures_accumulate() {
    let v = validator(json!({ "code": [["min", 5], "alpha", ["regex", "^x"]] }));
    let result = v.validate(&json!({ "code": "ab1" }));
    assert_eq!(
        result.keys_for("code"),
        ["validation.min.string", "validation.alpha", "validation.regex"]
    );
}

#[test]
fn top_level_bail_skips_later_conditionals() {
    let v = validator(json!({
        "code": ["string", ["when", ["@filled"], [["min", 10]]]],
    }));
    let result = v.validate(&json!({ "code": 5 }));
    assert_eq!(result.keys_for("code"), ["validation.string"]);
}

#[test]
fn bail_inside_branch_only_ends_the_branch() {
    let v = validator(json!({
        "code": [
            ["when", ["kind", "=", "numeric"], ["integer", ["min", 10]]],
            ["max", 3],
        ],
    }));
    let result = v.validate(&json!({ "kind": "numeric", "code": "abcd" }));
    assert_eq!(
        result.keys_for("code"),
        ["validation.integer", "validation.max.string"]
    );
}

// ─── Conditionals ───────────────────────────────────────────────────────────

#[test]
fn conditional_on_other_field() {
    let v = validator(json!({
        "type": ["required", ["in", "personal", "business"]],
        "company_name": [["when", ["type", "=", "business"], ["required", "string"]]],
    }));

    let result = v.validate(&json!({ "type": "business" }));
    assert!(!result.valid);
    assert_eq!(result.keys_for("company_name"), ["validation.required"]);

    let result = v.validate(&json!({ "type": "personal" }));
    assert!(result.valid);
    assert_eq!(result.validated, json!({ "type": "personal" }));

    assert!(
        v.validate(&json!({ "type": "business", "company_name": "Acme" }))
            .valid
    );
}

#[test]
fn else_branch_runs_when_condition_is_false() {
    let v = validator(json!({
        "code": [["when", ["type", "=", "business"], [["min", 5]], [["max", 2]]]],
    }));

    let personal = v.validate(&json!({ "type": "personal", "code": "abc" }));
    assert_eq!(personal.keys_for("code"), ["validation.max.string"]);

    let business = v.validate(&json!({ "type": "business", "code": "abc" }));
    assert_eq!(business.keys_for("code"), ["validation.min.string"]);
}

#[test]
fn missing_else_branch_is_a_no_op() {
    let v = validator(json!({
        "code": [["when", ["type", "=", "business"], ["required"]]],
    }));
    assert!(v.validate(&json!({})).valid);
}

#[test]
fn conditional_on_current_value() {
    let v = validator(json!({
        "code": [["when", ["@type", "number"], ["integer"], ["string", ["regex", "^[A-Z]+$"]]]],
    }));

    assert_eq!(
        v.validate(&json!({ "code": 1.5 })).keys_for("code"),
        ["validation.integer"]
    );
    assert_eq!(
        v.validate(&json!({ "code": "abc" })).keys_for("code"),
        ["validation.regex"]
    );
    assert!(v.validate(&json!({ "code": "ABC" })).valid);
    assert!(v.validate(&json!({ "code": 7 })).valid);
}

#[test]
fn compound_conditions_in_rules() {
    let v = validator(json!({
        "vat": [["when", ["or", ["country", "=", "DE"], ["country", "=", "FR"]], ["required"]]],
    }));
    assert!(!v.validate(&json!({ "country": "FR" })).valid);
    assert!(!v.validate(&json!({ "country": "DE" })).valid);
    assert!(v.validate(&json!({ "country": "US" })).valid);
}

// ─── Wildcards ──────────────────────────────────────────────────────────────

#[test]
fn wildcard_errors_are_reported_per_concrete_path() {
    let v = validator(json!({ "items.*.name": ["required"] }));
    let result = v.validate(&json!({
        "items": [{ "name": "lamp" }, {}, { "name": "" }],
    }));

    let fields: Vec<&str> = result.errors.keys().map(String::as_str).collect();
    assert_eq!(fields, ["items.1.name", "items.2.name"]);
    assert_eq!(result.keys_for("items.1.name"), ["validation.required"]);
}

#[test]
fn wildcard_over_missing_collection_checks_nothing() {
    let v = validator(json!({ "items.*.name": ["required"] }));
    assert!(v.validate(&json!({})).valid);
    assert!(v.validate(&json!({ "items": [] })).valid);
    assert!(v.validate(&json!({ "items": "nope" })).valid);
}

#[test]
fn nested_wildcards_expand_outer_to_inner() {
    let v = validator(json!({ "users.*.roles.*": ["string"] }));
    let result = v.validate(&json!({
        "users": [{ "roles": ["admin", 1] }, { "roles": [2] }],
    }));
    let fields: Vec<&str> = result.errors.keys().map(String::as_str).collect();
    assert_eq!(fields, ["users.0.roles.1", "users.1.roles.0"]);
}

#[test]
fn overlapping_patterns_share_one_error_list() {
    let v = validator(json!({
        "items.*.name": [["min", 3]],
        "items.0.name": ["alpha"],
    }));
    let result = v.validate(&json!({ "items": [{ "name": "a1" }] }));
    assert_eq!(
        result.keys_for("items.0.name"),
        ["validation.min.string", "validation.alpha"]
    );
}

#[test]
fn errors_follow_declaration_order() {
    let v = validator(json!({
        "b": ["required"],
        "a": ["required"],
        "c": ["required"],
    }));
    let result = v.validate(&json!({}));
    let fields: Vec<&str> = result.errors.keys().map(String::as_str).collect();
    assert_eq!(fields, ["b", "a", "c"]);
}

// ─── Validated output ───────────────────────────────────────────────────────

#[test]
fn validated_contains_only_addressed_fields() {
    let v = validator(json!({
        "name": ["required", "string"],
        "tags.*": ["string"],
        "items.*.name": ["string"],
        "nickname": ["string"],
    }));
    let result = v.validate(&json!({
        "name": "Ada",
        "tags": ["a", "b"],
        "items": [{ "name": "lamp", "price": 3 }],
        "extra": true,
    }));

    assert!(result.valid);
    assert_eq!(
        result.validated,
        json!({
            "name": "Ada",
            "tags": ["a", "b"],
            "items": [{ "name": "lamp" }],
        })
    );
}

#[test]
fn validated_object_wildcard_keeps_keys() {
    let v = validator(json!({ "prices.*": ["numeric"] }));
    let result = v.validate(&json!({ "prices": { "eur": 3, "usd": 4 } }));
    assert_eq!(result.validated, json!({ "prices": { "eur": 3, "usd": 4 } }));
}

#[test]
fn validated_object_wildcard_with_numeric_keys() {
    let v = validator(json!({ "prices.*": ["integer"] }));
    let record = json!({
        "prices": { "18446744073709551615": 1, "4000000000": 2, "0": 3 },
    });
    let result = v.validate(&record);
    assert!(result.valid);
    assert_eq!(result.validated, record);
}

#[test]
fn validated_is_empty_on_failure() {
    let v = validator(json!({
        "name": ["required"],
        "age": ["integer"],
    }));
    let result = v.validate(&json!({ "name": "Ada", "age": "old" }));
    assert!(!result.valid);
    assert_eq!(result.validated, json!({}));
}

#[test]
fn validation_is_idempotent() {
    let v = validator(json!({
        "email": ["required", "email"],
        "items.*.qty": ["integer", ["between", 1, 10]],
    }));
    let record = json!({ "email": "nope", "items": [{ "qty": 0 }, { "qty": 4 }] });

    let first = v.validate(&record);
    let second = v.validate(&record);
    assert_eq!(first, second);
}

#[test]
fn validator_is_shareable_across_threads() {
    let v = validator(json!({ "n": ["required", "integer"] }));

    std::thread::scope(|s| {
        for i in 0..4 {
            let v = &v;
            s.spawn(move || {
                let result = v.validate(&json!({ "n": i }));
                assert!(result.valid);
                assert_eq!(result.validated, json!({ "n": i }));
            });
        }
    });
}

// ─── Registry ───────────────────────────────────────────────────────────────

struct Even;

impl RuleHandler for Even {
    fn name(&self) -> &str {
        "even"
    }

    fn validate(&self, value: Option<&Value>, _: &[Param], _: &Value, field: &str) -> Option<ValidationError> {
        let even = value.and_then(Value::as_i64).is_some_and(|n| n % 2 == 0);
        (!even).then(|| ValidationError::new("validation.even", field))
    }
}

struct Never(&'static str);

impl RuleHandler for Never {
    fn name(&self) -> &str {
        self.0
    }

    fn validate(&self, _: Option<&Value>, _: &[Param], _: &Value, field: &str) -> Option<ValidationError> {
        Some(ValidationError::new("validation.never", field))
    }
}

#[test]
fn custom_rule_participates_like_builtins() {
    let mut registry = RuleRegistry::default();
    registry.register(Even);

    let v = Validator::new(&json!({ "n": ["integer", "even"] }), &registry).unwrap();
    assert!(v.validate(&json!({ "n": 4 })).valid);
    assert!(v.validate(&json!({})).valid);

    let result = v.validate(&json!({ "n": 3 }));
    assert_eq!(result.keys_for("n"), ["validation.even"]);
    assert_eq!(result.errors_for("n")[0].params["field"], "n");
}

#[test]
fn later_registration_does_not_affect_existing_validator() {
    let mut registry = RuleRegistry::default();
    let before = Validator::new(&json!({ "n": ["string"] }), &registry).unwrap();

    let replaced = registry.register(Never("string"));
    assert!(replaced.is_some());

    let after = Validator::new(&json!({ "n": ["string"] }), &registry).unwrap();

    assert!(before.validate(&json!({ "n": "x" })).valid);
    assert_eq!(
        after.validate(&json!({ "n": "x" })).keys_for("n"),
        ["validation.never"]
    );
}

#[test]
fn check_uses_builtin_rules() {
    let result = fieldrules::check(
        &json!({ "email": ["required", "email"] }),
        &json!({ "email": "ada@example.com" }),
    )
    .unwrap();
    assert!(result.is_valid());
    assert_eq!(result.validated, json!({ "email": "ada@example.com" }));
}
