#![no_main]

use fieldrules::{RuleRegistry, Validator};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let registry = RuleRegistry::default();
    let _ = Validator::from_json(text, &registry);
    let _ = Validator::from_yaml(text, &registry);
});
