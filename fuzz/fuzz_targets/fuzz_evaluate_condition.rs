#![no_main]

use fieldrules::EngineConfig;
use fieldrules::evaluate::evaluate_condition;
use fieldrules::parse::parse_condition;
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    // Input is a JSON array: [condition, current, record].
    let Ok(Value::Array(parts)) = serde_json::from_slice::<Value>(data) else {
        return;
    };
    let [condition, current, record] = parts.as_slice() else {
        return;
    };

    if let Ok(condition) = parse_condition(condition, &EngineConfig::default()) {
        let _ = evaluate_condition(&condition, Some(current), record);
        let _ = evaluate_condition(&condition, None, record);
    }
});
