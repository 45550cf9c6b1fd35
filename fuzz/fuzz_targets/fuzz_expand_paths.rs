#![no_main]

use fieldrules::primitives::{expand_wildcards, resolve_path, set_path};
use libfuzzer_sys::fuzz_target;
use serde_json::{Value, json};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks the split between pattern and JSON record.
    let split = data[0] as usize % data.len();
    let (path_bytes, value_bytes) = data.split_at(split);

    let pattern = String::from_utf8_lossy(path_bytes);

    if let Ok(record) = serde_json::from_slice::<Value>(value_bytes) {
        let _ = resolve_path(&pattern, &record);
        let mut out = json!({});
        for (path, value) in expand_wildcards(&pattern, &record) {
            if let Some(value) = value {
                set_path(&mut out, &path, value.clone());
            }
        }
    }
});
