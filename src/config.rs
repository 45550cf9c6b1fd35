//! Construction-time limits.

use serde::{Deserialize, Serialize};

/// Budgets enforced while a rule specification is parsed.
///
/// Deserializable so hosts can carry it in their own configuration files; missing
/// keys fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Longest accepted rule name, in bytes.
    pub max_rule_name_length: usize,
    /// Most dot-separated segments a field pattern may have.
    pub max_pattern_segments: usize,
    /// Deepest nesting of `and`/`or` conditions.
    pub max_condition_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_rule_name_length: 64,
            max_pattern_segments: 32,
            max_condition_depth: 16,
        }
    }
}
