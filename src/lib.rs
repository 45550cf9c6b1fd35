//! Declarative validation of JSON-like records.
//!
//! Rules are plain data: a map from field pattern to an ordered rule list. The
//! specification is parsed once into a [`Validator`]; each call to
//! [`Validator::validate`] walks the record and returns structured, translatable
//! errors plus the validated subset of the input:
//!
//! ```text
//! spec(json/yaml) → parse(spec, registry) → Validator → validate(record) → ValidationResult
//!                                                      → MessageFormatter::format → strings
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use fieldrules::{RuleRegistry, Validator};
//! use serde_json::json;
//!
//! let spec = json!({
//!     "email": ["required", "email"],
//!     "items.*.name": ["required", "string", ["max", 40]],
//!     "company_name": [["when", ["type", "=", "business"], ["required"]]],
//! });
//!
//! let validator = Validator::new(&spec, &RuleRegistry::default()).expect("valid rules");
//! let result = validator.validate(&json!({
//!     "email": "ada@example.com",
//!     "type": "personal",
//!     "items": [{ "name": "lamp" }],
//! }));
//! assert!(result.valid);
//! assert_eq!(result.validated["items"][0]["name"], "lamp");
//! ```
//!
//! # Rule specification
//!
//! Each rule is a bare name (`"required"`), a parameterized rule (`["min", 5]`) or a
//! conditional (`["when", condition, then, else?]`). Regex parameters are written
//! as strings or `{source, flags}` objects and compiled at construction time.
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `yaml`  | yes     | YAML rule specs via `serde-saphyr`: [`parse::parse_yaml`], [`Validator::from_yaml`], [`serialize::serialize_yaml`]. |

pub mod config;
pub mod enums;
pub mod error;
pub mod evaluate;
pub mod format;
pub mod messages;
pub mod parse;
pub mod primitives;
pub mod registry;
pub mod rules;
pub mod serialize;
pub mod types;
pub mod validate;

pub use config::EngineConfig;
pub use error::*;
pub use format::{FormatterOptions, MessageFormatter};
pub use registry::{RuleHandler, RuleRegistry};
pub use types::*;
pub use validate::Validator;

/// Convenience entry point: builds a validator over the built-in rules and runs it once.
///
/// # Errors
///
/// Returns a [`SpecError`] when `spec` is malformed. Field failures are reported in
/// the returned [`ValidationResult`], never as an error.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
///
/// let spec = json!({ "age": ["nullable", "integer", ["min", 18]] });
///
/// let result = fieldrules::check(&spec, &json!({ "age": 12 })).expect("valid rules");
/// assert!(!result.valid);
/// assert_eq!(result.keys_for("age"), ["validation.min.numeric"]);
///
/// let result = fieldrules::check(&spec, &json!({ "age": null })).expect("valid rules");
/// assert!(result.valid);
/// ```
pub fn check(
    spec: &serde_json::Value,
    record: &serde_json::Value,
) -> Result<ValidationResult, SpecError> {
    let validator = Validator::new(spec, &RuleRegistry::default())?;
    Ok(validator.validate(record))
}
