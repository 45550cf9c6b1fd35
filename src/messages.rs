//! Built-in English message templates for the built-in rules.

use std::collections::HashMap;

/// The locale the built-in templates are written in.
pub const DEFAULT_LOCALE: &str = "en";

/// Translation key → template for the built-in rules.
pub static EN_MESSAGES: &[(&str, &str)] = &[
    ("validation.required", "The {field} field is required."),
    ("validation.present", "The {field} field must be present."),
    ("validation.accepted", "The {field} field must be accepted."),
    (
        "validation.required_if",
        "The {field} field is required when {other} is {value}.",
    ),
    (
        "validation.required_with",
        "The {field} field is required when {values} is present.",
    ),
    ("validation.string", "The {field} field must be a string."),
    ("validation.integer", "The {field} field must be an integer."),
    ("validation.numeric", "The {field} field must be a number."),
    ("validation.boolean", "The {field} field must be true or false."),
    ("validation.array", "The {field} field must be an array."),
    ("validation.object", "The {field} field must be an object."),
    (
        "validation.min.string",
        "The {field} field must be at least {min} characters.",
    ),
    ("validation.min.numeric", "The {field} field must be at least {min}."),
    (
        "validation.min.array",
        "The {field} field must have at least {min} items.",
    ),
    (
        "validation.max.string",
        "The {field} field must not be greater than {max} characters.",
    ),
    (
        "validation.max.numeric",
        "The {field} field must not be greater than {max}.",
    ),
    (
        "validation.max.array",
        "The {field} field must not have more than {max} items.",
    ),
    (
        "validation.between.string",
        "The {field} field must be between {min} and {max} characters.",
    ),
    (
        "validation.between.numeric",
        "The {field} field must be between {min} and {max}.",
    ),
    (
        "validation.between.array",
        "The {field} field must have between {min} and {max} items.",
    ),
    (
        "validation.size.string",
        "The {field} field must be {size} characters.",
    ),
    ("validation.size.numeric", "The {field} field must be {size}."),
    ("validation.size.array", "The {field} field must contain {size} items."),
    ("validation.in", "The selected {field} is invalid."),
    ("validation.not_in", "The selected {field} is invalid."),
    ("validation.regex", "The {field} field format is invalid."),
    ("validation.not_regex", "The {field} field format is invalid."),
    (
        "validation.email",
        "The {field} field must be a valid email address.",
    ),
    ("validation.url", "The {field} field must be a valid URL."),
    ("validation.uuid", "The {field} field must be a valid UUID."),
    ("validation.alpha", "The {field} field must only contain letters."),
    (
        "validation.alpha_num",
        "The {field} field must only contain letters and numbers.",
    ),
    (
        "validation.alpha_dash",
        "The {field} field must only contain letters, numbers, dashes, and underscores.",
    ),
    ("validation.same", "The {field} field must match {other}."),
    (
        "validation.different",
        "The {field} field and {other} must be different.",
    ),
    (
        "validation.confirmed",
        "The {field} field confirmation does not match.",
    ),
];

/// `{"en": {key: template}}` for every built-in rule.
pub fn default_messages() -> HashMap<String, HashMap<String, String>> {
    let en = EN_MESSAGES
        .iter()
        .map(|(key, template)| (key.to_string(), template.to_string()))
        .collect();
    HashMap::from([(DEFAULT_LOCALE.to_string(), en)])
}
