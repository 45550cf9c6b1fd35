//! Rendering structured errors into localized strings.

use crate::error::{ValidationError, ValidationResult};
use crate::messages::DEFAULT_LOCALE;
use crate::primitives::value_to_string;
use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashMap;

/// Locale → translation key → template.
pub type Messages = HashMap<String, HashMap<String, String>>;

/// Optional [`MessageFormatter`] settings.
#[derive(Clone, Debug, Default)]
pub struct FormatterOptions {
    /// Field path or pattern → display label. Patterns use `*` for one segment; the
    /// first matching pattern in insertion order wins.
    pub labels: IndexMap<String, String>,
    /// Fallback locale when a key is missing in the active one. Defaults to `"en"`.
    pub default_locale: Option<String>,
}

/// Turns [`ValidationError`]s into display strings.
///
/// Template lookup: active locale, then default locale, then the raw key.
/// `{name}` placeholders are filled from the error's params, with `{field}` always
/// replaced by the field's label. Unknown placeholders stay as written.
#[derive(Clone, Debug)]
pub struct MessageFormatter {
    messages: Messages,
    locale: String,
    default_locale: String,
    labels: IndexMap<String, String>,
    wildcard_labels: Vec<(Regex, String)>,
}

impl MessageFormatter {
    pub fn new(messages: Messages, locale: impl Into<String>, options: FormatterOptions) -> Self {
        let wildcard_labels = options
            .labels
            .iter()
            .filter(|(pattern, _)| pattern.contains('*'))
            .filter_map(|(pattern, label)| {
                let source = format!("^{}$", regex::escape(pattern).replace(r"\*", "[^.]+"));
                Regex::new(&source).ok().map(|re| (re, label.clone()))
            })
            .collect();

        MessageFormatter {
            messages,
            locale: locale.into(),
            default_locale: options
                .default_locale
                .unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            labels: options.labels,
            wildcard_labels,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Template for `key`, or the key itself when no locale has it.
    pub fn template<'a>(&'a self, key: &'a str) -> &'a str {
        [&self.locale, &self.default_locale]
            .into_iter()
            .find_map(|locale| self.messages.get(locale.as_str())?.get(key))
            .map(String::as_str)
            .unwrap_or(key)
    }

    /// Display label for a concrete field path.
    pub fn label<'a>(&'a self, field: &'a str) -> &'a str {
        if let Some(label) = self.labels.get(field) {
            return label;
        }
        self.wildcard_labels
            .iter()
            .find(|(re, _)| re.is_match(field))
            .map(|(_, label)| label.as_str())
            .unwrap_or(field)
    }

    pub fn format_error(&self, field: &str, error: &ValidationError) -> String {
        let label = self.label(field);
        interpolate(self.template(&error.key), |name| {
            if name == "field" {
                Some(label.to_string())
            } else {
                error.params.get(name).map(value_to_string)
            }
        })
    }

    /// Renders every error in `result`, keyed by concrete field path.
    pub fn format(&self, result: &ValidationResult) -> IndexMap<String, Vec<String>> {
        result
            .errors
            .iter()
            .map(|(field, errors)| {
                let rendered = errors.iter().map(|e| self.format_error(field, e)).collect();
                (field.clone(), rendered)
            })
            .collect()
    }
}

/// Replaces `{name}` placeholders using `lookup`; unresolved ones are kept verbatim.
///
/// Names are word characters only (`[A-Za-z0-9_]+`); any other brace is literal text.
pub fn interpolate(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(template.len());
    let mut remaining = template;

    while let Some(start) = remaining.find('{') {
        result.push_str(&remaining[..start]);
        let after_open = &remaining[start + 1..];

        let Some(end) = after_open.find('}') else {
            // Unclosed brace: pass the rest through.
            result.push_str(&remaining[start..]);
            return result;
        };

        let name = &after_open[..end];
        if !is_placeholder_name(name) {
            // Stray brace: keep it and rescan from the next character.
            result.push('{');
            remaining = after_open;
            continue;
        }
        match lookup(name) {
            Some(value) => result.push_str(&value),
            None => {
                result.push('{');
                result.push_str(name);
                result.push('}');
            }
        }
        remaining = &after_open[end + 1..];
    }

    result.push_str(remaining);
    result
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
