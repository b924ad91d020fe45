//! Message templates for schema compilation errors.
//!
//! Library users can swap the active locale with their own implementation
//! via [`set_locale`]; templates are filled from an [`ErrorDetails`] map.
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

/// Keyed message templates. Placeholders use the `{{name}}` form and are
/// substituted from an [`ErrorDetails`] map.
pub trait Locale: Send + Sync {
    /// A keyword value has the wrong JSON type.
    fn invalid_type(&self) -> &str {
        "Invalid type. Expected: {{expected}}, given: {{given}}"
    }
    /// `{{x}}` must hold a value of type `{{y}}` ("a number").
    fn must_be_of_a(&self) -> &str {
        "{{x}} must be of a {{y}}"
    }
    /// `{{x}}` must hold a value of type `{{y}}` ("an integer").
    fn must_be_of_an(&self) -> &str {
        "{{x}} must be of an {{y}}"
    }
    /// A count bound went negative.
    fn must_be_gte_zero(&self) -> &str {
        "{{key}} must be greater than or equal to 0"
    }
    /// `multipleOf` and friends must be strictly positive.
    fn greater_than_zero(&self) -> &str {
        "{{number}} must be strictly greater than 0"
    }
    /// An exclusive bound is missing its base bound.
    fn cannot_be_used_without(&self) -> &str {
        "{{x}} cannot be used without {{y}}"
    }
    /// A lower bound exceeds the matching upper bound.
    fn cannot_be_gt(&self) -> &str {
        "{{x}} cannot be greater than {{y}}"
    }
    /// Variant of [`Locale::cannot_be_gt`] keyed on a single keyword.
    fn key_cannot_be_greater_than(&self) -> &str {
        "{{key}} cannot be greater than {{y}}"
    }
    /// A `pattern` value failed to compile.
    fn must_be_valid_regex(&self) -> &str {
        "{{key}} must be a valid regex"
    }
    /// A `format` value names no registered checker.
    fn must_be_valid_format(&self) -> &str {
        "{{key}} must be a valid format: {{given}} is unknown"
    }
    /// A keyword value (or a referenced node) has the wrong shape.
    fn must_be_of_type(&self) -> &str {
        "{{key}} must be of type {{type}}"
    }
    /// Array-valued keywords whose items have a fixed type.
    fn key_items_must_be_of_type(&self) -> &str {
        "{{key}} items must be {{type}}"
    }
    /// A `patternProperties` key failed to compile.
    fn regex_pattern(&self) -> &str {
        "Invalid regex pattern '{{pattern}}'"
    }
    /// Array-valued keywords whose items must not repeat.
    fn unique(&self) -> &str {
        "{{key}} items must be unique"
    }
    /// An unrecognized `type` name.
    fn not_a_valid_type(&self) -> &str {
        "{{given}} is not a valid type"
    }
}

/// The built-in English locale.
#[derive(Debug, Default)]
pub struct DefaultLocale;

impl Locale for DefaultLocale {}

static LOCALE: Lazy<RwLock<Arc<dyn Locale>>> =
    Lazy::new(|| RwLock::new(Arc::new(DefaultLocale)));

/// Replace the process-wide locale used to format compilation errors.
pub fn set_locale(locale: Arc<dyn Locale>) {
    *LOCALE.write() = locale;
}

pub(crate) fn locale() -> Arc<dyn Locale> {
    Arc::clone(&LOCALE.read())
}

/// Ordered key/value details attached to an error; doubles as the source of
/// template substitutions.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    entries: Vec<(&'static str, String)>,
}

impl ErrorDetails {
    pub(crate) fn new() -> Self {
        ErrorDetails::default()
    }

    #[must_use]
    pub(crate) fn set(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.entries.push((key, value.into()));
        self
    }

    /// Look up a detail by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate details in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
    }
}

/// Fill a template's `{{name}}` placeholders from `details`.
pub fn format_error_description(template: &str, details: &ErrorDetails) -> String {
    let mut message = template.to_string();
    for (key, value) in details.iter() {
        message = message.replace(&format!("{{{{{}}}}}", key), value);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::{format_error_description, DefaultLocale, ErrorDetails, Locale};

    #[test]
    fn substitutes_placeholders() {
        let details = ErrorDetails::new().set("x", "minimum").set("y", "maximum");
        assert_eq!(
            format_error_description(DefaultLocale.cannot_be_gt(), &details),
            "minimum cannot be greater than maximum"
        );
    }

    #[test]
    fn unknown_placeholders_are_left_alone() {
        let details = ErrorDetails::new().set("x", "exclusiveMinimum");
        assert_eq!(
            format_error_description(DefaultLocale.cannot_be_used_without(), &details),
            "exclusiveMinimum cannot be used without {{y}}"
        );
    }

    #[test]
    fn details_lookup() {
        let details = ErrorDetails::new().set("expected", "object");
        assert_eq!(details.get("expected"), Some("object"));
        assert_eq!(details.get("given"), None);
    }
}
