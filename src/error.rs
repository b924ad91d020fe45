//! Error types.
use crate::{
    locale::{format_error_description, ErrorDetails},
    paths::JSONPointer,
    primitive_type::{PrimitiveType, PrimitiveTypesBitMap},
};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// The error type returned when the input schema cannot be compiled.
///
/// Schema syntax problems carry a locale-formatted message naming the
/// offending keyword; loader, I/O and parse failures are propagated
/// opaquely.
#[derive(Debug, Error)]
pub enum CompilationError {
    /// A keyword's value failed syntax validation or a cross-keyword
    /// constraint.
    #[error("{0}")]
    Schema(String),
    /// A reference string is not usable where a canonical one is needed.
    #[error("invalid reference: {0}")]
    InvalidReference(String),
    /// A JSON Pointer did not resolve within its document.
    #[error("unresolvable reference: {0}")]
    UnresolvableReference(String),
    /// A reference uses a scheme no loader understands.
    #[error("unknown scheme: {scheme}")]
    UnknownReferenceScheme {
        /// The offending URI scheme.
        scheme: String,
    },
    /// Invalid URL, e.g. an invalid port number or IP address.
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),
    /// A fetched document is not valid JSON.
    #[error(transparent)]
    JsonParse(#[from] serde_json::Error),
    /// A `file://` document could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A network request for a remote document failed.
    #[cfg(feature = "reqwest")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl CompilationError {
    pub(crate) fn schema(template: &str, details: &ErrorDetails) -> CompilationError {
        CompilationError::Schema(format_error_description(template, details))
    }
}

/// An error that occurred while validating an instance.
#[derive(Debug)]
pub struct ValidationError {
    /// Snapshot of the value that failed validation.
    pub instance: Value,
    /// What went wrong, with keyword-specific details.
    pub kind: ValidationErrorKind,
    /// JSON Pointer to the offending part of the instance.
    pub instance_path: JSONPointer,
    field: String,
}

/// Kinds of errors that may happen during validation.
#[derive(Debug)]
pub enum ValidationErrorKind {
    /// The input array contains more items than the tuple schema allows.
    AdditionalItems {
        /// Number of items the tuple form covers.
        limit: usize,
    },
    /// An object member is matched by neither `properties` nor any
    /// `patternProperties` pattern, and additional properties are forbidden.
    AdditionalProperties {
        /// The offending member name.
        property: String,
    },
    /// The input value is not valid under all of the given schemas.
    AllOf,
    /// The input value is not valid under any of the given schemas.
    AnyOf,
    /// The input value doesn't match any of the specified options.
    Enum {
        /// The admitted literals.
        options: Value,
    },
    /// Value is too large.
    ExclusiveMaximum {
        /// The exclusive upper bound.
        limit: f64,
    },
    /// Value is too small.
    ExclusiveMinimum {
        /// The exclusive lower bound.
        limit: f64,
    },
    /// The input doesn't match the specified format.
    Format {
        /// The format checker name.
        format: String,
    },
    /// The input value doesn't match one or multiple required types.
    InvalidType {
        /// The declared type set.
        expected: PrimitiveTypesBitMap,
        /// The instance's actual type.
        given: PrimitiveType,
    },
    /// Too many items in an array.
    MaxItems {
        /// The upper bound.
        limit: u64,
    },
    /// Value is too large.
    Maximum {
        /// The upper bound.
        limit: f64,
    },
    /// String is too long.
    MaxLength {
        /// The upper bound.
        limit: u64,
    },
    /// Too many properties in an object.
    MaxProperties {
        /// The upper bound.
        limit: u64,
    },
    /// Too few items in an array.
    MinItems {
        /// The lower bound.
        limit: u64,
    },
    /// Value is too small.
    Minimum {
        /// The lower bound.
        limit: f64,
    },
    /// String is too short.
    MinLength {
        /// The lower bound.
        limit: u64,
    },
    /// Not enough properties in an object.
    MinProperties {
        /// The lower bound.
        limit: u64,
    },
    /// A property required by a `dependencies` entry is missing.
    MissingDependency {
        /// The property the present one depends on.
        dependency: String,
    },
    /// The number is not a multiple of the given divisor.
    MultipleOf {
        /// The divisor.
        multiple_of: f64,
    },
    /// The negated schema validated successfully.
    Not,
    /// The input value is valid under more than one of the given schemas.
    OneOfMultipleValid,
    /// The input value is not valid under any of the given schemas.
    OneOfNotValid,
    /// The input doesn't match the given pattern.
    Pattern {
        /// The pattern source.
        pattern: String,
    },
    /// A required property is missing.
    Required {
        /// The missing property name.
        property: String,
    },
    /// The input array has non-unique elements.
    UniqueItems,
}

impl ValidationError {
    pub(crate) fn new(
        kind: ValidationErrorKind,
        instance: Value,
        instance_path: JSONPointer,
        field: String,
    ) -> ValidationError {
        ValidationError {
            instance,
            kind,
            instance_path,
            field,
        }
    }

    /// Dotted form of the instance path; an empty path reports the root
    /// schema's name (see `Schema::set_root_schema_name`).
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The schema keyword that was violated.
    pub fn keyword(&self) -> &'static str {
        match &self.kind {
            ValidationErrorKind::AdditionalItems { .. } => "additionalItems",
            ValidationErrorKind::AdditionalProperties { .. } => "additionalProperties",
            ValidationErrorKind::AllOf => "allOf",
            ValidationErrorKind::AnyOf => "anyOf",
            ValidationErrorKind::Enum { .. } => "enum",
            ValidationErrorKind::ExclusiveMaximum { .. }
            | ValidationErrorKind::Maximum { .. } => "maximum",
            ValidationErrorKind::ExclusiveMinimum { .. }
            | ValidationErrorKind::Minimum { .. } => "minimum",
            ValidationErrorKind::Format { .. } => "format",
            ValidationErrorKind::InvalidType { .. } => "type",
            ValidationErrorKind::MaxItems { .. } => "maxItems",
            ValidationErrorKind::MaxLength { .. } => "maxLength",
            ValidationErrorKind::MaxProperties { .. } => "maxProperties",
            ValidationErrorKind::MinItems { .. } => "minItems",
            ValidationErrorKind::MinLength { .. } => "minLength",
            ValidationErrorKind::MinProperties { .. } => "minProperties",
            ValidationErrorKind::MissingDependency { .. } => "dependencies",
            ValidationErrorKind::MultipleOf { .. } => "multipleOf",
            ValidationErrorKind::Not => "not",
            ValidationErrorKind::OneOfMultipleValid | ValidationErrorKind::OneOfNotValid => {
                "oneOf"
            }
            ValidationErrorKind::Pattern { .. } => "pattern",
            ValidationErrorKind::Required { .. } => "required",
            ValidationErrorKind::UniqueItems => "uniqueItems",
        }
    }

    /// Expected/given details of this error as a key/value map.
    pub fn details(&self) -> ErrorDetails {
        let details = ErrorDetails::new();
        match &self.kind {
            ValidationErrorKind::AdditionalItems { limit } => {
                details.set("limit", limit.to_string())
            }
            ValidationErrorKind::AdditionalProperties { property } => {
                details.set("property", property.clone())
            }
            ValidationErrorKind::Enum { options } => details.set("options", options.to_string()),
            ValidationErrorKind::ExclusiveMaximum { limit }
            | ValidationErrorKind::Maximum { limit } => details.set("max", limit.to_string()),
            ValidationErrorKind::ExclusiveMinimum { limit }
            | ValidationErrorKind::Minimum { limit } => details.set("min", limit.to_string()),
            ValidationErrorKind::Format { format } => details.set("format", format.clone()),
            ValidationErrorKind::InvalidType { expected, given } => details
                .set("expected", expected.to_string())
                .set("given", given.to_string()),
            ValidationErrorKind::MaxItems { limit }
            | ValidationErrorKind::MaxLength { limit }
            | ValidationErrorKind::MaxProperties { limit } => {
                details.set("max", limit.to_string())
            }
            ValidationErrorKind::MinItems { limit }
            | ValidationErrorKind::MinLength { limit }
            | ValidationErrorKind::MinProperties { limit } => {
                details.set("min", limit.to_string())
            }
            ValidationErrorKind::MissingDependency { dependency } => {
                details.set("dependency", dependency.clone())
            }
            ValidationErrorKind::MultipleOf { multiple_of } => {
                details.set("multipleOf", multiple_of.to_string())
            }
            ValidationErrorKind::Pattern { pattern } => details.set("pattern", pattern.clone()),
            ValidationErrorKind::Required { property } => {
                details.set("property", property.clone())
            }
            ValidationErrorKind::AllOf
            | ValidationErrorKind::AnyOf
            | ValidationErrorKind::Not
            | ValidationErrorKind::OneOfMultipleValid
            | ValidationErrorKind::OneOfNotValid
            | ValidationErrorKind::UniqueItems => details,
        }
    }
}

impl std::error::Error for ValidationError {}

/// Textual representation of the validation errors.
impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValidationErrorKind::AdditionalItems { limit } => write!(
                f,
                "Additional items are not allowed ({} item{} allowed)",
                limit,
                if *limit == 1 { "" } else { "s" }
            ),
            ValidationErrorKind::AdditionalProperties { property } => {
                write!(f, "Additional property '{}' is not allowed", property)
            }
            ValidationErrorKind::AllOf => write!(
                f,
                "'{}' is not valid under all of the given schemas",
                self.instance
            ),
            ValidationErrorKind::AnyOf | ValidationErrorKind::OneOfNotValid => write!(
                f,
                "'{}' is not valid under any of the given schemas",
                self.instance
            ),
            ValidationErrorKind::Enum { options } => {
                write!(f, "'{}' is not one of '{}'", self.instance, options)
            }
            ValidationErrorKind::ExclusiveMaximum { limit } => write!(
                f,
                "{} is greater than or equal to the maximum of {}",
                self.instance, limit
            ),
            ValidationErrorKind::ExclusiveMinimum { limit } => write!(
                f,
                "{} is less than or equal to the minimum of {}",
                self.instance, limit
            ),
            ValidationErrorKind::Format { format } => {
                write!(f, "'{}' is not a '{}'", self.instance, format)
            }
            ValidationErrorKind::InvalidType { expected, given: _ } => {
                if expected.len() == 1 {
                    write!(f, "'{}' is not of type '{}'", self.instance, expected)
                } else {
                    write!(
                        f,
                        "'{}' is not of types {}",
                        self.instance,
                        expected
                            .into_iter()
                            .map(|primitive_type| format!("'{}'", primitive_type))
                            .collect::<Vec<String>>()
                            .join(", ")
                    )
                }
            }
            ValidationErrorKind::MaxItems { limit } => write!(
                f,
                "{} has more than {} item{}",
                self.instance,
                limit,
                if *limit == 1 { "" } else { "s" }
            ),
            ValidationErrorKind::Maximum { limit } => write!(
                f,
                "{} is greater than the maximum of {}",
                self.instance, limit
            ),
            ValidationErrorKind::MaxLength { limit } => write!(
                f,
                "'{}' is longer than {} character{}",
                self.instance,
                limit,
                if *limit == 1 { "" } else { "s" }
            ),
            ValidationErrorKind::MaxProperties { limit } => write!(
                f,
                "{} has more than {} propert{}",
                self.instance,
                limit,
                if *limit == 1 { "y" } else { "ies" }
            ),
            ValidationErrorKind::MinItems { limit } => write!(
                f,
                "{} has less than {} item{}",
                self.instance,
                limit,
                if *limit == 1 { "" } else { "s" }
            ),
            ValidationErrorKind::Minimum { limit } => {
                write!(f, "{} is less than the minimum of {}", self.instance, limit)
            }
            ValidationErrorKind::MinLength { limit } => write!(
                f,
                "'{}' is shorter than {} character{}",
                self.instance,
                limit,
                if *limit == 1 { "" } else { "s" }
            ),
            ValidationErrorKind::MinProperties { limit } => write!(
                f,
                "{} has less than {} propert{}",
                self.instance,
                limit,
                if *limit == 1 { "y" } else { "ies" }
            ),
            ValidationErrorKind::MissingDependency { dependency } => {
                write!(f, "'{}' is a required dependency", dependency)
            }
            ValidationErrorKind::MultipleOf { multiple_of } => {
                write!(f, "{} is not a multiple of {}", self.instance, multiple_of)
            }
            ValidationErrorKind::Not => write!(f, "'{}' is not allowed", self.instance),
            ValidationErrorKind::OneOfMultipleValid => write!(
                f,
                "'{}' is valid under more than one of the given schemas",
                self.instance
            ),
            ValidationErrorKind::Pattern { pattern } => {
                write!(f, "'{}' does not match '{}'", self.instance, pattern)
            }
            ValidationErrorKind::Required { property } => {
                write!(f, "'{}' is a required property", property)
            }
            ValidationErrorKind::UniqueItems => {
                write!(f, "'{}' has non-unique elements", self.instance)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ValidationError, ValidationErrorKind};
    use crate::{
        paths::JSONPointer,
        primitive_type::{PrimitiveType, PrimitiveTypesBitMap},
    };
    use serde_json::json;

    fn error(kind: ValidationErrorKind) -> ValidationError {
        ValidationError::new(kind, json!(42), JSONPointer::default(), String::new())
    }

    #[test]
    fn single_type_error() {
        let err = error(ValidationErrorKind::InvalidType {
            expected: PrimitiveTypesBitMap::new().add_type(PrimitiveType::String),
            given: PrimitiveType::Integer,
        });
        assert_eq!(err.to_string(), "'42' is not of type 'string'");
        assert_eq!(err.keyword(), "type");
        assert_eq!(err.details().get("expected"), Some("string"));
    }

    #[test]
    fn multiple_types_error() {
        let err = error(ValidationErrorKind::InvalidType {
            expected: PrimitiveTypesBitMap::new()
                .add_type(PrimitiveType::String)
                .add_type(PrimitiveType::Number),
            given: PrimitiveType::Integer,
        });
        assert_eq!(err.to_string(), "'42' is not of types 'number', 'string'");
    }

    #[test]
    fn required_error() {
        let err = error(ValidationErrorKind::Required {
            property: "name".to_string(),
        });
        assert_eq!(err.to_string(), "'name' is a required property");
        assert_eq!(err.keyword(), "required");
    }

    #[test]
    fn one_of_keywords() {
        assert_eq!(error(ValidationErrorKind::OneOfNotValid).keyword(), "oneOf");
        assert_eq!(
            error(ValidationErrorKind::OneOfMultipleValid).keyword(),
            "oneOf"
        );
    }
}
