//! Primitive JSON types as declared by the `type` keyword.
use crate::helpers;
use serde_json::Value;
use std::fmt;

/// Type names admitted by the draft 4 `type` keyword. Matching against this
/// enum is cheaper than comparing strings in the `type` validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum PrimitiveType {
    Array,
    Boolean,
    Integer,
    Null,
    Number,
    Object,
    String,
}

impl PrimitiveType {
    const fn to_bit_representation(self) -> u8 {
        match self {
            PrimitiveType::Array => 1,
            PrimitiveType::Boolean => 2,
            PrimitiveType::Integer => 4,
            PrimitiveType::Null => 8,
            PrimitiveType::Number => 16,
            PrimitiveType::Object => 32,
            PrimitiveType::String => 64,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveType::Array => write!(f, "array"),
            PrimitiveType::Boolean => write!(f, "boolean"),
            PrimitiveType::Integer => write!(f, "integer"),
            PrimitiveType::Null => write!(f, "null"),
            PrimitiveType::Number => write!(f, "number"),
            PrimitiveType::Object => write!(f, "object"),
            PrimitiveType::String => write!(f, "string"),
        }
    }
}

impl TryFrom<&str> for PrimitiveType {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "array" => Ok(PrimitiveType::Array),
            "boolean" => Ok(PrimitiveType::Boolean),
            "integer" => Ok(PrimitiveType::Integer),
            "null" => Ok(PrimitiveType::Null),
            "number" => Ok(PrimitiveType::Number),
            "object" => Ok(PrimitiveType::Object),
            "string" => Ok(PrimitiveType::String),
            _ => Err(()),
        }
    }
}

const ALL_TYPES: [PrimitiveType; 7] = [
    PrimitiveType::Array,
    PrimitiveType::Boolean,
    PrimitiveType::Integer,
    PrimitiveType::Null,
    PrimitiveType::Number,
    PrimitiveType::Object,
    PrimitiveType::String,
];

/// Compact set of primitive types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrimitiveTypesBitMap {
    inner: u8,
}

impl PrimitiveTypesBitMap {
    pub(crate) const fn new() -> Self {
        PrimitiveTypesBitMap { inner: 0 }
    }

    #[must_use]
    pub(crate) const fn add_type(mut self, primitive_type: PrimitiveType) -> Self {
        self.inner |= primitive_type.to_bit_representation();
        self
    }

    /// Whether the set names `primitive_type`.
    pub const fn contains_type(self, primitive_type: PrimitiveType) -> bool {
        self.inner & primitive_type.to_bit_representation() != 0
    }

    /// Whether any type was declared at all.
    pub const fn is_typed(self) -> bool {
        self.inner != 0
    }

    pub(crate) fn len(self) -> usize {
        self.into_iter().count()
    }
}

impl IntoIterator for PrimitiveTypesBitMap {
    type Item = PrimitiveType;
    type IntoIter = std::vec::IntoIter<PrimitiveType>;

    fn into_iter(self) -> Self::IntoIter {
        ALL_TYPES
            .iter()
            .copied()
            .filter(|primitive_type| self.contains_type(*primitive_type))
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl fmt::Display for PrimitiveTypesBitMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for primitive_type in *self {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{}", primitive_type)?;
        }
        Ok(())
    }
}

/// The primitive type of a JSON value. Numbers with a zero fractional part
/// (including `1.0`) report as `integer`.
pub(crate) fn primitive_type_of(value: &Value) -> PrimitiveType {
    match value {
        Value::Null => PrimitiveType::Null,
        Value::Bool(_) => PrimitiveType::Boolean,
        Value::Number(number) => {
            if helpers::is_integer(number) {
                PrimitiveType::Integer
            } else {
                PrimitiveType::Number
            }
        }
        Value::String(_) => PrimitiveType::String,
        Value::Array(_) => PrimitiveType::Array,
        Value::Object(_) => PrimitiveType::Object,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("array", PrimitiveType::Array)]
    #[test_case("integer", PrimitiveType::Integer)]
    #[test_case("string", PrimitiveType::String)]
    fn from_str(input: &str, expected: PrimitiveType) {
        assert_eq!(PrimitiveType::try_from(input), Ok(expected))
    }

    #[test]
    fn unknown_type_name() {
        assert!(PrimitiveType::try_from("float").is_err())
    }

    #[test]
    fn bit_map_membership() {
        let types = PrimitiveTypesBitMap::new()
            .add_type(PrimitiveType::Integer)
            .add_type(PrimitiveType::String);
        assert!(types.is_typed());
        assert!(types.contains_type(PrimitiveType::Integer));
        assert!(!types.contains_type(PrimitiveType::Array));
        assert_eq!(types.len(), 2);
        assert_eq!(types.to_string(), "integer, string");
    }

    #[test_case(&json!(1), PrimitiveType::Integer)]
    #[test_case(&json!(1.0), PrimitiveType::Integer)]
    #[test_case(&json!(1.5), PrimitiveType::Number)]
    #[test_case(&json!(null), PrimitiveType::Null)]
    #[test_case(&json!({}), PrimitiveType::Object)]
    fn type_of_value(value: &Value, expected: PrimitiveType) {
        assert_eq!(primitive_type_of(value), expected)
    }
}
