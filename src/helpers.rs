//! Shared helpers: numeric coercions, JSON deep equality and the
//! process-wide compiled-regex cache.
use ahash::AHashMap;
use fancy_regex::Regex;
use num_cmp::NumCmp;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde_json::{Map, Number, Value};
use std::sync::Arc;

// Patterns are shared between `pattern` and `patternProperties` and often
// repeat across schemas; compiled regexes are cached per process. The cache
// is mutex-guarded so schemas may be compiled from multiple threads.
static REGEX_CACHE: Lazy<Mutex<AHashMap<String, Arc<Regex>>>> =
    Lazy::new(|| Mutex::new(AHashMap::new()));

pub(crate) fn compile_regex(source: &str) -> Result<Arc<Regex>, fancy_regex::Error> {
    let mut cache = REGEX_CACHE.lock();
    if let Some(regex) = cache.get(source) {
        return Ok(Arc::clone(regex));
    }
    let regex = Arc::new(Regex::new(source)?);
    cache.insert(source.to_string(), Arc::clone(&regex));
    Ok(regex)
}

/// An integer is any number whose fractional part is zero, `1.0` included.
pub(crate) fn is_integer(number: &Number) -> bool {
    number.is_u64()
        || number.is_i64()
        || number.as_f64().map_or(false, |value| value.fract() == 0.)
}

pub(crate) fn must_be_number(value: &Value) -> Option<f64> {
    value.as_f64()
}

pub(crate) fn must_be_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) if is_integer(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|value| value as i64)),
        _ => None,
    }
}

fn number_eq_value<T>(left: T, right: &Number) -> bool
where
    T: NumCmp<u64> + NumCmp<i64> + NumCmp<f64>,
{
    if let Some(b) = right.as_u64() {
        NumCmp::num_eq(left, b)
    } else if let Some(b) = right.as_i64() {
        NumCmp::num_eq(left, b)
    } else {
        NumCmp::num_eq(left, right.as_f64().expect("Always valid"))
    }
}

fn numbers_eq(left: &Number, right: &Number) -> bool {
    if let Some(a) = left.as_u64() {
        number_eq_value(a, right)
    } else if let Some(a) = left.as_i64() {
        number_eq_value(a, right)
    } else {
        number_eq_value(left.as_f64().expect("Always valid"), right)
    }
}

/// Deep equality with numbers compared by value across representations, so
/// that `1`, `1.0` and large `u64`/`i64` variants of the same quantity are
/// interchangeable, as in `enum` and `uniqueItems`.
pub(crate) fn equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(left), Value::Bool(right)) => left == right,
        (Value::Number(left), Value::Number(right)) => numbers_eq(left, right),
        (Value::String(left), Value::String(right)) => left == right,
        (Value::Array(left), Value::Array(right)) => equal_arrays(left, right),
        (Value::Object(left), Value::Object(right)) => equal_objects(left, right),
        (_, _) => false,
    }
}

fn equal_arrays(left: &[Value], right: &[Value]) -> bool {
    left.len() == right.len() && left.iter().zip(right.iter()).all(|(a, b)| equal(a, b))
}

fn equal_objects(left: &Map<String, Value>, right: &Map<String, Value>) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .all(|((ka, va), (kb, vb))| ka == kb && equal(va, vb))
}

#[cfg(test)]
mod tests {
    use super::{compile_regex, equal, is_integer, must_be_integer, must_be_number};
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!(1), &json!(1.0))]
    #[test_case(&json!([2]), &json!([2.0]))]
    #[test_case(&json!({"a": 1}), &json!({"a": 1.0}))]
    #[test_case(&json!(null), &json!(null))]
    fn are_equal(left: &Value, right: &Value) {
        assert!(equal(left, right))
    }

    #[test_case(&json!(1), &json!(2.0))]
    #[test_case(&json!([]), &json!(["foo"]))]
    #[test_case(&json!({"a": 1}), &json!({"a": 1.0, "b": 2}))]
    #[test_case(&json!(0), &json!(false))]
    fn are_not_equal(left: &Value, right: &Value) {
        assert!(!equal(left, right))
    }

    fn number(value: Value) -> serde_json::Number {
        match value {
            Value::Number(number) => number,
            _ => unreachable!("not a number"),
        }
    }

    #[test]
    fn integer_detection() {
        assert!(is_integer(&number(json!(1))));
        assert!(is_integer(&number(json!(1.0))));
        assert!(!is_integer(&number(json!(1.5))));
    }

    #[test]
    fn number_coercions() {
        assert_eq!(must_be_number(&json!(2.5)), Some(2.5));
        assert_eq!(must_be_number(&json!("2.5")), None);
        assert_eq!(must_be_integer(&json!(2.0)), Some(2));
        assert_eq!(must_be_integer(&json!(2.5)), None);
        assert_eq!(must_be_integer(&json!(true)), None);
    }

    #[test]
    fn regex_cache_reuses_compilations() {
        let first = compile_regex("^x[0-9]+$").unwrap();
        let second = compile_regex("^x[0-9]+$").unwrap();
        assert!(std::sync::Arc::ptr_eq(&first, &second));
        assert!(compile_regex("[").is_err());
    }
}
