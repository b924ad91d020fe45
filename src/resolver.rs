//! JSON References (RFC 3986) and JSON Pointers (RFC 6901) over schema
//! documents. References may be absolute URIs or relative fragments;
//! relative references inherit from an enclosing base via standard URI
//! resolution.
use crate::error::CompilationError;
use percent_encoding::percent_decode_str;
use serde_json::Value;
use std::fmt;
use url::Url;

/// A JSON Reference: a base URI plus a JSON Pointer fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonReference {
    // Present only for absolute references; relative ones stay textual
    // until they are resolved against a base.
    url: Option<Url>,
    raw: String,
}

impl JsonReference {
    /// Parse a reference string; `#` denotes the current document's root.
    pub fn new(reference: &str) -> Result<JsonReference, CompilationError> {
        match Url::parse(reference) {
            Ok(url) => Ok(JsonReference {
                raw: url.to_string(),
                url: Some(url),
            }),
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(JsonReference {
                url: None,
                raw: reference.to_string(),
            }),
            Err(error) => Err(error.into()),
        }
    }

    fn from_url(url: Url) -> JsonReference {
        JsonReference {
            raw: url.to_string(),
            url: Some(url),
        }
    }

    /// Whether the reference carries a full URL rather than a relative one.
    pub fn has_full_url(&self) -> bool {
        self.url.is_some()
    }

    /// Resolve `child` against this reference per RFC 3986. An absolute
    /// child replaces the base; a relative child joins it; when both are
    /// relative (a standalone document) the child is kept as-is.
    pub fn inherits(&self, child: &JsonReference) -> Result<JsonReference, CompilationError> {
        if child.has_full_url() {
            return Ok(child.clone());
        }
        match &self.url {
            Some(base) => Ok(JsonReference::from_url(base.join(&child.raw)?)),
            None => Ok(child.clone()),
        }
    }

    /// The raw fragment, still percent-encoded.
    pub fn fragment(&self) -> &str {
        match &self.url {
            Some(url) => url.fragment().unwrap_or(""),
            None => self.raw.split_once('#').map_or("", |(_, fragment)| fragment),
        }
    }

    /// The fragment decoded into a JSON Pointer.
    pub fn get_pointer(&self) -> Result<JsonPointer, CompilationError> {
        let fragment = percent_decode_str(self.fragment())
            .decode_utf8()
            .map_err(|_| CompilationError::InvalidReference(self.raw.clone()))?;
        JsonPointer::new(&fragment)
    }

    /// The canonical fragment-less form used to key the document pool.
    pub fn base_string(&self) -> String {
        match &self.url {
            Some(url) => {
                let mut base = url.clone();
                base.set_fragment(None);
                base.to_string()
            }
            None => self
                .raw
                .split('#')
                .next()
                .unwrap_or_default()
                .to_string(),
        }
    }
}

impl fmt::Display for JsonReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// RFC 6901 JSON Pointer over parsed documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPointer {
    tokens: Vec<String>,
}

impl JsonPointer {
    /// Parse a pointer string; the empty pointer addresses the whole
    /// document.
    pub fn new(pointer: &str) -> Result<JsonPointer, CompilationError> {
        if pointer.is_empty() {
            return Ok(JsonPointer::default());
        }
        if !pointer.starts_with('/') {
            return Err(CompilationError::InvalidReference(pointer.to_string()));
        }
        Ok(JsonPointer {
            tokens: pointer
                .split('/')
                .skip(1)
                .map(|token| token.replace("~1", "/").replace("~0", "~"))
                .collect(),
        })
    }

    /// Navigate `document`; a missing token fails.
    pub fn get<'a>(&self, document: &'a Value) -> Result<&'a Value, CompilationError> {
        let mut target = document;
        for token in &self.tokens {
            let next = match target {
                Value::Object(map) => map.get(token),
                Value::Array(list) => parse_index(token).and_then(|index| list.get(index)),
                _ => None,
            };
            target = next
                .ok_or_else(|| CompilationError::UnresolvableReference(self.to_string()))?;
        }
        Ok(target)
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "/{}", token.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

fn parse_index(token: &str) -> Option<usize> {
    if token.starts_with('+') || (token.starts_with('0') && token.len() != 1) {
        None
    } else {
        token.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonPointer, JsonReference};
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn absolute_reference() {
        let reference = JsonReference::new("http://example.com/schema.json#/definitions/a").unwrap();
        assert!(reference.has_full_url());
        assert_eq!(reference.fragment(), "/definitions/a");
        assert_eq!(reference.base_string(), "http://example.com/schema.json");
    }

    #[test]
    fn fragment_only_reference() {
        let reference = JsonReference::new("#/definitions/a").unwrap();
        assert!(!reference.has_full_url());
        assert_eq!(reference.fragment(), "/definitions/a");
        assert_eq!(reference.base_string(), "");
        assert_eq!(reference.to_string(), "#/definitions/a");
    }

    #[test]
    fn inherits_keeps_absolute_child() {
        let base = JsonReference::new("http://example.com/root.json").unwrap();
        let child = JsonReference::new("http://other.com/schema.json").unwrap();
        let resolved = base.inherits(&child).unwrap();
        assert_eq!(resolved.to_string(), "http://other.com/schema.json");
    }

    #[test_case("#/definitions/a", "http://example.com/root.json#/definitions/a")]
    #[test_case("other.json", "http://example.com/other.json")]
    #[test_case("sub/folder.json#/x", "http://example.com/sub/folder.json#/x")]
    fn inherits_resolves_relative_child(child: &str, expected: &str) {
        let base = JsonReference::new("http://example.com/root.json").unwrap();
        let child = JsonReference::new(child).unwrap();
        assert_eq!(base.inherits(&child).unwrap().to_string(), expected);
    }

    #[test]
    fn inherits_with_relative_base_keeps_child() {
        let base = JsonReference::new("#").unwrap();
        let child = JsonReference::new("#/definitions/a").unwrap();
        assert_eq!(base.inherits(&child).unwrap().to_string(), "#/definitions/a");
    }

    #[test]
    fn pointer_navigation() {
        let document = json!({"a": {"b": [10, 20, {"c": true}]}});
        let pointer = JsonPointer::new("/a/b/2/c").unwrap();
        assert_eq!(pointer.get(&document).unwrap(), &json!(true));
    }

    #[test]
    fn empty_pointer_is_the_document() {
        let document = json!({"a": 1});
        let pointer = JsonPointer::new("").unwrap();
        assert_eq!(pointer.get(&document).unwrap(), &document);
    }

    #[test]
    fn pointer_unescaping() {
        let document = json!({"a/b": {"~c": 1}});
        let pointer = JsonPointer::new("/a~1b/~0c").unwrap();
        assert_eq!(pointer.get(&document).unwrap(), &json!(1));
        assert_eq!(pointer.to_string(), "/a~1b/~0c");
    }

    #[test_case("/missing")]
    #[test_case("/a/5")]
    #[test_case("/a/+1")]
    #[test_case("/a/01")]
    fn pointer_misses(pointer: &str) {
        let document = json!({"a": [1, 2, 3]});
        let pointer = JsonPointer::new(pointer).unwrap();
        assert!(pointer.get(&document).is_err());
    }

    #[test]
    fn pointer_must_start_with_slash() {
        assert!(JsonPointer::new("definitions/a").is_err());
    }

    #[test]
    fn decoded_pointer_from_fragment() {
        let reference = JsonReference::new("#/definitions/with%20space").unwrap();
        let pointer = reference.get_pointer().unwrap();
        let document = json!({"definitions": {"with space": 1}});
        assert_eq!(pointer.get(&document).unwrap(), &json!(1));
    }
}
