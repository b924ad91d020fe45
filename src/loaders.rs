//! Schema loaders: how schema documents enter the compiler.
//!
//! A loader pairs a JSON Reference with a way to fetch and parse the
//! document it points at; its factory produces loaders for *other* URIs so
//! the compiler can chase `$ref` into remote documents.
use crate::{error::CompilationError, resolver::JsonReference};
use percent_encoding::percent_decode_str;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// Source of a schema document.
pub trait SchemaLoader {
    /// The reference this loader points at.
    fn json_reference(&self) -> Result<JsonReference, CompilationError>;
    /// Fetch and parse the document.
    fn load_json(&self) -> Result<Value, CompilationError>;
    /// Factory used to chase references into other documents.
    fn loader_factory(&self) -> Arc<dyn LoaderFactory>;
}

/// Produces loaders for URIs discovered during compilation.
pub trait LoaderFactory: Send + Sync {
    /// Build a loader for `source`.
    fn new_loader(&self, source: &str) -> Box<dyn SchemaLoader>;
}

/// The default factory: every URI is served by a [`ReferenceLoader`].
#[derive(Debug, Default)]
pub struct ReferenceLoaderFactory;

impl LoaderFactory for ReferenceLoaderFactory {
    fn new_loader(&self, source: &str) -> Box<dyn SchemaLoader> {
        Box::new(ReferenceLoader::new(source))
    }
}

/// Loads documents by URI: `file` via the filesystem, `http(s)` via a
/// blocking fetch.
#[derive(Debug)]
pub struct ReferenceLoader {
    source: String,
}

impl ReferenceLoader {
    /// A loader for the document at `source`.
    pub fn new(source: impl Into<String>) -> ReferenceLoader {
        ReferenceLoader {
            source: source.into(),
        }
    }
}

impl SchemaLoader for ReferenceLoader {
    fn json_reference(&self) -> Result<JsonReference, CompilationError> {
        JsonReference::new(&self.source)
    }

    fn load_json(&self) -> Result<Value, CompilationError> {
        let url = Url::parse(&self.source)?;
        match url.scheme() {
            "file" => {
                let path = percent_decode_str(url.path())
                    .decode_utf8()
                    .map_err(|_| CompilationError::InvalidReference(self.source.clone()))?;
                let file = std::fs::File::open(path.as_ref())?;
                Ok(serde_json::from_reader(file)?)
            }
            #[cfg(feature = "reqwest")]
            "http" | "https" => Ok(reqwest::blocking::get(url)?.json()?),
            other => Err(CompilationError::UnknownReferenceScheme {
                scheme: other.to_string(),
            }),
        }
    }

    fn loader_factory(&self) -> Arc<dyn LoaderFactory> {
        Arc::new(ReferenceLoaderFactory)
    }
}

/// Wraps a schema already parsed into a [`Value`]; its reference is `#`.
#[derive(Debug)]
pub struct JsonValueLoader {
    document: Value,
}

impl JsonValueLoader {
    /// A loader serving `document` as a standalone root schema.
    pub fn new(document: Value) -> JsonValueLoader {
        JsonValueLoader { document }
    }
}

impl SchemaLoader for JsonValueLoader {
    fn json_reference(&self) -> Result<JsonReference, CompilationError> {
        JsonReference::new("#")
    }

    fn load_json(&self) -> Result<Value, CompilationError> {
        Ok(self.document.clone())
    }

    fn loader_factory(&self) -> Arc<dyn LoaderFactory> {
        Arc::new(ReferenceLoaderFactory)
    }
}

/// Parses a schema from caller-supplied JSON text; its reference is `#`.
#[derive(Debug)]
pub struct JsonStringLoader {
    source: String,
}

impl JsonStringLoader {
    /// A loader serving the schema encoded in `source`.
    pub fn new(source: impl Into<String>) -> JsonStringLoader {
        JsonStringLoader {
            source: source.into(),
        }
    }
}

impl SchemaLoader for JsonStringLoader {
    fn json_reference(&self) -> Result<JsonReference, CompilationError> {
        JsonReference::new("#")
    }

    fn load_json(&self) -> Result<Value, CompilationError> {
        Ok(serde_json::from_str(&self.source)?)
    }

    fn loader_factory(&self) -> Arc<dyn LoaderFactory> {
        Arc::new(ReferenceLoaderFactory)
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonStringLoader, JsonValueLoader, ReferenceLoader, SchemaLoader};
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn value_loader_is_standalone() {
        let loader = JsonValueLoader::new(json!({"type": "string"}));
        assert_eq!(loader.json_reference().unwrap().to_string(), "#");
        assert_eq!(loader.load_json().unwrap(), json!({"type": "string"}));
    }

    #[test]
    fn string_loader_parses() {
        let loader = JsonStringLoader::new(r#"{"minimum": 3}"#);
        assert_eq!(loader.load_json().unwrap(), json!({"minimum": 3}));
        assert!(JsonStringLoader::new("{oops").load_json().is_err());
    }

    #[test]
    fn file_loader_reads_documents() {
        let path = std::env::temp_dir().join("jsonschema4-loader-test.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(br#"{"maxLength": 4}"#).unwrap();
        let loader = ReferenceLoader::new(format!("file://{}", path.display()));
        assert_eq!(loader.load_json().unwrap(), json!({"maxLength": 4}));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        let loader = ReferenceLoader::new("ftp://example.com/schema.json");
        assert!(loader.load_json().is_err());
    }
}
