//! # jsonschema4
//!
//! A crate for JSON Schema validation per IETF draft 4. A schema document
//! is compiled once into an immutable sub-schema graph; instances are then
//! validated against the graph, producing a structured list of failures
//! with human-readable messages.
//!
//! Supports:
//!   - the complete draft 4 validation vocabulary;
//!   - `$ref` across documents, including cyclic references;
//!   - loading remote documents via HTTP(S) and `file://` URIs.
//!
//! ## Usage Examples:
//! A schema provided inline:
//! ```rust
//! use jsonschema4::{JsonValueLoader, Schema};
//! use serde_json::json;
//!
//! let loader = JsonValueLoader::new(json!({"maxLength": 5}));
//! let schema = Schema::new(&loader).expect("A valid schema");
//! assert!(schema.is_valid(&json!("foo")));
//! ```
//!
//! Inspecting failures:
//! ```rust
//! use jsonschema4::{JsonValueLoader, Schema};
//! use serde_json::json;
//!
//! let loader = JsonValueLoader::new(json!({"properties": {"size": {"minimum": 1}}}));
//! let schema = Schema::new(&loader).expect("A valid schema");
//! let result = schema.validate(&json!({"size": 0}));
//! for error in result.errors() {
//!     println!("Validation error: {}", error);
//!     println!("Instance path: {}", error.instance_path);
//! }
//! assert!(!result.is_valid());
//! ```
//!
//! Each error carries the violated keyword, a JSON Pointer to the offending
//! part of the instance and an expected/given detail map.
#![warn(
    clippy::doc_markdown,
    clippy::explicit_iter_loop,
    clippy::map_unwrap_or,
    clippy::match_same_arms,
    clippy::needless_borrow,
    clippy::needless_pass_by_value,
    clippy::print_stdout,
    clippy::redundant_closure,
    clippy::trivially_copy_pass_by_ref,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications
)]
mod compilation;
pub mod error;
pub mod formats;
mod helpers;
pub mod loaders;
pub mod locale;
pub mod paths;
mod pool;
pub mod primitive_type;
mod reference_pool;
pub mod resolver;
mod subschema;
mod validator;

pub use compilation::Schema;
pub use error::{CompilationError, ValidationError, ValidationErrorKind};
pub use loaders::{
    JsonStringLoader, JsonValueLoader, LoaderFactory, ReferenceLoader, ReferenceLoaderFactory,
    SchemaLoader,
};
pub use validator::ValidationResult;

use serde_json::Value;

/// A shortcut for validating `instance` against `schema`.
/// ```rust
/// use jsonschema4::is_valid;
/// use serde_json::json;
///
/// let schema = json!({"maxLength": 5});
/// let instance = json!("foo");
/// assert!(is_valid(&schema, &instance));
/// ```
///
/// This function panics if an invalid schema is passed.
#[must_use]
#[inline]
pub fn is_valid(schema: &Value, instance: &Value) -> bool {
    let compiled = Schema::new(&JsonValueLoader::new(schema.clone())).expect("Invalid schema");
    compiled.is_valid(instance)
}
