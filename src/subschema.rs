//! The sub-schema node: one vertex of the compiled schema graph.
//!
//! Every node except the root is owned by exactly one structural field of
//! its parent; `parent` and `ref_schema` are non-owning cross-references.
//! Ownership is expressed through arena indices: the `Schema` owns the
//! arena, fields store `SubSchemaId`s.
use crate::{
    error::CompilationError,
    helpers,
    locale::{locale, ErrorDetails},
    primitive_type::PrimitiveTypesBitMap,
    resolver::JsonReference,
};
use ahash::AHashMap;
use fancy_regex::Regex;
use serde_json::Value;
use std::sync::Arc;

/// Name given to the root sub-schema until the caller renames it.
pub(crate) const ROOT_SCHEMA_PROPERTY: &str = "(root)";

/// Index of a sub-schema within its owning `Schema`'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SubSchemaId(pub(crate) usize);

/// `additionalProperties` / `additionalItems`: either a blanket boolean or
/// a schema applied to the extra members.
#[derive(Debug)]
pub(crate) enum SchemaOrBool {
    Bool(bool),
    Schema(SubSchemaId),
}

/// A `dependencies` entry: names that must accompany a property, or a
/// schema the whole object must then satisfy.
#[derive(Debug)]
pub(crate) enum Dependency {
    Properties(Vec<String>),
    Schema(SubSchemaId),
}

#[derive(Debug)]
pub(crate) struct PatternProperty {
    pub(crate) regex: Arc<Regex>,
    pub(crate) schema: SubSchemaId,
}

#[derive(Debug)]
pub(crate) struct SubSchema {
    /// Name under which this node appears in its parent, used in error
    /// fields.
    pub(crate) property: String,
    pub(crate) parent: Option<SubSchemaId>,
    /// The base reference in effect for this node.
    pub(crate) reference: JsonReference,
    /// Value of `$schema`, informational.
    pub(crate) schema: Option<JsonReference>,
    pub(crate) id: Option<String>,
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) types: PrimitiveTypesBitMap,
    /// Resolved target of `$ref`; may point back up the graph.
    pub(crate) ref_schema: Option<SubSchemaId>,
    pub(crate) definitions: AHashMap<String, SubSchemaId>,
    pub(crate) properties_children: Vec<SubSchemaId>,
    pub(crate) pattern_properties: Vec<PatternProperty>,
    pub(crate) additional_properties: Option<SchemaOrBool>,
    pub(crate) dependencies: AHashMap<String, Dependency>,
    pub(crate) items_children: Vec<SubSchemaId>,
    /// Whether `items` held a single schema (applied to every element)
    /// rather than a tuple of schemas.
    pub(crate) items_children_is_single_schema: bool,
    pub(crate) additional_items: Option<SchemaOrBool>,
    pub(crate) multiple_of: Option<f64>,
    pub(crate) minimum: Option<f64>,
    pub(crate) maximum: Option<f64>,
    pub(crate) exclusive_minimum: bool,
    pub(crate) exclusive_maximum: bool,
    pub(crate) min_length: Option<u64>,
    pub(crate) max_length: Option<u64>,
    pub(crate) pattern: Option<Arc<Regex>>,
    pub(crate) format: Option<String>,
    pub(crate) min_properties: Option<u64>,
    pub(crate) max_properties: Option<u64>,
    pub(crate) required: Vec<String>,
    pub(crate) min_items: Option<u64>,
    pub(crate) max_items: Option<u64>,
    pub(crate) unique_items: bool,
    pub(crate) enum_values: Vec<Value>,
    pub(crate) one_of: Vec<SubSchemaId>,
    pub(crate) any_of: Vec<SubSchemaId>,
    pub(crate) all_of: Vec<SubSchemaId>,
    pub(crate) not: Option<SubSchemaId>,
}

impl SubSchema {
    pub(crate) fn new(
        property: &str,
        parent: Option<SubSchemaId>,
        reference: JsonReference,
    ) -> SubSchema {
        SubSchema {
            property: property.to_string(),
            parent,
            reference,
            schema: None,
            id: None,
            title: None,
            description: None,
            types: PrimitiveTypesBitMap::new(),
            ref_schema: None,
            definitions: AHashMap::new(),
            properties_children: Vec::new(),
            pattern_properties: Vec::new(),
            additional_properties: None,
            dependencies: AHashMap::new(),
            items_children: Vec::new(),
            items_children_is_single_schema: false,
            additional_items: None,
            multiple_of: None,
            minimum: None,
            maximum: None,
            exclusive_minimum: false,
            exclusive_maximum: false,
            min_length: None,
            max_length: None,
            pattern: None,
            format: None,
            min_properties: None,
            max_properties: None,
            required: Vec::new(),
            min_items: None,
            max_items: None,
            unique_items: false,
            enum_values: Vec::new(),
            one_of: Vec::new(),
            any_of: Vec::new(),
            all_of: Vec::new(),
            not: None,
        }
    }

    /// Record a `required` entry; duplicates are a compile error.
    pub(crate) fn add_required(&mut self, name: &str) -> Result<(), CompilationError> {
        if self.required.iter().any(|existing| existing == name) {
            return Err(CompilationError::schema(
                locale().unique(),
                &ErrorDetails::new().set("key", "required"),
            ));
        }
        self.required.push(name.to_string());
        Ok(())
    }

    /// Record an `enum` literal; duplicates are a compile error.
    pub(crate) fn add_enum(&mut self, value: &Value) -> Result<(), CompilationError> {
        if self
            .enum_values
            .iter()
            .any(|existing| helpers::equal(existing, value))
        {
            return Err(CompilationError::schema(
                locale().unique(),
                &ErrorDetails::new().set("key", "enum"),
            ));
        }
        self.enum_values.push(value.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SubSchema;
    use crate::resolver::JsonReference;
    use serde_json::json;

    fn node() -> SubSchema {
        SubSchema::new("(root)", None, JsonReference::new("#").unwrap())
    }

    #[test]
    fn required_rejects_duplicates() {
        let mut schema = node();
        schema.add_required("a").unwrap();
        schema.add_required("b").unwrap();
        let err = schema.add_required("a").unwrap_err();
        assert_eq!(err.to_string(), "required items must be unique");
    }

    #[test]
    fn enum_rejects_duplicates_across_number_representations() {
        let mut schema = node();
        schema.add_enum(&json!(1)).unwrap();
        schema.add_enum(&json!("1")).unwrap();
        let err = schema.add_enum(&json!(1.0)).unwrap_err();
        assert_eq!(err.to_string(), "enum items must be unique");
    }
}
