//! Schema compilation: from a parsed document tree to the sub-schema graph.
//!
//! Most of the work is validating keyword names and values, then copying
//! them into [`SubSchema`] nodes; `$ref` chasing routes through the
//! document pool and the reference interner so that cyclic schemas
//! terminate.
use crate::{
    error::CompilationError,
    formats, helpers,
    loaders::SchemaLoader,
    locale::{locale, ErrorDetails},
    pool::SchemaPool,
    primitive_type::PrimitiveType,
    reference_pool::SchemaReferencePool,
    resolver::JsonReference,
    subschema::{
        Dependency, PatternProperty, SchemaOrBool, SubSchema, SubSchemaId, ROOT_SCHEMA_PROPERTY,
    },
};
use serde_json::{Map, Value};
use std::sync::Arc;

pub(crate) const ROOT: SubSchemaId = SubSchemaId(0);

/// A compiled schema: the immutable sub-schema graph plus the documents it
/// was built from.
#[derive(Debug)]
pub struct Schema {
    document_reference: JsonReference,
    nodes: Vec<SubSchema>,
    pool: SchemaPool,
    reference_pool: SchemaReferencePool,
}

impl Schema {
    /// Compile the schema served by `loader`.
    ///
    /// A loader pointing at `#` provides the document inline (standalone);
    /// any other reference is fetched through the document pool, as are
    /// remote documents discovered while chasing `$ref`.
    pub fn new(loader: &dyn SchemaLoader) -> Result<Schema, CompilationError> {
        let document_reference = loader.json_reference()?;
        let mut pool = SchemaPool::new(loader.loader_factory());

        let document = if document_reference.to_string() == "#" {
            let document = Arc::new(loader.load_json()?);
            pool.set_standalone_document(Arc::clone(&document));
            document
        } else {
            pool.get_document(&document_reference)?
        };

        let mut schema = Schema {
            document_reference,
            nodes: Vec::new(),
            pool,
            reference_pool: SchemaReferencePool::new(),
        };
        let root_reference = schema.document_reference.clone();
        let root = schema.alloc(ROOT_SCHEMA_PROPERTY, None, root_reference);
        schema.parse_schema(&document, root, false)?;
        Ok(schema)
    }

    /// Rename the root schema for error reporting; non-default names prefix
    /// every error's `field()`.
    pub fn set_root_schema_name(&mut self, name: &str) {
        self.nodes[ROOT.0].property = name.to_string();
    }

    /// The reference this schema was compiled from; `#` for standalone
    /// documents.
    pub fn document_reference(&self) -> &JsonReference {
        &self.document_reference
    }

    pub(crate) fn node(&self, id: SubSchemaId) -> &SubSchema {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: SubSchemaId) -> &mut SubSchema {
        &mut self.nodes[id.0]
    }

    fn alloc(
        &mut self,
        property: &str,
        parent: Option<SubSchemaId>,
        reference: JsonReference,
    ) -> SubSchemaId {
        let id = SubSchemaId(self.nodes.len());
        self.nodes.push(SubSchema::new(property, parent, reference));
        id
    }

    /// Allocate a child that inherits `parent`'s base reference.
    fn alloc_child(&mut self, property: &str, parent: SubSchemaId) -> SubSchemaId {
        let reference = self.node(parent).reference.clone();
        self.alloc(property, Some(parent), reference)
    }

    fn parse_schema(
        &mut self,
        document_node: &Value,
        current: SubSchemaId,
        type_checked: bool,
    ) -> Result<(), CompilationError> {
        let m = match document_node.as_object() {
            Some(m) => m,
            None => {
                debug_assert!(!type_checked, "callers type-check nested schemas");
                return Err(invalid_type("object", "schema"));
            }
        };

        if let Some(schema) = m.get("$schema") {
            match schema.as_str() {
                Some(reference) => {
                    let reference = JsonReference::new(reference)?;
                    self.node_mut(current).schema = Some(reference);
                }
                None => return Err(invalid_type("string", "$schema")),
            }
        }

        if let Some(reference) = m.get("$ref") {
            match reference.as_str() {
                Some(raw) => {
                    let child_reference = JsonReference::new(raw)?;
                    let resolved = self.node(current).reference.inherits(&child_reference)?;
                    let key = format!("{}{}", resolved, raw);
                    if let Some(interned) = self.reference_pool.get(&key) {
                        self.node_mut(current).ref_schema = Some(interned);
                    } else {
                        self.parse_reference(current, resolved, raw)?;
                    }
                }
                None => return Err(invalid_type("string", "$ref")),
            }
        }

        if let Some(definitions) = m.get("definitions") {
            match definitions.as_object() {
                Some(entries) => {
                    for (name, definition) in entries {
                        if !definition.is_object() {
                            return Err(invalid_type("array of schemas", "definitions"));
                        }
                        let child = self.alloc_child("definitions", current);
                        self.node_mut(current).definitions.insert(name.clone(), child);
                        self.parse_schema(definition, child, true)?;
                    }
                }
                None => return Err(invalid_type("array of schemas", "definitions")),
            }
        }

        if let Some(id) = m.get("id") {
            match id.as_str() {
                Some(value) => self.node_mut(current).id = Some(value.to_string()),
                None => return Err(invalid_type("string", "id")),
            }
        }

        if let Some(title) = m.get("title") {
            match title.as_str() {
                Some(value) => self.node_mut(current).title = Some(value.to_string()),
                None => return Err(invalid_type("string", "title")),
            }
        }

        if let Some(description) = m.get("description") {
            match description.as_str() {
                Some(value) => self.node_mut(current).description = Some(value.to_string()),
                None => return Err(invalid_type("string", "description")),
            }
        }

        if let Some(type_value) = m.get("type") {
            match type_value {
                Value::String(name) => self.add_type(current, name)?,
                Value::Array(names) => {
                    for name in names {
                        match name.as_str() {
                            Some(name) => self.add_type(current, name)?,
                            None => {
                                return Err(invalid_type("string/array of strings", "type"))
                            }
                        }
                    }
                }
                _ => return Err(invalid_type("string/array of strings", "type")),
            }
        }

        if let Some(properties) = m.get("properties") {
            self.parse_properties(properties, current)?;
        }

        if let Some(additional_properties) = m.get("additionalProperties") {
            match additional_properties {
                Value::Bool(allowed) => {
                    self.node_mut(current).additional_properties =
                        Some(SchemaOrBool::Bool(*allowed));
                }
                Value::Object(_) => {
                    let child = self.alloc_child("additionalProperties", current);
                    self.node_mut(current).additional_properties =
                        Some(SchemaOrBool::Schema(child));
                    self.parse_schema(additional_properties, child, true)?;
                }
                _ => return Err(invalid_type("boolean/schema", "additionalProperties")),
            }
        }

        if let Some(pattern_properties) = m.get("patternProperties") {
            match pattern_properties.as_object() {
                Some(patterns) => {
                    for (source, property) in patterns {
                        let regex = helpers::compile_regex(source).map_err(|_| {
                            CompilationError::schema(
                                locale().regex_pattern(),
                                &ErrorDetails::new().set("pattern", source.clone()),
                            )
                        })?;
                        let child = self.alloc_child(source, current);
                        self.parse_schema(property, child, false)?;
                        self.node_mut(current)
                            .pattern_properties
                            .push(PatternProperty { regex, schema: child });
                    }
                }
                None => return Err(invalid_type("schema", "patternProperties")),
            }
        }

        if let Some(dependencies) = m.get("dependencies") {
            self.parse_dependencies(dependencies, current)?;
        }

        if let Some(items) = m.get("items") {
            match items {
                Value::Array(elements) => {
                    for element in elements {
                        if !element.is_object() {
                            return Err(invalid_type("schema/array of schemas", "items"));
                        }
                        let child = self.alloc_child("items", current);
                        self.node_mut(current).items_children.push(child);
                        self.parse_schema(element, child, true)?;
                    }
                    self.node_mut(current).items_children_is_single_schema = false;
                }
                Value::Object(_) => {
                    let child = self.alloc_child("items", current);
                    self.node_mut(current).items_children.push(child);
                    self.parse_schema(items, child, true)?;
                    self.node_mut(current).items_children_is_single_schema = true;
                }
                _ => return Err(invalid_type("schema/array of schemas", "items")),
            }
        }

        if let Some(additional_items) = m.get("additionalItems") {
            match additional_items {
                Value::Bool(allowed) => {
                    self.node_mut(current).additional_items = Some(SchemaOrBool::Bool(*allowed));
                }
                Value::Object(_) => {
                    let child = self.alloc_child("additionalItems", current);
                    self.node_mut(current).additional_items = Some(SchemaOrBool::Schema(child));
                    self.parse_schema(additional_items, child, true)?;
                }
                _ => return Err(invalid_type("boolean/schema", "additionalItems")),
            }
        }

        // validation: number / integer

        if let Some(multiple_of) = m.get("multipleOf") {
            let value = helpers::must_be_number(multiple_of)
                .ok_or_else(|| invalid_type("number", "multipleOf"))?;
            if value <= 0. {
                return Err(CompilationError::schema(
                    locale().greater_than_zero(),
                    &ErrorDetails::new().set("number", "multipleOf"),
                ));
            }
            self.node_mut(current).multiple_of = Some(value);
        }

        if let Some(minimum) = m.get("minimum") {
            let value = helpers::must_be_number(minimum)
                .ok_or_else(|| must_be_of_a("minimum", "number"))?;
            self.node_mut(current).minimum = Some(value);
        }

        if let Some(exclusive_minimum) = m.get("exclusiveMinimum") {
            match exclusive_minimum.as_bool() {
                Some(value) => {
                    if self.node(current).minimum.is_none() {
                        return Err(CompilationError::schema(
                            locale().cannot_be_used_without(),
                            &ErrorDetails::new()
                                .set("x", "exclusiveMinimum")
                                .set("y", "minimum"),
                        ));
                    }
                    self.node_mut(current).exclusive_minimum = value;
                }
                None => return Err(must_be_of_a("exclusiveMinimum", "boolean")),
            }
        }

        if let Some(maximum) = m.get("maximum") {
            let value = helpers::must_be_number(maximum)
                .ok_or_else(|| must_be_of_a("maximum", "number"))?;
            self.node_mut(current).maximum = Some(value);
        }

        if let Some(exclusive_maximum) = m.get("exclusiveMaximum") {
            match exclusive_maximum.as_bool() {
                Some(value) => {
                    if self.node(current).maximum.is_none() {
                        return Err(CompilationError::schema(
                            locale().cannot_be_used_without(),
                            &ErrorDetails::new()
                                .set("x", "exclusiveMaximum")
                                .set("y", "maximum"),
                        ));
                    }
                    self.node_mut(current).exclusive_maximum = value;
                }
                None => return Err(must_be_of_a("exclusiveMaximum", "boolean")),
            }
        }

        if let (Some(minimum), Some(maximum)) =
            (self.node(current).minimum, self.node(current).maximum)
        {
            if minimum > maximum {
                return Err(cannot_be_gt("minimum", "maximum"));
            }
        }

        // validation: string

        let min_length = parse_count_bound(m, "minLength")?;
        self.node_mut(current).min_length = min_length;
        let max_length = parse_count_bound(m, "maxLength")?;
        self.node_mut(current).max_length = max_length;
        if let (Some(min_length), Some(max_length)) = (min_length, max_length) {
            if min_length > max_length {
                return Err(cannot_be_gt("minLength", "maxLength"));
            }
        }

        if let Some(pattern) = m.get("pattern") {
            match pattern.as_str() {
                Some(source) => {
                    let regex = helpers::compile_regex(source).map_err(|_| {
                        CompilationError::schema(
                            locale().must_be_valid_regex(),
                            &ErrorDetails::new().set("key", "pattern"),
                        )
                    })?;
                    self.node_mut(current).pattern = Some(regex);
                }
                None => return Err(must_be_of_a("pattern", "string")),
            }
        }

        if let Some(format) = m.get("format") {
            match format.as_str() {
                Some(name) if formats::has(name) => {
                    self.node_mut(current).format = Some(name.to_string());
                }
                _ => {
                    return Err(CompilationError::schema(
                        locale().must_be_valid_format(),
                        &ErrorDetails::new()
                            .set("key", "format")
                            .set("given", format.to_string()),
                    ))
                }
            }
        }

        // validation: object

        let min_properties = parse_count_bound(m, "minProperties")?;
        self.node_mut(current).min_properties = min_properties;
        let max_properties = parse_count_bound(m, "maxProperties")?;
        self.node_mut(current).max_properties = max_properties;
        if let (Some(min_properties), Some(max_properties)) = (min_properties, max_properties) {
            if min_properties > max_properties {
                return Err(CompilationError::schema(
                    locale().key_cannot_be_greater_than(),
                    &ErrorDetails::new()
                        .set("key", "minProperties")
                        .set("y", "maxProperties"),
                ));
            }
        }

        if let Some(required) = m.get("required") {
            match required.as_array() {
                Some(values) => {
                    for value in values {
                        match value.as_str() {
                            Some(name) => self.node_mut(current).add_required(name)?,
                            None => {
                                return Err(CompilationError::schema(
                                    locale().key_items_must_be_of_type(),
                                    &ErrorDetails::new()
                                        .set("key", "required")
                                        .set("type", "string"),
                                ))
                            }
                        }
                    }
                }
                None => return Err(must_be_of_an("required", "array")),
            }
        }

        // validation: array

        let min_items = parse_count_bound(m, "minItems")?;
        self.node_mut(current).min_items = min_items;
        let max_items = parse_count_bound(m, "maxItems")?;
        self.node_mut(current).max_items = max_items;
        if let (Some(min_items), Some(max_items)) = (min_items, max_items) {
            if min_items > max_items {
                return Err(cannot_be_gt("minItems", "maxItems"));
            }
        }

        if let Some(unique_items) = m.get("uniqueItems") {
            match unique_items.as_bool() {
                Some(value) => self.node_mut(current).unique_items = value,
                None => return Err(must_be_of_a("uniqueItems", "boolean")),
            }
        }

        // validation: all

        if let Some(enum_values) = m.get("enum") {
            match enum_values.as_array() {
                Some(values) => {
                    for value in values {
                        self.node_mut(current).add_enum(value)?;
                    }
                }
                None => return Err(must_be_of_an("enum", "array")),
            }
        }

        // validation: sub-schemas

        if let Some(one_of) = m.get("oneOf") {
            match one_of.as_array() {
                Some(values) => {
                    for value in values {
                        let child = self.alloc_child("oneOf", current);
                        self.node_mut(current).one_of.push(child);
                        self.parse_schema(value, child, false)?;
                    }
                }
                None => return Err(must_be_of_an("oneOf", "array")),
            }
        }

        if let Some(any_of) = m.get("anyOf") {
            match any_of.as_array() {
                Some(values) => {
                    for value in values {
                        let child = self.alloc_child("anyOf", current);
                        self.node_mut(current).any_of.push(child);
                        self.parse_schema(value, child, false)?;
                    }
                }
                None => return Err(must_be_of_an("anyOf", "array")),
            }
        }

        if let Some(all_of) = m.get("allOf") {
            match all_of.as_array() {
                Some(values) => {
                    for value in values {
                        let child = self.alloc_child("allOf", current);
                        self.node_mut(current).all_of.push(child);
                        self.parse_schema(value, child, false)?;
                    }
                }
                None => return Err(must_be_of_an("allOf", "array")),
            }
        }

        if let Some(not) = m.get("not") {
            if !not.is_object() {
                return Err(must_be_of_an("not", "object"));
            }
            let child = self.alloc_child("not", current);
            self.node_mut(current).not = Some(child);
            self.parse_schema(not, child, true)?;
        }

        Ok(())
    }

    fn add_type(&mut self, current: SubSchemaId, name: &str) -> Result<(), CompilationError> {
        let primitive_type = PrimitiveType::try_from(name).map_err(|()| {
            CompilationError::schema(
                locale().not_a_valid_type(),
                &ErrorDetails::new().set("given", name.to_string()),
            )
        })?;
        let node = self.node_mut(current);
        if node.types.contains_type(primitive_type) {
            return Err(CompilationError::schema(
                locale().unique(),
                &ErrorDetails::new().set("key", "type"),
            ));
        }
        node.types = node.types.add_type(primitive_type);
        Ok(())
    }

    fn parse_properties(
        &mut self,
        document_node: &Value,
        current: SubSchemaId,
    ) -> Result<(), CompilationError> {
        let m = document_node
            .as_object()
            .ok_or_else(|| must_be_of_type("properties", "object"))?;
        for (name, property) in m {
            let child = self.alloc_child(name, current);
            self.node_mut(current).properties_children.push(child);
            self.parse_schema(property, child, false)?;
        }
        Ok(())
    }

    fn parse_dependencies(
        &mut self,
        document_node: &Value,
        current: SubSchemaId,
    ) -> Result<(), CompilationError> {
        let m = document_node
            .as_object()
            .ok_or_else(|| must_be_of_type("dependencies", "object"))?;
        for (name, dependency) in m {
            match dependency {
                Value::Array(values) => {
                    let mut properties = Vec::with_capacity(values.len());
                    for value in values {
                        match value.as_str() {
                            Some(property) => properties.push(property.to_string()),
                            None => {
                                return Err(must_be_of_type(
                                    "dependency",
                                    "schema or array of strings",
                                ))
                            }
                        }
                    }
                    self.node_mut(current)
                        .dependencies
                        .insert(name.clone(), Dependency::Properties(properties));
                }
                Value::Object(_) => {
                    let child = self.alloc_child(name, current);
                    self.parse_schema(dependency, child, true)?;
                    self.node_mut(current)
                        .dependencies
                        .insert(name.clone(), Dependency::Schema(child));
                }
                _ => {
                    return Err(must_be_of_type(
                        "dependency",
                        "schema or array of strings",
                    ))
                }
            }
        }
        Ok(())
    }

    /// Chase a `$ref`: adopt the resolved base, locate the referenced node
    /// (in the standalone document when one exists, otherwise through the
    /// pool), then compile it. The new node is interned *before* the
    /// recursive parse so that cycles terminate.
    fn parse_reference(
        &mut self,
        current: SubSchemaId,
        resolved: JsonReference,
        raw: &str,
    ) -> Result<(), CompilationError> {
        self.node_mut(current).reference = resolved;

        let pointer = self.node(current).reference.get_pointer()?;
        let document = match self.pool.standalone_document() {
            Some(document) => document,
            None => {
                let reference = self.node(current).reference.clone();
                self.pool.get_document(&reference)?
            }
        };
        let referenced = pointer.get(&document)?;

        if !referenced.is_object() {
            return Err(must_be_of_type("schema", "object"));
        }

        let child = self.alloc_child("$ref", current);
        self.reference_pool
            .add(format!("{}{}", self.node(current).reference, raw), child);
        self.parse_schema(referenced, child, true)?;
        self.node_mut(current).ref_schema = Some(child);
        Ok(())
    }
}

fn invalid_type(expected: &str, given: &str) -> CompilationError {
    CompilationError::schema(
        locale().invalid_type(),
        &ErrorDetails::new()
            .set("expected", expected.to_string())
            .set("given", given.to_string()),
    )
}

fn must_be_of_a(x: &'static str, y: &'static str) -> CompilationError {
    CompilationError::schema(
        locale().must_be_of_a(),
        &ErrorDetails::new().set("x", x).set("y", y),
    )
}

fn must_be_of_an(x: &'static str, y: &'static str) -> CompilationError {
    CompilationError::schema(
        locale().must_be_of_an(),
        &ErrorDetails::new().set("x", x).set("y", y),
    )
}

fn must_be_of_type(key: &'static str, type_name: &'static str) -> CompilationError {
    CompilationError::schema(
        locale().must_be_of_type(),
        &ErrorDetails::new().set("key", key).set("type", type_name),
    )
}

fn cannot_be_gt(x: &'static str, y: &'static str) -> CompilationError {
    CompilationError::schema(
        locale().cannot_be_gt(),
        &ErrorDetails::new().set("x", x).set("y", y),
    )
}

/// Parse a non-negative integer bound such as `minLength` or `maxItems`.
fn parse_count_bound(
    m: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<u64>, CompilationError> {
    match m.get(key) {
        None => Ok(None),
        Some(value) => {
            let bound = helpers::must_be_integer(value)
                .ok_or_else(|| must_be_of_an(key, "integer"))?;
            if bound < 0 {
                return Err(CompilationError::schema(
                    locale().must_be_gte_zero(),
                    &ErrorDetails::new().set("key", key),
                ));
            }
            Ok(Some(bound as u64))
        }
    }
}
