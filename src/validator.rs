//! Execution of a compiled schema graph against instances.
//!
//! Validation is read-only over the graph: errors are accumulated into a
//! [`ValidationResult`], never thrown, and combinators run their members
//! against scratch results whose errors are discarded when the combinator
//! succeeds.
use crate::{
    compilation::{Schema, ROOT},
    error::{ValidationError, ValidationErrorKind},
    formats, helpers,
    paths::{InstancePath, JSONPointer},
    primitive_type::{primitive_type_of, PrimitiveType},
    subschema::{Dependency, SchemaOrBool, SubSchema, SubSchemaId, ROOT_SCHEMA_PROPERTY},
};
use fraction::{BigFraction, BigUint};
use serde_json::{Map, Number, Value};

/// The outcome of validating one instance: valid when no errors were
/// accumulated.
#[derive(Debug, Default)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Whether the instance conforms to the schema.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The accumulated errors, in traversal order.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Consume the result, yielding its errors.
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    fn merge_errors(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }
}

impl Schema {
    /// Validate `instance`, returning every keyword violation.
    pub fn validate(&self, instance: &Value) -> ValidationResult {
        let mut result = ValidationResult::default();
        let path = InstancePath::new();
        self.validate_recursive(ROOT, instance, &path, &mut result);
        result
    }

    /// Shortcut for callers that only need the boolean outcome.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validate(instance).is_valid()
    }

    fn add_error(
        &self,
        result: &mut ValidationResult,
        kind: ValidationErrorKind,
        instance: &Value,
        path: &InstancePath,
    ) {
        let instance_path = JSONPointer::from(path);
        let field = self.field_of(&instance_path);
        result
            .errors
            .push(ValidationError::new(kind, instance.clone(), instance_path, field));
    }

    // The dotted context reported by `ValidationError::field`; a renamed
    // root prefixes non-root paths.
    fn field_of(&self, instance_path: &JSONPointer) -> String {
        let root = &self.node(ROOT).property;
        let dotted = instance_path.dotted();
        if dotted.is_empty() {
            root.clone()
        } else if root == ROOT_SCHEMA_PROPERTY {
            dotted
        } else {
            format!("{}.{}", root, dotted)
        }
    }

    fn sub_validate(
        &self,
        id: SubSchemaId,
        instance: &Value,
        path: &InstancePath,
    ) -> ValidationResult {
        let mut result = ValidationResult::default();
        self.validate_recursive(id, instance, path, &mut result);
        result
    }

    fn validate_recursive(
        &self,
        id: SubSchemaId,
        instance: &Value,
        path: &InstancePath,
        result: &mut ValidationResult,
    ) {
        let schema = self.node(id);

        // A node with a resolved `$ref` delegates wholly to its target;
        // sibling keywords on the node are inert.
        if let Some(ref_schema) = schema.ref_schema {
            return self.validate_recursive(ref_schema, instance, path, result);
        }

        // Type mismatches suppress the remaining keyword checks.
        if schema.types.is_typed() && !instance_matches_types(schema, instance) {
            self.add_error(
                result,
                ValidationErrorKind::InvalidType {
                    expected: schema.types,
                    given: primitive_type_of(instance),
                },
                instance,
                path,
            );
            return;
        }

        self.validate_combinators(schema, instance, path, result);

        match instance {
            Value::Null | Value::Bool(_) => {}
            Value::Number(number) => self.validate_number(schema, number, instance, path, result),
            Value::String(item) => self.validate_string(schema, item, instance, path, result),
            Value::Array(items) => self.validate_array(schema, items, instance, path, result),
            Value::Object(object) => self.validate_object(schema, object, instance, path, result),
        }

        self.validate_common(schema, instance, path, result);

        if let Value::Object(object) = instance {
            for &child_id in &schema.properties_children {
                let child = self.node(child_id);
                if let Some(value) = object.get(&child.property) {
                    let member_path = path.push(child.property.clone());
                    self.validate_recursive(child_id, value, &member_path, result);
                }
            }
        }
    }

    /// `allOf` / `anyOf` / `oneOf` / `not` plus `dependencies`.
    fn validate_combinators(
        &self,
        schema: &SubSchema,
        instance: &Value,
        path: &InstancePath,
        result: &mut ValidationResult,
    ) {
        if !schema.any_of.is_empty() {
            let mut validated = false;
            let mut first_failure = None;
            for &member in &schema.any_of {
                let trial = self.sub_validate(member, instance, path);
                if trial.is_valid() {
                    validated = true;
                    break;
                }
                if first_failure.is_none() {
                    first_failure = Some(trial);
                }
            }
            if !validated {
                self.add_error(result, ValidationErrorKind::AnyOf, instance, path);
                if let Some(trial) = first_failure {
                    result.merge_errors(trial);
                }
            }
        }

        if !schema.one_of.is_empty() {
            let mut validated = 0;
            let mut first_failure = None;
            for &member in &schema.one_of {
                let trial = self.sub_validate(member, instance, path);
                if trial.is_valid() {
                    validated += 1;
                } else if first_failure.is_none() {
                    first_failure = Some(trial);
                }
            }
            if validated > 1 {
                self.add_error(result, ValidationErrorKind::OneOfMultipleValid, instance, path);
            } else if validated == 0 {
                self.add_error(result, ValidationErrorKind::OneOfNotValid, instance, path);
                if let Some(trial) = first_failure {
                    result.merge_errors(trial);
                }
            }
        }

        if !schema.all_of.is_empty() {
            let mut validated = 0;
            for &member in &schema.all_of {
                let trial = self.sub_validate(member, instance, path);
                if trial.is_valid() {
                    validated += 1;
                }
                result.merge_errors(trial);
            }
            if validated != schema.all_of.len() {
                self.add_error(result, ValidationErrorKind::AllOf, instance, path);
            }
        }

        if let Some(not) = schema.not {
            if self.sub_validate(not, instance, path).is_valid() {
                self.add_error(result, ValidationErrorKind::Not, instance, path);
            }
        }

        if !schema.dependencies.is_empty() {
            if let Value::Object(object) = instance {
                for key in object.keys() {
                    match schema.dependencies.get(key) {
                        Some(Dependency::Properties(properties)) => {
                            for property in properties {
                                if !object.contains_key(property) {
                                    self.add_error(
                                        result,
                                        ValidationErrorKind::MissingDependency {
                                            dependency: property.clone(),
                                        },
                                        instance,
                                        path,
                                    );
                                }
                            }
                        }
                        Some(Dependency::Schema(dependency)) => {
                            self.validate_recursive(*dependency, instance, path, result);
                        }
                        None => {}
                    }
                }
            }
        }
    }

    /// `enum`, applicable to every instance type.
    fn validate_common(
        &self,
        schema: &SubSchema,
        instance: &Value,
        path: &InstancePath,
        result: &mut ValidationResult,
    ) {
        if !schema.enum_values.is_empty()
            && !schema
                .enum_values
                .iter()
                .any(|option| helpers::equal(option, instance))
        {
            self.add_error(
                result,
                ValidationErrorKind::Enum {
                    options: Value::Array(schema.enum_values.clone()),
                },
                instance,
                path,
            );
        }
    }

    fn validate_number(
        &self,
        schema: &SubSchema,
        number: &Number,
        instance: &Value,
        path: &InstancePath,
        result: &mut ValidationResult,
    ) {
        let item = number.as_f64().expect("Always valid");
        if let Some(multiple_of) = schema.multiple_of {
            if !is_multiple_of(item, multiple_of) {
                self.add_error(
                    result,
                    ValidationErrorKind::MultipleOf { multiple_of },
                    instance,
                    path,
                );
            }
        }
        if let Some(minimum) = schema.minimum {
            if schema.exclusive_minimum {
                if item <= minimum {
                    self.add_error(
                        result,
                        ValidationErrorKind::ExclusiveMinimum { limit: minimum },
                        instance,
                        path,
                    );
                }
            } else if item < minimum {
                self.add_error(
                    result,
                    ValidationErrorKind::Minimum { limit: minimum },
                    instance,
                    path,
                );
            }
        }
        if let Some(maximum) = schema.maximum {
            if schema.exclusive_maximum {
                if item >= maximum {
                    self.add_error(
                        result,
                        ValidationErrorKind::ExclusiveMaximum { limit: maximum },
                        instance,
                        path,
                    );
                }
            } else if item > maximum {
                self.add_error(
                    result,
                    ValidationErrorKind::Maximum { limit: maximum },
                    instance,
                    path,
                );
            }
        }
    }

    fn validate_string(
        &self,
        schema: &SubSchema,
        item: &str,
        instance: &Value,
        path: &InstancePath,
        result: &mut ValidationResult,
    ) {
        // Lengths count Unicode code points, not bytes.
        let length = item.chars().count() as u64;
        if let Some(min_length) = schema.min_length {
            if length < min_length {
                self.add_error(
                    result,
                    ValidationErrorKind::MinLength { limit: min_length },
                    instance,
                    path,
                );
            }
        }
        if let Some(max_length) = schema.max_length {
            if length > max_length {
                self.add_error(
                    result,
                    ValidationErrorKind::MaxLength { limit: max_length },
                    instance,
                    path,
                );
            }
        }
        if let Some(pattern) = &schema.pattern {
            if !pattern.is_match(item).unwrap_or(false) {
                self.add_error(
                    result,
                    ValidationErrorKind::Pattern {
                        pattern: pattern.as_str().to_string(),
                    },
                    instance,
                    path,
                );
            }
        }
        if let Some(format) = &schema.format {
            if !formats::check(format, item) {
                self.add_error(
                    result,
                    ValidationErrorKind::Format {
                        format: format.clone(),
                    },
                    instance,
                    path,
                );
            }
        }
    }

    fn validate_array(
        &self,
        schema: &SubSchema,
        items: &[Value],
        instance: &Value,
        path: &InstancePath,
        result: &mut ValidationResult,
    ) {
        let count = items.len() as u64;
        if let Some(min_items) = schema.min_items {
            if count < min_items {
                self.add_error(
                    result,
                    ValidationErrorKind::MinItems { limit: min_items },
                    instance,
                    path,
                );
            }
        }
        if let Some(max_items) = schema.max_items {
            if count > max_items {
                self.add_error(
                    result,
                    ValidationErrorKind::MaxItems { limit: max_items },
                    instance,
                    path,
                );
            }
        }

        if schema.unique_items {
            'outer: for (index, left) in items.iter().enumerate() {
                for right in items.iter().skip(index + 1) {
                    if helpers::equal(left, right) {
                        self.add_error(result, ValidationErrorKind::UniqueItems, instance, path);
                        break 'outer;
                    }
                }
            }
        }

        if schema.items_children.is_empty() {
            return;
        }
        if schema.items_children_is_single_schema {
            let child = schema.items_children[0];
            for (index, item) in items.iter().enumerate() {
                let item_path = path.push(index);
                self.validate_recursive(child, item, &item_path, result);
            }
        } else {
            let tuple_len = schema.items_children.len();
            for (index, (&child, item)) in schema.items_children.iter().zip(items).enumerate() {
                let item_path = path.push(index);
                self.validate_recursive(child, item, &item_path, result);
            }
            if items.len() > tuple_len {
                match &schema.additional_items {
                    Some(SchemaOrBool::Bool(false)) => self.add_error(
                        result,
                        ValidationErrorKind::AdditionalItems { limit: tuple_len },
                        instance,
                        path,
                    ),
                    Some(SchemaOrBool::Schema(additional)) => {
                        for (index, item) in items.iter().enumerate().skip(tuple_len) {
                            let item_path = path.push(index);
                            self.validate_recursive(*additional, item, &item_path, result);
                        }
                    }
                    Some(SchemaOrBool::Bool(true)) | None => {}
                }
            }
        }
    }

    fn validate_object(
        &self,
        schema: &SubSchema,
        object: &Map<String, Value>,
        instance: &Value,
        path: &InstancePath,
        result: &mut ValidationResult,
    ) {
        let count = object.len() as u64;
        if let Some(min_properties) = schema.min_properties {
            if count < min_properties {
                self.add_error(
                    result,
                    ValidationErrorKind::MinProperties {
                        limit: min_properties,
                    },
                    instance,
                    path,
                );
            }
        }
        if let Some(max_properties) = schema.max_properties {
            if count > max_properties {
                self.add_error(
                    result,
                    ValidationErrorKind::MaxProperties {
                        limit: max_properties,
                    },
                    instance,
                    path,
                );
            }
        }

        for property in &schema.required {
            if !object.contains_key(property) {
                self.add_error(
                    result,
                    ValidationErrorKind::Required {
                        property: property.clone(),
                    },
                    instance,
                    path,
                );
            }
        }

        // A member is "additional" when it is matched by neither
        // `properties` nor any `patternProperties` pattern; every matching
        // pattern schema applies regardless.
        for (key, value) in object {
            let matched_property = schema
                .properties_children
                .iter()
                .any(|&child| self.node(child).property == *key);
            let mut matched_pattern = false;
            for pattern in &schema.pattern_properties {
                if pattern.regex.is_match(key).unwrap_or(false) {
                    matched_pattern = true;
                    let member_path = path.push(key.clone());
                    self.validate_recursive(pattern.schema, value, &member_path, result);
                }
            }
            if !matched_property && !matched_pattern {
                match &schema.additional_properties {
                    Some(SchemaOrBool::Bool(false)) => {
                        let member_path = path.push(key.clone());
                        self.add_error(
                            result,
                            ValidationErrorKind::AdditionalProperties {
                                property: key.clone(),
                            },
                            value,
                            &member_path,
                        );
                    }
                    Some(SchemaOrBool::Schema(additional)) => {
                        let member_path = path.push(key.clone());
                        self.validate_recursive(*additional, value, &member_path, result);
                    }
                    Some(SchemaOrBool::Bool(true)) | None => {}
                }
            }
        }
    }
}

fn instance_matches_types(schema: &SubSchema, instance: &Value) -> bool {
    match instance {
        Value::Null => schema.types.contains_type(PrimitiveType::Null),
        Value::Bool(_) => schema.types.contains_type(PrimitiveType::Boolean),
        Value::Number(number) => {
            schema.types.contains_type(PrimitiveType::Number)
                || (helpers::is_integer(number)
                    && schema.types.contains_type(PrimitiveType::Integer))
        }
        Value::String(_) => schema.types.contains_type(PrimitiveType::String),
        Value::Array(_) => schema.types.contains_type(PrimitiveType::Array),
        Value::Object(_) => schema.types.contains_type(PrimitiveType::Object),
    }
}

/// Exact multiple check: a fast float path, falling back to arbitrary
/// precision when the quotient is inconclusive.
fn is_multiple_of(item: f64, multiple_of: f64) -> bool {
    let quotient = item / multiple_of;
    if !quotient.is_finite() {
        return false;
    }
    if quotient.fract() == 0. {
        return true;
    }
    let fraction = BigFraction::from(item) / BigFraction::from(multiple_of);
    fraction
        .denom()
        .map_or(false, |denom| denom == &BigUint::from(1_u8))
}

#[cfg(test)]
mod tests {
    use super::is_multiple_of;
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"type": "integer"}), &json!(1))]
    #[test_case(&json!({"type": "integer"}), &json!(1.0))]
    #[test_case(&json!({"type": "number"}), &json!(1.5))]
    #[test_case(&json!({"type": ["string", "null"]}), &json!(null))]
    #[test_case(&json!({"type": "boolean"}), &json!(false))]
    #[test_case(&json!({"minimum": 3}), &json!(3))]
    #[test_case(&json!({"minimum": 3, "exclusiveMinimum": true}), &json!(3.5))]
    #[test_case(&json!({"maximum": 3}), &json!(3))]
    #[test_case(&json!({"multipleOf": 0.0001}), &json!(0.0075))]
    #[test_case(&json!({"multipleOf": 1.5}), &json!(-4.5))]
    #[test_case(&json!({"minLength": 2, "maxLength": 2}), &json!("ab"))]
    #[test_case(&json!({"maxLength": 2}), &json!("日本"))]
    #[test_case(&json!({"pattern": "^a+$"}), &json!("aaa"))]
    #[test_case(&json!({"format": "ipv4"}), &json!("127.0.0.1"))]
    #[test_case(&json!({"format": "ipv4"}), &json!(12))]
    #[test_case(&json!({"minItems": 1, "maxItems": 2}), &json!([1, 2]))]
    #[test_case(&json!({"uniqueItems": true}), &json!([1, "1", true]))]
    #[test_case(&json!({"items": {"type": "integer"}}), &json!([1, 2, 3]))]
    #[test_case(&json!({"items": [{"type": "integer"}], "additionalItems": false}), &json!([1]))]
    #[test_case(&json!({"items": [{"type": "integer"}], "additionalItems": {"type": "string"}}), &json!([1, "a"]))]
    #[test_case(&json!({"minProperties": 1}), &json!({"a": 1}))]
    #[test_case(&json!({"required": ["a"]}), &json!({"a": null}))]
    #[test_case(&json!({"properties": {"a": {"type": "integer"}}}), &json!({"a": 1}))]
    #[test_case(&json!({"properties": {"a": {"type": "integer"}}, "additionalProperties": false}), &json!({"a": 1}))]
    #[test_case(&json!({"patternProperties": {"^x": {"type": "number"}}, "additionalProperties": false}), &json!({"x1": 1}))]
    #[test_case(&json!({"dependencies": {"a": ["b"]}}), &json!({"a": 1, "b": 2}))]
    #[test_case(&json!({"dependencies": {"a": {"required": ["b"]}}}), &json!({"a": 1, "b": 2}))]
    #[test_case(&json!({"enum": [1, "a"]}), &json!("a"))]
    #[test_case(&json!({"enum": [1]}), &json!(1.0))]
    #[test_case(&json!({"allOf": [{"minimum": 1}, {"maximum": 3}]}), &json!(2))]
    #[test_case(&json!({"anyOf": [{"type": "string"}, {"minimum": 5}]}), &json!(7))]
    #[test_case(&json!({"oneOf": [{"type": "string"}, {"minimum": 5}]}), &json!("hi"))]
    #[test_case(&json!({"not": {"type": "string"}}), &json!(5))]
    fn valid_instances(schema: &Value, instance: &Value) {
        tests_util::is_valid(schema, instance)
    }

    #[test_case(&json!({"type": "integer"}), &json!(1.5))]
    #[test_case(&json!({"type": ["string", "null"]}), &json!(5))]
    #[test_case(&json!({"minimum": 3}), &json!(2.5))]
    #[test_case(&json!({"minimum": 3, "exclusiveMinimum": true}), &json!(3))]
    #[test_case(&json!({"maximum": 3, "exclusiveMaximum": true}), &json!(3))]
    #[test_case(&json!({"multipleOf": 2}), &json!(7))]
    #[test_case(&json!({"multipleOf": 0.01}), &json!(0.005))]
    #[test_case(&json!({"minLength": 3}), &json!("ab"))]
    #[test_case(&json!({"maxLength": 1}), &json!("日本"))]
    #[test_case(&json!({"pattern": "^a+$"}), &json!("abc"))]
    #[test_case(&json!({"format": "ipv4"}), &json!("999.0.0.1"))]
    #[test_case(&json!({"format": "date-time"}), &json!("yesterday"))]
    #[test_case(&json!({"minItems": 2}), &json!([1]))]
    #[test_case(&json!({"maxItems": 1}), &json!([1, 2]))]
    #[test_case(&json!({"uniqueItems": true}), &json!([1, 2, 1.0]))]
    #[test_case(&json!({"items": {"type": "integer"}}), &json!([1, "x"]))]
    #[test_case(&json!({"items": [{"type": "integer"}], "additionalItems": false}), &json!([1, 2]))]
    #[test_case(&json!({"items": [{"type": "integer"}], "additionalItems": {"type": "string"}}), &json!([1, 2]))]
    #[test_case(&json!({"minProperties": 2}), &json!({"a": 1}))]
    #[test_case(&json!({"maxProperties": 1}), &json!({"a": 1, "b": 2}))]
    #[test_case(&json!({"required": ["a"]}), &json!({"b": 1}))]
    #[test_case(&json!({"properties": {"a": {"type": "integer"}}}), &json!({"a": "x"}))]
    #[test_case(&json!({"properties": {"a": {}}, "additionalProperties": false}), &json!({"b": 1}))]
    #[test_case(&json!({"additionalProperties": {"type": "number"}}), &json!({"a": "x"}))]
    #[test_case(&json!({"dependencies": {"a": ["b"]}}), &json!({"a": 1}))]
    #[test_case(&json!({"dependencies": {"a": {"required": ["b"]}}}), &json!({"a": 1}))]
    #[test_case(&json!({"enum": [1, "a"]}), &json!("b"))]
    #[test_case(&json!({"allOf": [{"minimum": 1}, {"maximum": 3}]}), &json!(4))]
    #[test_case(&json!({"anyOf": [{"type": "string"}, {"minimum": 5}]}), &json!(3))]
    #[test_case(&json!({"oneOf": [{"type": "string"}, {"type": "string"}]}), &json!("hi"))]
    #[test_case(&json!({"oneOf": [{"minimum": 5}, {"type": "string"}]}), &json!(1))]
    #[test_case(&json!({"not": {"type": "integer"}}), &json!(5))]
    fn invalid_instances(schema: &Value, instance: &Value) {
        tests_util::is_not_valid(schema, instance)
    }

    #[test_case(&json!({"properties": {"a": {"type": "integer"}}}), &json!({"a": "x"}), "/a")]
    #[test_case(&json!({"items": {"minimum": 3}}), &json!([3, 1]), "/1")]
    #[test_case(&json!({"patternProperties": {"^x": {"type": "number"}}, "additionalProperties": false}), &json!({"x1": 1, "y": "no"}), "/y")]
    #[test_case(&json!({"minimum": 3}), &json!(1), "")]
    fn error_paths(schema: &Value, instance: &Value, expected: &str) {
        tests_util::assert_error_path(schema, instance, expected)
    }

    #[test_case(&json!({"type": "integer"}), &json!(1.5), "type")]
    #[test_case(&json!({"patternProperties": {"^x": {}}, "additionalProperties": false}), &json!({"y": 1}), "additionalProperties")]
    #[test_case(&json!({"dependencies": {"a": ["b"]}}), &json!({"a": 1}), "dependencies")]
    #[test_case(&json!({"oneOf": [{"type": "string"}, {"type": "string"}]}), &json!("hi"), "oneOf")]
    fn error_keywords(schema: &Value, instance: &Value, expected: &str) {
        tests_util::assert_error_keyword(schema, instance, expected)
    }

    #[test]
    fn type_mismatch_suppresses_other_checks() {
        let schema = tests_util::compile(&json!({"type": "integer", "minimum": 10}));
        let result = schema.validate(&json!(1.5));
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].keyword(), "type");
    }

    #[test]
    fn all_of_merges_member_errors() {
        let schema = tests_util::compile(&json!({"allOf": [{"minimum": 5}, {"maximum": 1}]}));
        let errors = schema.validate(&json!(3));
        let keywords: Vec<&str> = errors.errors().iter().map(|e| e.keyword()).collect();
        assert_eq!(keywords, vec!["minimum", "maximum", "allOf"]);
    }

    #[test]
    fn combinator_trial_errors_are_discarded_on_success() {
        let schema = tests_util::compile(&json!({"anyOf": [{"minimum": 5}, {"maximum": 10}]}));
        assert!(schema.validate(&json!(3)).is_valid());
    }

    #[test]
    fn single_member_combinators_behave_like_the_member() {
        for schema in [
            json!({"allOf": [{"minimum": 5}]}),
            json!({"anyOf": [{"minimum": 5}]}),
            json!({"oneOf": [{"minimum": 5}]}),
        ] {
            tests_util::is_valid(&schema, &json!(7));
            tests_util::is_not_valid(&schema, &json!(3));
        }
    }

    #[test]
    fn double_negation_restores_the_inner_schema() {
        let schema = json!({"not": {"not": {"type": "integer"}}});
        tests_util::is_valid(&schema, &json!(5));
        tests_util::is_not_valid(&schema, &json!("x"));
    }

    #[test]
    fn validation_is_order_independent() {
        let schema = tests_util::compile(&json!({
            "properties": {"a": {"type": "integer"}, "b": {"minimum": 2}}
        }));
        let first = json!({"a": "x"});
        let second = json!({"a": 1, "b": 1});
        let forward: Vec<String> = schema
            .validate(&first)
            .errors()
            .iter()
            .map(ToString::to_string)
            .collect();
        let _ = schema.validate(&second);
        let again: Vec<String> = schema
            .validate(&first)
            .errors()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(forward, again);
    }

    #[test]
    fn fields_report_dotted_paths() {
        let mut schema = tests_util::compile(&json!({
            "properties": {"a": {"properties": {"b": {"type": "integer"}}}}
        }));
        let result = schema.validate(&json!({"a": {"b": "x"}}));
        assert_eq!(result.errors()[0].field(), "a.b");
        let root_result = schema.validate(&json!(5));
        assert!(root_result.is_valid());
        schema.set_root_schema_name("document");
        let renamed = schema.validate(&json!({"a": {"b": "x"}}));
        assert_eq!(renamed.errors()[0].field(), "document.a.b");
        let at_root = tests_util::compile(&json!({"type": "object"}));
        assert_eq!(at_root.validate(&json!(5)).errors()[0].field(), "(root)");
    }

    #[test_case(4.0, 2.0, true)]
    #[test_case(5.0, 2.0, false)]
    #[test_case(-6.0, 3.0, true)]
    #[test_case(0.0075, 0.0001, true)]
    #[test_case(0.0075, 0.0002, false)]
    fn multiple_of_checks(item: f64, multiple_of: f64, expected: bool) {
        assert_eq!(is_multiple_of(item, multiple_of), expected)
    }
}
