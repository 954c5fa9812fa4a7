//! Schema translation - declarative parameter schemas to runtime validators.
//!
//! Tool definitions declare their parameters as a JSON-Schema-like document.
//! At registration time each schema is translated once into a [`ValidatorNode`]
//! tree; at call time the tree checks inbound arguments before the handler is
//! ever invoked.
//!
//! Translation is fatal per tool only: a malformed schema excludes that tool
//! from the registry and startup continues (see `loader.rs`).

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Errors raised while translating a declarative schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// An `array` schema is missing its `items` sub-schema.
    #[error("array type must have 'items'")]
    ArrayMissingItems,

    /// The declared type is not one of the supported kinds.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// The top-level parameters schema must describe an object with
    /// declared properties.
    #[error("top-level schema must be an object with properties")]
    TopLevelNotObject,
}

/// Validation rule for a single object property.
#[derive(Debug, Clone)]
pub struct PropertyRule {
    /// Validator for the property value.
    pub node: ValidatorNode,

    /// Whether the property must be present at call time.
    pub required: bool,

    /// Documentation carried through from the schema; no validation effect.
    pub description: Option<String>,
}

/// A validator tree mirroring the declared parameter schema.
///
/// Built once per tool at registration time and immutable afterwards.
#[derive(Debug, Clone)]
pub enum ValidatorNode {
    String,
    Number,
    Integer,
    Boolean,
    Array(Box<ValidatorNode>),

    /// Declared properties by name. An object schema with no `properties`
    /// translates to an empty map, which accepts any mapping (permissive
    /// passthrough). Undeclared properties are ignored, never rejected.
    Object(BTreeMap<String, PropertyRule>),

    /// Wrapper produced by union types like `["string", "null"]`.
    Nullable(Box<ValidatorNode>),
}

/// A single violated constraint, located by a dotted path into the arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl Violation {
    fn new(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// Translate a declarative schema node into a validator tree.
///
/// Pure; called once per tool at registration time.
pub fn translate(schema: &Value) -> Result<ValidatorNode, SchemaError> {
    // Union types like ["string", "null"] resolve the non-null member and
    // wrap it nullable.
    if let Some(types) = schema.get("type").and_then(Value::as_array) {
        let non_null = types
            .iter()
            .find(|t| t.as_str() != Some("null"))
            .cloned()
            .unwrap_or(Value::Null);

        let mut base_schema = schema.clone();
        if let Some(obj) = base_schema.as_object_mut() {
            obj.insert("type".to_string(), non_null);
        }
        let base = translate(&base_schema)?;

        let has_null = types.iter().any(|t| t.as_str() == Some("null"));
        return Ok(if has_null {
            ValidatorNode::Nullable(Box::new(base))
        } else {
            base
        });
    }

    match schema.get("type").and_then(Value::as_str) {
        Some("string") => Ok(ValidatorNode::String),
        Some("number") => Ok(ValidatorNode::Number),
        Some("integer") => Ok(ValidatorNode::Integer),
        Some("boolean") => Ok(ValidatorNode::Boolean),

        Some("array") => {
            let items = schema.get("items").ok_or(SchemaError::ArrayMissingItems)?;
            Ok(ValidatorNode::Array(Box::new(translate(items)?)))
        }

        Some("object") => {
            let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
                // No declared properties: accept any mapping.
                return Ok(ValidatorNode::Object(BTreeMap::new()));
            };

            let required: Vec<&str> = schema
                .get("required")
                .and_then(Value::as_array)
                .map(|r| r.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();

            let mut shape = BTreeMap::new();
            for (name, prop_schema) in properties {
                let node = translate(prop_schema)?;
                shape.insert(
                    name.clone(),
                    PropertyRule {
                        node,
                        required: required.contains(&name.as_str()),
                        description: prop_schema
                            .get("description")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                    },
                );
            }
            Ok(ValidatorNode::Object(shape))
        }

        other => Err(SchemaError::UnsupportedType(
            other.map_or_else(|| "none".to_string(), str::to_string),
        )),
    }
}

/// Translate a tool's top-level parameters schema.
///
/// The registration contract requires an object schema with a declared
/// `properties` map at the root; anything else fails translation for that
/// tool. Nested objects stay permissive without `properties`.
pub fn translate_parameters(schema: &Value) -> Result<ValidatorNode, SchemaError> {
    if schema.get("properties").is_none() {
        return Err(SchemaError::TopLevelNotObject);
    }
    match translate(schema)? {
        node @ ValidatorNode::Object(_) => Ok(node),
        _ => Err(SchemaError::TopLevelNotObject),
    }
}

impl ValidatorNode {
    /// Validate a value against this node, collecting every violation.
    pub fn validate(&self, value: &Value) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();
        self.check(value, "", &mut violations);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    fn check(&self, value: &Value, path: &str, out: &mut Vec<Violation>) {
        match self {
            Self::Nullable(inner) => {
                if !value.is_null() {
                    inner.check(value, path, out);
                }
            }

            _ if value.is_null() => {
                out.push(Violation::new(path, format!("expected {}, got null", self.kind())));
            }

            Self::String => {
                if !value.is_string() {
                    out.push(Violation::new(path, format!("expected string, got {}", type_name(value))));
                }
            }

            Self::Number => {
                if !value.is_number() {
                    out.push(Violation::new(path, format!("expected number, got {}", type_name(value))));
                }
            }

            Self::Integer => {
                let whole = value.as_i64().is_some()
                    || value.as_u64().is_some()
                    || value.as_f64().is_some_and(|f| f.fract() == 0.0);
                if !value.is_number() || !whole {
                    out.push(Violation::new(path, format!("expected integer, got {}", type_name(value))));
                }
            }

            Self::Boolean => {
                if !value.is_boolean() {
                    out.push(Violation::new(path, format!("expected boolean, got {}", type_name(value))));
                }
            }

            Self::Array(items) => match value.as_array() {
                Some(elements) => {
                    for (index, element) in elements.iter().enumerate() {
                        items.check(element, &join_index(path, index), out);
                    }
                }
                None => {
                    out.push(Violation::new(path, format!("expected array, got {}", type_name(value))));
                }
            },

            Self::Object(shape) => match value.as_object() {
                Some(map) => {
                    for (name, rule) in shape {
                        match map.get(name) {
                            Some(member) => rule.node.check(member, &join_key(path, name), out),
                            None if rule.required => {
                                out.push(Violation::new(
                                    &join_key(path, name),
                                    "missing required property",
                                ));
                            }
                            None => {}
                        }
                    }
                }
                None => {
                    out.push(Violation::new(path, format!("expected object, got {}", type_name(value))));
                }
            },
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Nullable(_) => "nullable",
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join_key(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn join_index(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_translate_leaf_kinds() {
        for (kind, good, bad) in [
            ("string", json!("x"), json!(1)),
            ("number", json!(1.5), json!("x")),
            ("integer", json!(7), json!(1.5)),
            ("boolean", json!(true), json!(0)),
        ] {
            let node = translate(&json!({ "type": kind })).unwrap();
            assert!(node.validate(&good).is_ok(), "{kind} should accept {good}");
            assert!(node.validate(&bad).is_err(), "{kind} should reject {bad}");
        }
    }

    #[test]
    fn test_integer_accepts_whole_float() {
        let node = translate(&json!({ "type": "integer" })).unwrap();
        assert!(node.validate(&json!(3.0)).is_ok());
        assert!(node.validate(&json!(3.5)).is_err());
    }

    #[test]
    fn test_nullable_union_accepts_base_and_null() {
        let node = translate(&json!({ "type": ["string", "null"] })).unwrap();
        assert!(node.validate(&json!("hello")).is_ok());
        assert!(node.validate(&json!(null)).is_ok());
        assert!(node.validate(&json!(42)).is_err());
        assert!(node.validate(&json!(true)).is_err());
    }

    #[test]
    fn test_null_rejected_when_not_nullable() {
        let node = translate(&json!({ "type": "string" })).unwrap();
        let violations = node.validate(&json!(null)).unwrap_err();
        assert!(violations[0].message.contains("null"));
    }

    #[test]
    fn test_union_of_only_null_is_unsupported() {
        let err = translate(&json!({ "type": ["null"] })).unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedType(_)));
    }

    #[test]
    fn test_array_requires_items() {
        let err = translate(&json!({ "type": "array" })).unwrap_err();
        assert!(matches!(err, SchemaError::ArrayMissingItems));
    }

    #[test]
    fn test_array_validates_elements() {
        let node = translate(&json!({ "type": "array", "items": { "type": "integer" } })).unwrap();
        assert!(node.validate(&json!([1, 2, 3])).is_ok());

        let violations = node.validate(&json!([1, "two", 3])).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "[1]");
    }

    #[test]
    fn test_nullable_array_schema() {
        let node = translate(&json!({
            "type": ["array", "null"],
            "items": { "type": "string" }
        }))
        .unwrap();
        assert!(node.validate(&json!(null)).is_ok());
        assert!(node.validate(&json!(["a", "b"])).is_ok());
        assert!(node.validate(&json!("a")).is_err());
    }

    #[test]
    fn test_object_without_properties_is_permissive() {
        let node = translate(&json!({ "type": "object" })).unwrap();
        assert!(node.validate(&json!({ "anything": [1, 2], "goes": true })).is_ok());
        assert!(node.validate(&json!("not an object")).is_err());
    }

    #[test]
    fn test_object_required_property_missing() {
        let node = translate(&json!({
            "type": "object",
            "properties": { "id": { "type": "string" } },
            "required": ["id"]
        }))
        .unwrap();

        let violations = node.validate(&json!({})).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "id");
        assert!(violations[0].message.contains("missing required"));

        assert!(node.validate(&json!({ "id": "42" })).is_ok());
    }

    #[test]
    fn test_object_optional_property_absent_ok() {
        let node = translate(&json!({
            "type": "object",
            "properties": { "note": { "type": "string" } }
        }))
        .unwrap();
        assert!(node.validate(&json!({})).is_ok());
        assert!(node.validate(&json!({ "note": 1 })).is_err());
    }

    #[test]
    fn test_object_ignores_undeclared_properties() {
        let node = translate(&json!({
            "type": "object",
            "properties": { "id": { "type": "string" } },
            "required": ["id"]
        }))
        .unwrap();
        assert!(node.validate(&json!({ "id": "1", "extra": [] })).is_ok());
    }

    #[test]
    fn test_description_carried_as_metadata() {
        let node = translate(&json!({
            "type": "object",
            "properties": {
                "email": { "type": "string", "description": "The email address of the user." }
            }
        }))
        .unwrap();

        let ValidatorNode::Object(shape) = node else {
            panic!("expected object node");
        };
        assert_eq!(
            shape["email"].description.as_deref(),
            Some("The email address of the user.")
        );
    }

    #[test]
    fn test_unsupported_type_fails() {
        let err = translate(&json!({ "type": "function" })).unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedType(_)));

        let err = translate(&json!({})).unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedType(_)));
    }

    #[test]
    fn test_top_level_must_be_object() {
        assert!(translate_parameters(&json!({ "type": "object", "properties": {} })).is_ok());
        let err = translate_parameters(&json!({ "type": "string" })).unwrap_err();
        assert!(matches!(err, SchemaError::TopLevelNotObject));
    }

    #[test]
    fn test_top_level_object_requires_properties() {
        // Permissive objects are for nested positions only; a parameters
        // root without a properties map fails that tool's registration.
        let err = translate_parameters(&json!({ "type": "object" })).unwrap_err();
        assert!(matches!(err, SchemaError::TopLevelNotObject));

        let nested = translate(&json!({
            "type": "object",
            "properties": { "filters": { "type": "object" } }
        }))
        .unwrap();
        assert!(nested.validate(&json!({ "filters": { "any": 1 } })).is_ok());
    }

    #[test]
    fn test_nested_violation_paths() {
        let node = translate(&json!({
            "type": "object",
            "properties": {
                "order_ids": { "type": "array", "items": { "type": "integer" } }
            },
            "required": ["order_ids"]
        }))
        .unwrap();

        let violations = node.validate(&json!({ "order_ids": [10, "x"] })).unwrap_err();
        assert_eq!(violations[0].path, "order_ids[1]");
    }
}
