//! Serializable shape definition format.
//!
//! [`ShapeDef`] is the serde-facing counterpart of [`Shape`]: a plain data
//! description that round-trips through JSON (or YAML, via any serde
//! deserializer) and converts into the engine model with
//! [`ShapeDef::into_shape`]. Fields are a list rather than a map so
//! declaration order survives serialization.
//!
//! ```
//! use flatarg_core::ShapeDef;
//!
//! let def = ShapeDef::from_json(
//!     r#"{"fields": [
//!         {"name": "config", "type": "object", "fields": [
//!             {"name": "timeout", "type": "number", "default": 30}
//!         ]},
//!         {"name": "name", "type": "string", "description": "Display name"}
//!     ]}"#,
//! ).unwrap();
//!
//! let shape = def.into_shape();
//! assert_eq!(shape.len(), 2);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::shape::{FieldSchema, Shape};

/// A serializable shape description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShapeDef {
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

/// A serializable field description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name, used verbatim as a flat key segment.
    pub name: String,
    /// Base type tag: `string`, `number`, `boolean`, `enum`, `array`, or
    /// `object`. Anything else degrades to `string`.
    #[serde(rename = "type", default = "default_type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Wraps the schema in an `optional` layer.
    #[serde(default)]
    pub optional: bool,
    /// Wraps the schema in a `nullable` layer.
    #[serde(default)]
    pub nullable: bool,
    /// Wraps the schema in a `default` layer with this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Allowed values for `enum` fields, in declaration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    /// Element description for `array` fields (defaults to string).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<FieldDef>>,
    /// Nested fields for `object` fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldDef>>,
}

fn default_type() -> String {
    "string".to_string()
}

impl ShapeDef {
    /// Parses a definition from JSON text.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Converts the definition into the engine model.
    pub fn into_shape(self) -> Shape {
        let mut shape = Shape::new();
        for field in self.fields {
            let name = field.name.clone();
            shape = shape.with_field(&name, field.into_schema());
        }
        shape
    }
}

impl FieldDef {
    fn into_schema(self) -> FieldSchema {
        let mut schema = match self.field_type.as_str() {
            "string" => FieldSchema::string(),
            "number" | "integer" => FieldSchema::number(),
            "boolean" | "bool" => FieldSchema::boolean(),
            "enum" => FieldSchema::enumeration(self.values.unwrap_or_default()),
            "array" => {
                let element = match self.items {
                    Some(items) => items.into_schema(),
                    None => FieldSchema::string(),
                };
                FieldSchema::array(element)
            }
            "object" => {
                let inner = ShapeDef {
                    fields: self.fields.unwrap_or_default(),
                };
                FieldSchema::object(inner.into_shape())
            }
            other => {
                warn!(field = %self.name, tag = %other, "unrecognized type tag; degrading to string");
                FieldSchema::string()
            }
        };

        if let Some(description) = &self.description {
            schema = schema.describe(description);
        }
        if let Some(default) = self.default {
            schema = schema.default_value(default);
        }
        if self.nullable {
            schema = schema.nullable();
        }
        if self.optional {
            schema = schema.optional();
        }
        schema
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::flatten::{FlattenOptions, flatten};
    use crate::introspect::{BaseType, introspect};
    use crate::shape::FieldKind;
    use crate::unwrap::unwrap_field;

    use super::*;

    #[test]
    fn test_nested_definition_flattens() {
        let def = ShapeDef::from_json(
            r#"{"fields": [
                {"name": "config", "type": "object", "fields": [
                    {"name": "timeout", "type": "number"},
                    {"name": "retries", "type": "number", "optional": true}
                ]},
                {"name": "name", "type": "string"}
            ]}"#,
        )
        .unwrap();

        let context = flatten(&def.into_shape(), &FlattenOptions::default());
        let keys: Vec<&str> = context.fields.iter().map(|f| f.flat_key.as_str()).collect();
        assert_eq!(keys, vec!["config-timeout", "config-retries", "name"]);
        assert!(context.fields[1].optional);
    }

    #[test]
    fn test_unknown_type_degrades_to_string() {
        let def = ShapeDef::from_json(
            r#"{"fields": [{"name": "weird", "type": "uuid"}]}"#,
        )
        .unwrap();

        let shape = def.into_shape();
        let info = introspect(&unwrap_field(&shape.fields()[0].schema));
        assert_eq!(info.base_type, BaseType::String);
    }

    #[test]
    fn test_missing_type_defaults_to_string() {
        let def = ShapeDef::from_json(r#"{"fields": [{"name": "plain"}]}"#).unwrap();
        let shape = def.into_shape();
        assert!(matches!(
            shape.fields()[0].schema.kind,
            FieldKind::String
        ));
    }

    #[test]
    fn test_wrappers_applied_from_flags() {
        let def = ShapeDef::from_json(
            r#"{"fields": [
                {"name": "level", "type": "enum", "values": ["info", "debug"],
                 "default": "info", "optional": true, "nullable": true}
            ]}"#,
        )
        .unwrap();

        let shape = def.into_shape();
        let unwrapped = unwrap_field(&shape.fields()[0].schema);
        assert!(!unwrapped.required);
        assert_eq!(unwrapped.default, Some(json!("info")));
        assert!(matches!(unwrapped.schema.kind, FieldKind::Enum(_)));
    }

    #[test]
    fn test_array_items_describe_element() {
        let def = ShapeDef::from_json(
            r#"{"fields": [
                {"name": "entries", "type": "array",
                 "items": {"name": "entry", "type": "object", "fields": [
                     {"name": "id", "type": "number"}
                 ]}}
            ]}"#,
        )
        .unwrap();

        let shape = def.into_shape();
        let element = shape.fields()[0].schema.element_schema().unwrap();
        assert!(matches!(element.kind, FieldKind::Object(_)));
    }

    #[test]
    fn test_definition_round_trips_through_json() {
        let def = ShapeDef {
            fields: vec![FieldDef {
                name: "port".to_string(),
                field_type: "number".to_string(),
                description: Some("listen port".to_string()),
                optional: true,
                nullable: false,
                default: Some(json!(8080)),
                values: None,
                items: None,
                fields: None,
            }],
        };

        let raw = serde_json::to_string(&def).unwrap();
        let parsed = ShapeDef::from_json(&raw).unwrap();
        assert_eq!(parsed.fields[0].name, "port");
        assert_eq!(parsed.fields[0].default, Some(json!(8080)));
        assert!(parsed.fields[0].optional);
    }
}
