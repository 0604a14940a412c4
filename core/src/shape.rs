//! Shape and field schema definitions.
//!
//! This module defines the structural data model the engine operates on:
//! a [`Shape`] is an ordered collection of named fields, and each field
//! carries a [`FieldSchema`] describing either a base type (string, number,
//! boolean, enumeration, array, nested object) or a wrapper layer around
//! another schema (optional, default, nullable, catch).
//!
//! # Example
//!
//! ```
//! use flatarg_core::{FieldSchema, Shape};
//!
//! let shape = Shape::new()
//!     .with_field(
//!         "config",
//!         FieldSchema::object(
//!             Shape::new()
//!                 .with_field("timeout", FieldSchema::number())
//!                 .with_field("retries", FieldSchema::number().optional()),
//!         ),
//!     )
//!     .with_field("name", FieldSchema::string().describe("Display name"));
//!
//! assert_eq!(shape.len(), 2);
//! assert!(shape.find_field("name").is_some());
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Fallible producer for a default value.
///
/// Mirrors schema libraries that accept a default-generating function: the
/// provider may fail, in which case the default is treated as absent (see
/// [`unwrap_field`](crate::unwrap_field)).
pub type DefaultFn = Arc<dyn Fn() -> Result<Value, String> + Send + Sync>;

/// Default attached by a `default` wrapper: either a stored value or a
/// provider function evaluated at unwrap time.
#[derive(Clone)]
pub enum DefaultValue {
    /// A literal default value.
    Value(Value),
    /// A function producing the default, which may fail.
    Provider(DefaultFn),
}

impl DefaultValue {
    /// Convenience constructor wrapping a provider closure.
    pub fn provider(f: impl Fn() -> Result<Value, String> + Send + Sync + 'static) -> Self {
        Self::Provider(Arc::new(f))
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

/// The closed set of schema tags.
///
/// Base variants describe what a field holds; wrapper variants modify
/// requiredness/default behavior of an inner schema without changing its
/// base type. Wrappers are stripped by [`unwrap_field`](crate::unwrap_field)
/// before any base-type dispatch happens.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// UTF-8 string.
    String,
    /// Numeric value (integer or float).
    Number,
    /// Boolean.
    Boolean,
    /// One of a fixed set of string values, in declaration order.
    Enum(Vec<String>),
    /// Homogeneous list with the given element schema.
    Array(Box<FieldSchema>),
    /// Nested shape.
    Object(Shape),
    /// Value may be omitted entirely.
    Optional(Box<FieldSchema>),
    /// Value falls back to a default when omitted.
    Default(Box<FieldSchema>, DefaultValue),
    /// Value may be null.
    Nullable(Box<FieldSchema>),
    /// Value falls back to the stored fallback when it fails validation
    /// downstream. The engine only cares that this relaxes requiredness.
    Catch(Box<FieldSchema>, Value),
}

impl FieldKind {
    /// Returns true for wrapper variants (optional/default/nullable/catch).
    pub fn is_wrapper(&self) -> bool {
        matches!(
            self,
            Self::Optional(_) | Self::Default(..) | Self::Nullable(_) | Self::Catch(..)
        )
    }
}

/// A field description: a schema tag plus optional description text.
///
/// Built with the base-type constructors and chained wrapper combinators:
///
/// ```
/// use flatarg_core::FieldSchema;
/// use serde_json::json;
///
/// let field = FieldSchema::number()
///     .describe("Request timeout in seconds")
///     .default_value(json!(30))
///     .optional();
/// assert!(field.kind.is_wrapper());
/// ```
#[derive(Debug, Clone)]
pub struct FieldSchema {
    /// Schema tag (base type or wrapper).
    pub kind: FieldKind,
    /// Description text attached at this layer.
    pub description: Option<String>,
}

impl FieldSchema {
    fn from_kind(kind: FieldKind) -> Self {
        Self {
            kind,
            description: None,
        }
    }

    /// String field.
    pub fn string() -> Self {
        Self::from_kind(FieldKind::String)
    }

    /// Number field.
    pub fn number() -> Self {
        Self::from_kind(FieldKind::Number)
    }

    /// Boolean field.
    pub fn boolean() -> Self {
        Self::from_kind(FieldKind::Boolean)
    }

    /// Enumeration field with allowed values in declaration order.
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_kind(FieldKind::Enum(
            values.into_iter().map(Into::into).collect(),
        ))
    }

    /// Array field with the given element schema.
    pub fn array(element: FieldSchema) -> Self {
        Self::from_kind(FieldKind::Array(Box::new(element)))
    }

    /// Nested object field.
    pub fn object(shape: Shape) -> Self {
        Self::from_kind(FieldKind::Object(shape))
    }

    /// Wraps this schema in an `optional` layer.
    pub fn optional(self) -> Self {
        Self::from_kind(FieldKind::Optional(Box::new(self)))
    }

    /// Wraps this schema in a `default` layer with a literal value.
    pub fn default_value(self, value: Value) -> Self {
        Self::from_kind(FieldKind::Default(Box::new(self), DefaultValue::Value(value)))
    }

    /// Wraps this schema in a `default` layer with a provider function.
    pub fn default_with(self, f: impl Fn() -> Result<Value, String> + Send + Sync + 'static) -> Self {
        Self::from_kind(FieldKind::Default(Box::new(self), DefaultValue::provider(f)))
    }

    /// Wraps this schema in a `nullable` layer.
    pub fn nullable(self) -> Self {
        Self::from_kind(FieldKind::Nullable(Box::new(self)))
    }

    /// Wraps this schema in a `catch` layer with the given fallback value.
    pub fn catch(self, fallback: Value) -> Self {
        Self::from_kind(FieldKind::Catch(Box::new(self), fallback))
    }

    /// Attaches description text at this layer.
    pub fn describe(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    /// Element schema for array fields, `None` otherwise.
    pub fn element_schema(&self) -> Option<&FieldSchema> {
        match &self.kind {
            FieldKind::Array(element) => Some(element),
            _ => None,
        }
    }
}

/// A named field inside a [`Shape`].
#[derive(Debug, Clone)]
pub struct Field {
    /// Field name as declared; used verbatim as a flat key segment.
    pub name: String,
    /// Field schema.
    pub schema: FieldSchema,
}

/// An ordered set of named fields.
///
/// Field order is declaration order and is preserved through flattening.
///
/// # Examples
///
/// ```
/// use flatarg_core::{FieldSchema, Shape};
///
/// let shape = Shape::new()
///     .with_field("host", FieldSchema::string())
///     .with_field("port", FieldSchema::number());
/// assert_eq!(shape.fields()[0].name, "host");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Shape {
    fields: Vec<Field>,
}

impl Shape {
    /// Creates an empty shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, preserving declaration order.
    pub fn with_field(mut self, name: &str, schema: FieldSchema) -> Self {
        self.fields.push(Field {
            name: name.to_string(),
            schema,
        });
        self
    }

    /// The fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of direct fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the shape has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Finds a direct field by name.
    pub fn find_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_builder_preserves_declaration_order() {
        let shape = Shape::new()
            .with_field("b", FieldSchema::string())
            .with_field("a", FieldSchema::number());

        let names: Vec<&str> = shape.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_wrapper_combinators_nest() {
        let field = FieldSchema::string().optional().default_value(json!("x"));
        assert!(field.kind.is_wrapper());

        let FieldKind::Default(inner, DefaultValue::Value(value)) = &field.kind else {
            panic!("expected default wrapper");
        };
        assert_eq!(value, &json!("x"));
        assert!(matches!(inner.kind, FieldKind::Optional(_)));
    }

    #[test]
    fn test_element_schema_only_on_arrays() {
        let array = FieldSchema::array(FieldSchema::number());
        assert!(array.element_schema().is_some());
        assert!(FieldSchema::string().element_schema().is_none());
    }

    #[test]
    fn test_enumeration_keeps_value_order() {
        let field = FieldSchema::enumeration(["json", "yaml", "toml"]);
        let FieldKind::Enum(values) = &field.kind else {
            panic!("expected enum");
        };
        assert_eq!(values, &vec!["json", "yaml", "toml"]);
    }
}
