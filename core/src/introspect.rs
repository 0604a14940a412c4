//! Base-type classification of unwrapped fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::shape::FieldKind;
use crate::unwrap::Unwrapped;

/// The closed set of base types a field can classify as.
///
/// Never a wrapper tag — wrappers are stripped by
/// [`unwrap_field`](crate::unwrap_field) before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseType {
    String,
    Number,
    Boolean,
    Array,
    Object,
    Enum,
}

/// Classification of a single unwrapped field.
///
/// # Examples
///
/// ```
/// use flatarg_core::{BaseType, FieldSchema, introspect, unwrap_field};
///
/// let field = FieldSchema::enumeration(["json", "yaml"]).optional();
/// let info = introspect(&unwrap_field(&field));
/// assert_eq!(info.base_type, BaseType::Enum);
/// assert!(!info.required);
/// assert_eq!(info.enum_values, Some(vec!["json".into(), "yaml".into()]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldInfo {
    /// Classified base type.
    pub base_type: BaseType,
    /// Whether the field must be supplied (before ancestor propagation).
    pub required: bool,
    /// Default value, if a default wrapper produced one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Description text, if any layer carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Allowed values for enumerations, in declaration order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

/// Maps an unwrapped field to a [`FieldInfo`].
///
/// An unrecognized tag does not raise: it degrades to `string`. The only
/// way a wrapper tag reaches this point is a chain deeper than the unwrap
/// bound, and silently failing shut there would drop the field entirely, so
/// the degradation is deliberate and logged.
pub fn introspect(unwrapped: &Unwrapped<'_>) -> FieldInfo {
    let (base_type, enum_values) = match &unwrapped.schema.kind {
        FieldKind::String => (BaseType::String, None),
        FieldKind::Number => (BaseType::Number, None),
        FieldKind::Boolean => (BaseType::Boolean, None),
        FieldKind::Array(_) => (BaseType::Array, None),
        FieldKind::Object(_) => (BaseType::Object, None),
        FieldKind::Enum(values) => (BaseType::Enum, Some(values.clone())),
        wrapper => {
            warn!(?wrapper, "unrecognized field tag; degrading to string");
            (BaseType::String, None)
        }
    };

    FieldInfo {
        base_type,
        required: unwrapped.required,
        default: unwrapped.default.clone(),
        description: unwrapped.description.clone(),
        enum_values,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::shape::{FieldSchema, Shape};
    use crate::unwrap::{MAX_UNWRAP_DEPTH, unwrap_field};

    use super::*;

    #[test]
    fn test_base_type_dispatch() {
        let cases = [
            (FieldSchema::string(), BaseType::String),
            (FieldSchema::number(), BaseType::Number),
            (FieldSchema::boolean(), BaseType::Boolean),
            (FieldSchema::array(FieldSchema::string()), BaseType::Array),
            (FieldSchema::object(Shape::new()), BaseType::Object),
        ];
        for (field, expected) in cases {
            let info = introspect(&unwrap_field(&field));
            assert_eq!(info.base_type, expected);
        }
    }

    #[test]
    fn test_enum_values_preserve_order() {
        let field = FieldSchema::enumeration(["c", "a", "b"]);
        let info = introspect(&unwrap_field(&field));
        assert_eq!(info.enum_values, Some(vec!["c".into(), "a".into(), "b".into()]));
    }

    #[test]
    fn test_default_and_description_carried_over() {
        let field = FieldSchema::number()
            .describe("port to bind")
            .default_value(json!(8080));
        let info = introspect(&unwrap_field(&field));
        assert!(!info.required);
        assert_eq!(info.default, Some(json!(8080)));
        assert_eq!(info.description.as_deref(), Some("port to bind"));
    }

    #[test]
    fn test_overdeep_wrapper_chain_degrades_to_string() {
        let mut field = FieldSchema::number();
        for _ in 0..(MAX_UNWRAP_DEPTH + 2) {
            field = field.nullable();
        }
        let info = introspect(&unwrap_field(&field));
        assert_eq!(info.base_type, BaseType::String);
    }
}
