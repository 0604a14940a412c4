//! Wrapper stripping with requiredness and default accumulation.
//!
//! [`unwrap_field`] peels modifier layers (optional, default, nullable,
//! catch) off a [`FieldSchema`] until it reaches a base type, accumulating
//! the field's effective requiredness and default value along the way. The
//! loop re-checks the tag after every unwrap, so the order in which wrappers
//! were chained never changes the result.

use serde_json::Value;
use tracing::debug;

use crate::shape::{DefaultValue, FieldKind, FieldSchema};

/// Maximum number of wrapper layers stripped before giving up.
///
/// Bounds the unwrap loop against pathological wrapper chains. A schema that
/// still has a wrapper tag after this many layers degrades fail-open during
/// introspection (see [`introspect`](crate::introspect)).
pub const MAX_UNWRAP_DEPTH: usize = 10;

/// Result of stripping wrappers from a field description.
#[derive(Debug, Clone)]
pub struct Unwrapped<'a> {
    /// The innermost schema reached (a base type unless the wrapper chain
    /// exceeded [`MAX_UNWRAP_DEPTH`]).
    pub schema: &'a FieldSchema,
    /// False if any optional/default/nullable/catch layer was present.
    pub required: bool,
    /// Default from the outermost `default` layer, if it produced one.
    pub default: Option<Value>,
    /// Description from the outermost layer that carries one.
    pub description: Option<String>,
}

/// Strips wrapper layers from a field description.
///
/// Every recognized wrapper clears `required`; a `default` layer also
/// records its value. A failing default provider is tolerated: the default
/// is simply absent. Chained wrappers commute — `optional().nullable()` and
/// `nullable().optional()` yield identical results.
///
/// # Examples
///
/// ```
/// use flatarg_core::{FieldSchema, unwrap_field};
/// use serde_json::json;
///
/// let field = FieldSchema::number().default_value(json!(30)).optional();
/// let unwrapped = unwrap_field(&field);
/// assert!(!unwrapped.required);
/// assert_eq!(unwrapped.default, Some(json!(30)));
/// ```
pub fn unwrap_field(field: &FieldSchema) -> Unwrapped<'_> {
    let mut current = field;
    let mut required = true;
    let mut default = None;
    let mut description = field.description.clone();

    for _ in 0..MAX_UNWRAP_DEPTH {
        let inner = match &current.kind {
            FieldKind::Optional(inner) | FieldKind::Nullable(inner) => {
                required = false;
                inner
            }
            FieldKind::Catch(inner, _) => {
                required = false;
                inner
            }
            FieldKind::Default(inner, value) => {
                required = false;
                if default.is_none() {
                    default = evaluate_default(value);
                }
                inner
            }
            _ => break,
        };
        current = inner;
        if description.is_none() {
            description = current.description.clone();
        }
    }

    Unwrapped {
        schema: current,
        required,
        default,
        description,
    }
}

fn evaluate_default(value: &DefaultValue) -> Option<Value> {
    match value {
        DefaultValue::Value(value) => Some(value.clone()),
        DefaultValue::Provider(provider) => match provider() {
            Ok(value) => Some(value),
            Err(reason) => {
                debug!(%reason, "default provider failed; treating default as absent");
                None
            }
        },
    }
}
