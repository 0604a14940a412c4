//! Argument synthesis: the composition of flatten → collision check →
//! per-field codec into externally consumable argument descriptors.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::codec::{ArrayPolicy, ParseFn, decide};
use crate::collision::CollisionError;
use crate::flatten::{FlattenOptions, FlattenedField, flatten};
use crate::introspect::BaseType;
use crate::shape::Shape;
use crate::unwrap::unwrap_field;

/// Type tag presented to the consuming CLI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgType {
    String,
    Number,
    Boolean,
    /// Opaque tag for array/object leaves; the attached parse function
    /// decodes the raw token.
    Custom,
}

/// The externally visible argument descriptor for one flat key.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedArgument {
    /// Type tag (`enum` maps to string, array/object map to custom).
    pub type_tag: ArgType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Single-character alias, only ever supplied by an override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_alias: Option<String>,
    /// `Some(true)` or `None`, never `Some(false)`, by convention of the
    /// consuming CLI layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// True when the flag should be accepted multiple times.
    pub multiple: bool,
    /// Parse function for custom-typed arguments.
    #[serde(skip_serializing)]
    pub parse: Option<ParseFn>,
}

/// Caller-supplied per-key override. Every populated attribute wins over
/// the derived value.
#[derive(Debug, Clone, Default)]
pub struct ArgOverride {
    pub type_tag: Option<ArgType>,
    pub description: Option<String>,
    pub short_alias: Option<String>,
    pub required: Option<bool>,
    pub default: Option<Value>,
    pub parse: Option<ParseFn>,
}

/// Options for [`synthesize_arguments`].
#[derive(Debug, Clone, Default)]
pub struct SynthesizeOptions {
    /// Flatten pass options.
    pub flatten: FlattenOptions,
    /// Array encoding policy.
    pub policy: ArrayPolicy,
    /// Raise [`CollisionError`] instead of warning when flat keys collide.
    pub strict: bool,
}

/// Flattens a shape and synthesizes one [`GeneratedArgument`] per flat key.
///
/// Collisions raise in strict mode; otherwise the report is logged and the
/// last-processed field wins, exactly as in [`flatten`].
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use flatarg_core::{ArgType, FieldSchema, Shape, SynthesizeOptions, synthesize_arguments};
///
/// let shape = Shape::new()
///     .with_field("name", FieldSchema::string())
///     .with_field("tags", FieldSchema::array(FieldSchema::string()).optional());
///
/// let args = synthesize_arguments(&shape, &HashMap::new(), &SynthesizeOptions::default())
///     .unwrap();
/// assert_eq!(args["name"].type_tag, ArgType::String);
/// assert_eq!(args["name"].required, Some(true));
/// assert_eq!(args["tags"].type_tag, ArgType::Custom);
/// assert_eq!(args["tags"].required, None);
/// ```
pub fn synthesize_arguments(
    shape: &Shape,
    overrides: &HashMap<String, ArgOverride>,
    options: &SynthesizeOptions,
) -> Result<HashMap<String, GeneratedArgument>, CollisionError> {
    let context = flatten(shape, &options.flatten);

    if !context.collisions.is_empty() {
        if options.strict {
            return Err(CollisionError::new(&context.collisions));
        }
        warn!(
            colliding_keys = context.collisions.len(),
            "flat key collisions detected:\n{}",
            context.collisions.report()
        );
    }

    let mut args = HashMap::with_capacity(context.fields.len());
    for field in &context.fields {
        let argument = synthesize_one(field, overrides.get(&field.flat_key), options.policy);
        args.insert(field.flat_key.clone(), argument);
    }
    Ok(args)
}

fn synthesize_one(
    field: &FlattenedField,
    overridden: Option<&ArgOverride>,
    policy: ArrayPolicy,
) -> GeneratedArgument {
    let (derived_type, derived_parse, multiple) = match field.info.base_type {
        BaseType::Array => {
            let encoding = decide(BaseType::Array, element_is_object(field), policy);
            (ArgType::Custom, Some(encoding.parse), encoding.multi_value_repeat)
        }
        BaseType::Object => {
            let encoding = decide(BaseType::Object, false, policy);
            (ArgType::Custom, Some(encoding.parse), false)
        }
        BaseType::Enum | BaseType::String => (ArgType::String, None, false),
        BaseType::Number => (ArgType::Number, None, false),
        BaseType::Boolean => (ArgType::Boolean, None, false),
    };

    let required = match overridden.and_then(|o| o.required) {
        Some(explicit) => normalize_required(explicit),
        None => normalize_required(!field.optional),
    };

    GeneratedArgument {
        type_tag: overridden.and_then(|o| o.type_tag).unwrap_or(derived_type),
        description: overridden
            .and_then(|o| o.description.clone())
            .or_else(|| field.info.description.clone()),
        short_alias: overridden.and_then(|o| o.short_alias.clone()),
        required,
        default: overridden
            .and_then(|o| o.default.clone())
            .or_else(|| field.info.default.clone()),
        multiple,
        parse: overridden.and_then(|o| o.parse.clone()).or(derived_parse),
    }
}

/// `required` is only ever the literal `true` or omitted, never `false`.
fn normalize_required(required: bool) -> Option<bool> {
    required.then_some(true)
}

fn element_is_object(field: &FlattenedField) -> bool {
    field
        .schema
        .element_schema()
        .map(|element| {
            matches!(
                unwrap_field(element).schema.kind,
                crate::shape::FieldKind::Object(_)
            )
        })
        .unwrap_or(false)
}
