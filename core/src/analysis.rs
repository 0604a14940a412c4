//! Combined shape analysis: flatten, collision detection, and structural
//! validation in one pass, producing a cacheable [`SchemaAnalysis`].

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::collision::{CollisionError, CollisionRecord};
use crate::flatten::{FlattenContext, FlattenOptions, FlattenedField, flatten};
use crate::introspect::{FieldInfo, introspect};
use crate::shape::{FieldKind, FieldSchema, Shape};
use crate::unwrap::{MAX_UNWRAP_DEPTH, unwrap_field};

/// Structural problems found while validating a shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// A field with an empty or whitespace-only name.
    #[error("field name cannot be empty at path: {0}")]
    EmptyFieldName(String),
    /// Two fields with the same name at one shape level.
    #[error("duplicate field in shape: {0}")]
    DuplicateField(String),
    /// A wrapper chain deeper than the unwrap bound; the field degrades
    /// fail-open to string.
    #[error("wrapper chain exceeds unwrap bound at path: {0}")]
    WrapperDepthExceeded(String),
}

/// Options for [`analyze`].
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Flatten pass options.
    pub flatten: FlattenOptions,
    /// Raise [`CollisionError`] instead of warning when flat keys collide.
    pub strict: bool,
}

/// Full analysis of one shape.
///
/// Produced by [`analyze`] and memoized by
/// [`AnalysisCache`](crate::AnalysisCache). Treat the analyzed shape as
/// immutable afterwards — the cache has no content-based invalidation.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaAnalysis {
    /// Top-level field classifications in declaration order.
    pub fields: Vec<FieldInfo>,
    /// Flattened leaves.
    pub flattened: Vec<FlattenedField>,
    /// Flat keys that must be supplied (effective, ancestor-propagated).
    pub required: Vec<String>,
    /// True if any field required descending into a child shape.
    pub has_nested: bool,
    /// The effective maximum depth used.
    pub max_depth: usize,
    /// Flat keys produced by more than one distinct structural path.
    pub collisions: CollisionRecord,
    /// True when no structural errors were found.
    pub is_valid: bool,
    /// Non-fatal findings (collision report lines in non-strict mode).
    pub warnings: Vec<String>,
    /// Structural errors rendered as text.
    pub errors: Vec<String>,
}

/// Analyzes a shape: flatten, collision check, requiredness extraction, and
/// structural validation.
///
/// In strict mode a non-empty collision map raises; otherwise each
/// colliding key becomes one warning line and analysis proceeds.
///
/// # Examples
///
/// ```
/// use flatarg_core::{AnalyzeOptions, FieldSchema, Shape, analyze};
///
/// let shape = Shape::new()
///     .with_field("name", FieldSchema::string())
///     .with_field("tags", FieldSchema::array(FieldSchema::string()).optional());
///
/// let analysis = analyze(&shape, &AnalyzeOptions::default()).unwrap();
/// assert!(analysis.is_valid);
/// assert_eq!(analysis.required, vec!["name".to_string()]);
/// ```
pub fn analyze(shape: &Shape, options: &AnalyzeOptions) -> Result<SchemaAnalysis, CollisionError> {
    let context = flatten(shape, &options.flatten);

    let mut warnings = Vec::new();
    if !context.collisions.is_empty() {
        if options.strict {
            return Err(CollisionError::new(&context.collisions));
        }
        warn!(
            colliding_keys = context.collisions.len(),
            "flat key collisions detected:\n{}",
            context.collisions.report()
        );
        for entry in context.collisions.entries() {
            warnings.push(format!(
                "colliding flat key {}: {}",
                entry.flat_key,
                entry.paths.join(", ")
            ));
        }
    }

    let errors: Vec<String> = validate_shape(shape)
        .iter()
        .map(ToString::to_string)
        .collect();

    let fields = shape
        .fields()
        .iter()
        .map(|field| introspect(&unwrap_field(&field.schema)))
        .collect();

    let FlattenContext {
        fields: flattened,
        collisions,
        has_nested,
        max_depth,
    } = context;

    let required = flattened
        .iter()
        .filter(|f| !f.optional)
        .map(|f| f.flat_key.clone())
        .collect();

    Ok(SchemaAnalysis {
        fields,
        flattened,
        required,
        has_nested,
        max_depth,
        collisions,
        is_valid: errors.is_empty(),
        warnings,
        errors,
    })
}

/// Validates structural invariants of a shape: non-empty field names,
/// no duplicate names at one level, wrapper chains within the unwrap bound.
pub fn validate_shape(shape: &Shape) -> Vec<ShapeError> {
    let mut errors = Vec::new();
    let mut path = Vec::new();
    validate_level(shape, &mut path, &mut errors);
    errors
}

fn validate_level(shape: &Shape, path: &mut Vec<String>, errors: &mut Vec<ShapeError>) {
    let mut seen: Vec<&str> = Vec::new();

    for field in shape.fields() {
        let name = field.name.trim();
        if name.is_empty() {
            errors.push(ShapeError::EmptyFieldName(join_path(path, "<empty>")));
            continue;
        }
        if seen.contains(&name) {
            errors.push(ShapeError::DuplicateField(join_path(path, name)));
        } else {
            seen.push(name);
        }

        if wrapper_depth(&field.schema) > MAX_UNWRAP_DEPTH {
            errors.push(ShapeError::WrapperDepthExceeded(join_path(path, name)));
        }

        if let FieldKind::Object(inner) = &unwrap_field(&field.schema).schema.kind {
            path.push(name.to_string());
            validate_level(inner, path, errors);
            path.pop();
        }
    }
}

fn wrapper_depth(schema: &FieldSchema) -> usize {
    let mut depth = 0;
    let mut current = schema;
    loop {
        current = match &current.kind {
            FieldKind::Optional(inner)
            | FieldKind::Nullable(inner)
            | FieldKind::Default(inner, _)
            | FieldKind::Catch(inner, _) => {
                depth += 1;
                inner
            }
            _ => return depth,
        };
    }
}

fn join_path(path: &[String], name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{name}", path.join("."))
    }
}

#[cfg(test)]
mod tests {
    use crate::shape::FieldSchema;
    use crate::unwrap::MAX_UNWRAP_DEPTH;

    use super::*;

    fn nested_shape() -> Shape {
        Shape::new()
            .with_field(
                "config",
                FieldSchema::object(
                    Shape::new()
                        .with_field("timeout", FieldSchema::number())
                        .with_field("retries", FieldSchema::number().optional()),
                ),
            )
            .with_field("name", FieldSchema::string())
    }

    #[test]
    fn test_analyze_collects_required_flat_keys() {
        let analysis = analyze(&nested_shape(), &AnalyzeOptions::default()).unwrap();
        assert_eq!(
            analysis.required,
            vec!["config-timeout".to_string(), "name".to_string()]
        );
        assert!(analysis.has_nested);
        assert_eq!(analysis.max_depth, 3);
        assert_eq!(analysis.fields.len(), 2);
        assert!(analysis.is_valid);
        assert!(analysis.warnings.is_empty());
    }

    #[test]
    fn test_strict_mode_raises_on_collision() {
        let shape = Shape::new()
            .with_field(
                "foo",
                FieldSchema::object(Shape::new().with_field("bar", FieldSchema::string())),
            )
            .with_field("foo-bar", FieldSchema::number());

        let err = analyze(
            &shape,
            &AnalyzeOptions {
                strict: true,
                ..AnalyzeOptions::default()
            },
        )
        .unwrap_err();
        assert!(err.report.contains("foo-bar"));
    }

    #[test]
    fn test_non_strict_mode_reports_collision_as_warning() {
        let shape = Shape::new()
            .with_field(
                "foo",
                FieldSchema::object(Shape::new().with_field("bar", FieldSchema::string())),
            )
            .with_field("foo-bar", FieldSchema::number());

        let analysis = analyze(&shape, &AnalyzeOptions::default()).unwrap();
        assert_eq!(analysis.warnings.len(), 1);
        assert!(analysis.warnings[0].contains("foo-bar"));
        // Collisions alone do not invalidate an analysis.
        assert!(analysis.is_valid);
        assert_eq!(analysis.collisions.len(), 1);
    }

    #[test]
    fn test_validate_rejects_duplicate_fields() {
        let shape = Shape::new()
            .with_field("x", FieldSchema::string())
            .with_field("x", FieldSchema::number());

        let errors = validate_shape(&shape);
        assert_eq!(errors, vec![ShapeError::DuplicateField("x".to_string())]);

        let analysis = analyze(&shape, &AnalyzeOptions::default()).unwrap();
        assert!(!analysis.is_valid);
        assert_eq!(analysis.errors.len(), 1);
    }

    #[test]
    fn test_validate_rejects_empty_names_with_path() {
        let shape = Shape::new().with_field(
            "outer",
            FieldSchema::object(Shape::new().with_field("  ", FieldSchema::string())),
        );

        let errors = validate_shape(&shape);
        assert_eq!(
            errors,
            vec![ShapeError::EmptyFieldName("outer.<empty>".to_string())]
        );
    }

    #[test]
    fn test_validate_flags_overdeep_wrapper_chain() {
        let mut field = FieldSchema::string();
        for _ in 0..(MAX_UNWRAP_DEPTH + 1) {
            field = field.optional();
        }
        let shape = Shape::new().with_field("deep", field);

        let errors = validate_shape(&shape);
        assert_eq!(
            errors,
            vec![ShapeError::WrapperDepthExceeded("deep".to_string())]
        );
    }

    #[test]
    fn test_duplicate_names_allowed_across_levels() {
        let shape = Shape::new()
            .with_field(
                "a",
                FieldSchema::object(Shape::new().with_field("name", FieldSchema::string())),
            )
            .with_field("name", FieldSchema::string());

        assert!(validate_shape(&shape).is_empty());
    }
}
