//! Recursive shape flattening.
//!
//! [`flatten`] walks a nested [`Shape`] depth-first and produces one flat
//! entry per leaf field. Nesting is encoded in the flat key by joining path
//! segments with a configurable separator, up to a maximum depth; object
//! fields at the depth boundary stay single JSON-blob leaves. Optionality
//! propagates downward from ancestor wrappers, and every flat key records
//! its structural provenance so collisions can be diagnosed.
//!
//! # Example
//!
//! ```
//! use flatarg_core::{FieldSchema, FlattenOptions, Shape, flatten};
//!
//! let shape = Shape::new()
//!     .with_field(
//!         "config",
//!         FieldSchema::object(
//!             Shape::new()
//!                 .with_field("timeout", FieldSchema::number())
//!                 .with_field("retries", FieldSchema::number()),
//!         ),
//!     )
//!     .with_field("name", FieldSchema::string());
//!
//! let context = flatten(&shape, &FlattenOptions::default());
//! let keys: Vec<&str> = context.fields.iter().map(|f| f.flat_key.as_str()).collect();
//! assert_eq!(keys, vec!["config-timeout", "config-retries", "name"]);
//! assert!(context.has_nested);
//! assert!(context.collisions.is_empty());
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::collision::CollisionRecord;
use crate::introspect::{FieldInfo, introspect};
use crate::shape::{FieldKind, FieldSchema, Shape};
use crate::unwrap::unwrap_field;

/// Options controlling a flatten pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenOptions {
    /// Separator joining flat key segments.
    pub separator: String,
    /// Maximum nesting depth. `0` means no recursion at all: every
    /// top-level object field becomes a JSON-blob leaf immediately.
    pub max_depth: usize,
    /// Prefix prepended to every flat key (one leading path segment).
    pub prefix: String,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            separator: "-".to_string(),
            max_depth: 3,
            prefix: String::new(),
        }
    }
}

/// One leaf field discovered during a flatten pass. Never mutated after
/// creation.
#[derive(Debug, Clone, Serialize)]
pub struct FlattenedField {
    /// Flat key: path segments joined by the configured separator.
    pub flat_key: String,
    /// Classified field info.
    pub info: FieldInfo,
    /// Nesting depth at which the leaf was found (0 for top level).
    pub depth: usize,
    /// Original nesting path joined by `.`, independent of the separator.
    pub dot_path: String,
    /// Logical OR of the field's own optionality and every ancestor
    /// shape's optionality.
    pub optional: bool,
    /// The unwrapped inner schema, consulted by the codec.
    #[serde(skip_serializing)]
    pub schema: FieldSchema,
}

/// Aggregate result of one flatten pass.
#[derive(Debug, Clone, Serialize)]
pub struct FlattenContext {
    /// Leaves in discovery order, one entry per flat key (last producer
    /// wins when paths collide).
    pub fields: Vec<FlattenedField>,
    /// Flat keys produced by two or more distinct structural paths.
    pub collisions: CollisionRecord,
    /// True if any field required descending into a child shape.
    pub has_nested: bool,
    /// The effective maximum depth used.
    pub max_depth: usize,
}

/// Flattens a nested shape into a flat namespace of keyed leaves.
///
/// Object fields are recursed into while `depth < max_depth`; anything
/// else — including object fields at the boundary — becomes a leaf. See the
/// module docs for an example, and [`FlattenContext`] for what is tracked.
pub fn flatten(shape: &Shape, options: &FlattenOptions) -> FlattenContext {
    let mut walker = Walker {
        fields: Vec::new(),
        by_key: HashMap::new(),
        first_paths: HashMap::new(),
        collisions: CollisionRecord::default(),
        has_nested: false,
    };
    walker.walk(shape, &options.prefix, &options.prefix, 0, false, options);

    FlattenContext {
        fields: walker.fields,
        collisions: walker.collisions,
        has_nested: walker.has_nested,
        max_depth: options.max_depth,
    }
}

/// Explicit accumulator threaded through the walk, so concurrent analyses
/// share no mutable state.
struct Walker {
    fields: Vec<FlattenedField>,
    by_key: HashMap<String, usize>,
    first_paths: HashMap<String, String>,
    collisions: CollisionRecord,
    has_nested: bool,
}

impl Walker {
    fn walk(
        &mut self,
        shape: &Shape,
        prefix: &str,
        dot_prefix: &str,
        depth: usize,
        ambient_optional: bool,
        options: &FlattenOptions,
    ) {
        for field in shape.fields() {
            let unwrapped = unwrap_field(&field.schema);
            let optional = ambient_optional || !unwrapped.required;
            let flat_key = join(prefix, &field.name, &options.separator);
            let dot_path = join(dot_prefix, &field.name, ".");

            if let FieldKind::Object(inner) = &unwrapped.schema.kind {
                if depth < options.max_depth {
                    self.has_nested = true;
                    self.walk(inner, &flat_key, &dot_path, depth + 1, optional, options);
                    continue;
                }
            }

            let info = introspect(&unwrapped);
            let schema = unwrapped.schema.clone();
            self.emit(FlattenedField {
                flat_key,
                info,
                depth,
                dot_path,
                optional,
                schema,
            });
        }
    }

    fn emit(&mut self, field: FlattenedField) {
        match self.by_key.get(&field.flat_key) {
            Some(&index) => {
                if let Some(first_path) = self.first_paths.get(&field.flat_key) {
                    self.collisions
                        .record(&field.flat_key, first_path, &field.dot_path);
                }
                // Last producer wins, at the original position.
                self.fields[index] = field;
            }
            None => {
                self.first_paths
                    .insert(field.flat_key.clone(), field.dot_path.clone());
                self.by_key.insert(field.flat_key.clone(), self.fields.len());
                self.fields.push(field);
            }
        }
    }
}

fn join(prefix: &str, segment: &str, separator: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}{separator}{segment}")
    }
}
