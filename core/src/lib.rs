//! Structural schema flattening and reconstruction.
//!
//! This crate takes an arbitrarily nested, typed description of input
//! fields (a [`Shape`] of primitive fields, nested shapes, and
//! value-wrapping modifiers) and produces a flat namespace of
//! command-line-style keys, each annotated with a primitive type, default,
//! requiredness, and parsing rule. It also performs the inverse —
//! rebuilding a nested value tree from a flat key/value map — and detects
//! when two different nesting paths flatten to the same key.
//!
//! # Main entry points
//!
//! - [`flatten`] — walk a shape into flat keyed leaves with collision
//!   provenance.
//! - [`analyze`] — flatten plus collision detection, requiredness
//!   extraction, and structural validation, memoizable via
//!   [`AnalysisCache`].
//! - [`synthesize_arguments`] — produce the final per-key argument
//!   descriptors, honoring caller overrides and the array encoding policy.
//! - [`reconstruct`] — rebuild a nested value tree from flat key/value
//!   pairs.
//!
//! # Example
//!
//! ```
//! use flatarg_core::{FieldSchema, FlattenOptions, Shape, flatten, reconstruct};
//! use serde_json::json;
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
//!
//! let tree = reconstruct(
//!     [
//!         ("config-timeout".to_string(), json!(30)),
//!         ("config-retries".to_string(), json!(3)),
//!         ("name".to_string(), json!("svc")),
//!     ],
//!     "-",
//! );
//! assert_eq!(tree, json!({"config": {"timeout": 30, "retries": 3}, "name": "svc"}));
//! ```
//!
//! # What this crate does not do
//!
//! Values are never validated against the shape (that belongs to the schema
//! library the shape was derived from), type coercion stops at the
//! documented per-type parse rules, and union or self-referential schemas
//! are not representable.

mod analysis;
mod cache;
mod codec;
mod collision;
mod def;
mod flatten;
mod introspect;
mod reconstruct;
mod shape;
mod synthesize;
mod unwrap;

pub use analysis::{AnalyzeOptions, SchemaAnalysis, ShapeError, analyze, validate_shape};
pub use cache::{AnalysisCache, ShapeId};
pub use codec::{ArrayPolicy, ParseError, ParseFn, ParseResult, ValueEncoding, decide};
pub use collision::{CollisionEntry, CollisionError, CollisionRecord};
pub use def::{FieldDef, ShapeDef};
pub use flatten::{FlattenContext, FlattenOptions, FlattenedField, flatten};
pub use introspect::{BaseType, FieldInfo, introspect};
pub use reconstruct::{reconstruct, reconstruct_map};
pub use shape::{DefaultFn, DefaultValue, Field, FieldKind, FieldSchema, Shape};
pub use synthesize::{
    ArgOverride, ArgType, GeneratedArgument, SynthesizeOptions, synthesize_arguments,
};
pub use unwrap::{MAX_UNWRAP_DEPTH, Unwrapped, unwrap_field};
