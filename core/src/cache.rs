//! Identity-keyed memoization of shape analyses.
//!
//! Shapes are registered once and assigned a stable [`ShapeId`]; the cache
//! maps ids to their last computed [`SchemaAnalysis`]. There is no TTL and
//! no content-based invalidation — callers must not mutate a shape after
//! its first analysis, and must call [`AnalysisCache::invalidate`] (or
//! [`clear`](AnalysisCache::clear)) explicitly when a shape is replaced.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::analysis::{AnalyzeOptions, SchemaAnalysis, analyze};
use crate::collision::CollisionError;
use crate::shape::Shape;

static NEXT_SHAPE_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identifier assigned to a shape at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ShapeId(u64);

impl ShapeId {
    /// Issues a fresh, process-unique id.
    pub fn next() -> Self {
        Self(NEXT_SHAPE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Memo of analyses keyed by [`ShapeId`].
///
/// # Examples
///
/// ```
/// use flatarg_core::{AnalysisCache, AnalyzeOptions, FieldSchema, Shape, ShapeId};
///
/// let shape = Shape::new().with_field("name", FieldSchema::string());
/// let id = ShapeId::next();
///
/// let mut cache = AnalysisCache::new();
/// let analysis = cache
///     .get_or_analyze(id, &shape, &AnalyzeOptions::default())
///     .unwrap();
/// assert_eq!(analysis.required, vec!["name".to_string()]);
/// assert!(cache.get(id).is_some());
/// ```
#[derive(Debug, Default)]
pub struct AnalysisCache {
    entries: HashMap<ShapeId, SchemaAnalysis>,
}

impl AnalysisCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a cached analysis.
    pub fn get(&self, id: ShapeId) -> Option<&SchemaAnalysis> {
        self.entries.get(&id)
    }

    /// Returns the cached analysis for `id`, computing and storing it on
    /// first use. The options of the first analysis win until the entry is
    /// invalidated.
    pub fn get_or_analyze(
        &mut self,
        id: ShapeId,
        shape: &Shape,
        options: &AnalyzeOptions,
    ) -> Result<&SchemaAnalysis, CollisionError> {
        match self.entries.entry(id) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(analyze(shape, options)?)),
        }
    }

    /// Removes one entry, returning it if present.
    pub fn invalidate(&mut self, id: ShapeId) -> Option<SchemaAnalysis> {
        self.entries.remove(&id)
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached analyses.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
