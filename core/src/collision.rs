//! Flat-key collision tracking and reporting.
//!
//! Two distinct structural paths can produce the same flat key (the classic
//! case: a field literally named `foo-bar` next to a nested `foo.bar` under
//! separator `-`). The flattener records every such key here; callers either
//! surface the report as a warning or raise [`CollisionError`] in strict
//! mode. Collision presence never changes which field wins in the flattened
//! output — the last-processed field is always retained.

use serde::Serialize;
use thiserror::Error;

/// One colliding flat key with every dot-path that produced it, in
/// discovery order. The first producer's path is kept even though only the
/// last field wins in the output list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollisionEntry {
    /// The contested flat key.
    pub flat_key: String,
    /// Contributing dot-paths, `.`-joined regardless of separator.
    pub paths: Vec<String>,
}

/// Collision map for one flatten pass, insertion-ordered by first discovery.
///
/// Only keys with two or more distinct producers appear here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollisionRecord {
    entries: Vec<CollisionEntry>,
}

impl CollisionRecord {
    /// True when no collisions were found.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of colliding keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// All entries in discovery order.
    pub fn entries(&self) -> &[CollisionEntry] {
        &self.entries
    }

    /// Paths recorded for one flat key.
    pub fn get(&self, flat_key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.flat_key == flat_key)
            .map(|e| e.paths.as_slice())
    }

    /// Records that `path` produced `flat_key`, which `first_path` had
    /// already produced. Identical paths never collide with themselves.
    pub(crate) fn record(&mut self, flat_key: &str, first_path: &str, path: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.flat_key == flat_key) {
            if !entry.paths.iter().any(|p| p == path) {
                entry.paths.push(path.to_string());
            }
            return;
        }
        if first_path == path {
            return;
        }
        self.entries.push(CollisionEntry {
            flat_key: flat_key.to_string(),
            paths: vec![first_path.to_string(), path.to_string()],
        });
    }

    /// Formats the deterministic multi-line report: one line per colliding
    /// key, contributing paths comma-joined in discovery order.
    ///
    /// Paths use `.` regardless of the configured separator, so reports are
    /// stable across separator configuration.
    pub fn report(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&format!(
                "  {}: {}\n",
                entry.flat_key,
                entry.paths.join(", ")
            ));
        }
        out
    }
}

/// Raised in strict mode when a flatten pass produced collisions.
///
/// Carries the same report text non-strict callers receive as a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("flat key collisions detected:\n{report}")]
pub struct CollisionError {
    /// Full multi-line collision report.
    pub report: String,
}

impl CollisionError {
    /// Builds the error from a non-empty collision record.
    pub fn new(collisions: &CollisionRecord) -> Self {
        Self {
            report: collisions.report(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_seeds_with_first_path() {
        let mut record = CollisionRecord::default();
        record.record("foo-bar", "foo.bar", "foo-bar");

        assert_eq!(record.len(), 1);
        assert_eq!(
            record.get("foo-bar"),
            Some(&["foo.bar".to_string(), "foo-bar".to_string()][..])
        );
    }

    #[test]
    fn test_same_path_never_collides_with_itself() {
        let mut record = CollisionRecord::default();
        record.record("a", "a", "a");
        assert!(record.is_empty());
    }

    #[test]
    fn test_third_producer_appends() {
        let mut record = CollisionRecord::default();
        record.record("k", "a.k", "b.k");
        record.record("k", "a.k", "c.k");

        assert_eq!(
            record.get("k"),
            Some(&["a.k".to_string(), "b.k".to_string(), "c.k".to_string()][..])
        );
    }

    #[test]
    fn test_duplicate_producer_not_repeated() {
        let mut record = CollisionRecord::default();
        record.record("k", "a.k", "b.k");
        record.record("k", "a.k", "b.k");

        assert_eq!(record.get("k").map(<[String]>::len), Some(2));
    }

    #[test]
    fn test_report_format() {
        let mut record = CollisionRecord::default();
        record.record("foo-bar", "foo.bar", "foo-bar");
        record.record("x", "a.x", "b.x");

        assert_eq!(record.report(), "  foo-bar: foo.bar, foo-bar\n  x: a.x, b.x\n");
    }

    #[test]
    fn test_error_carries_report() {
        let mut record = CollisionRecord::default();
        record.record("k", "a.k", "b.k");

        let err = CollisionError::new(&record);
        assert!(err.to_string().contains("  k: a.k, b.k"));
    }
}
