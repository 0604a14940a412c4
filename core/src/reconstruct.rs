//! Nested value reconstruction from flat key/value maps.
//!
//! Inverse of the flattener at the value level: each flat key is split on
//! the separator and the segments are walked to rebuild a nested object
//! tree, creating intermediate containers on demand.
//!
//! Known limitation, preserved by design: splitting is blind to the
//! declared shape, so a field whose name legitimately contains the
//! separator is indistinguishable from a nested path. Keys like that show
//! up as collisions during flattening; here, last-write-wins applies.

use serde_json::{Map, Value};

/// Rebuilds a nested object tree from ordered `(flat key, value)` pairs.
///
/// Later entries overwrite earlier ones at the same path (last-key-wins),
/// and a nested key merges into an existing container rather than replacing
/// it. Compound values are assigned as-is, never re-split; nulls are
/// preserved verbatim. An empty separator treats each key as one segment.
///
/// # Examples
///
/// ```
/// use flatarg_core::reconstruct;
/// use serde_json::json;
///
/// let tree = reconstruct(
///     [
///         ("config-timeout".to_string(), json!(30)),
///         ("config-retries".to_string(), json!(3)),
///         ("name".to_string(), json!("svc")),
///     ],
///     "-",
/// );
/// assert_eq!(tree, json!({"config": {"timeout": 30, "retries": 3}, "name": "svc"}));
/// ```
pub fn reconstruct<I>(entries: I, separator: &str) -> Value
where
    I: IntoIterator<Item = (String, Value)>,
{
    let mut root = Map::new();
    for (key, value) in entries {
        let segments: Vec<&str> = if separator.is_empty() {
            vec![key.as_str()]
        } else {
            key.split(separator).collect()
        };
        insert_path(&mut root, &segments, value);
    }
    Value::Object(root)
}

/// Convenience wrapper over a [`serde_json::Map`], using its iteration
/// order for last-write-wins.
pub fn reconstruct_map(flat: &Map<String, Value>, separator: &str) -> Value {
    reconstruct(
        flat.iter().map(|(k, v)| (k.clone(), v.clone())),
        separator,
    )
}

fn insert_path(root: &mut Map<String, Value>, segments: &[&str], value: Value) {
    let Some((last, intermediate)) = segments.split_last() else {
        return;
    };

    let mut current = root;
    for segment in intermediate {
        let entry = current
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        // A non-container in the way is replaced by a fresh container.
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(map) => map,
            _ => unreachable!("entry was just made an object"),
        };
    }
    current.insert((*last).to_string(), value);
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_flat_keys_stay_flat() {
        let tree = reconstruct(
            [("a".to_string(), json!(1)), ("b".to_string(), json!(2))],
            "-",
        );
        assert_eq!(tree, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_last_write_wins_merges_into_container() {
        let tree = reconstruct(
            [
                ("a".to_string(), json!({"b": 1})),
                ("a-b".to_string(), json!(2)),
            ],
            "-",
        );
        assert_eq!(tree, json!({"a": {"b": 2}}));
    }

    #[test]
    fn test_non_container_intermediate_is_replaced() {
        let tree = reconstruct(
            [
                ("a".to_string(), json!("scalar")),
                ("a-b".to_string(), json!(2)),
            ],
            "-",
        );
        assert_eq!(tree, json!({"a": {"b": 2}}));
    }

    #[test]
    fn test_compound_values_are_not_resplit() {
        let tree = reconstruct(
            [("list".to_string(), json!(["x-y", "z"]))],
            "-",
        );
        assert_eq!(tree, json!({"list": ["x-y", "z"]}));
    }

    #[test]
    fn test_null_values_are_preserved() {
        let tree = reconstruct([("a-b".to_string(), Value::Null)], "-");
        assert_eq!(tree, json!({"a": {"b": null}}));
    }

    #[test]
    fn test_empty_separator_keeps_keys_whole() {
        let tree = reconstruct([("a-b".to_string(), json!(1))], "");
        assert_eq!(tree, json!({"a-b": 1}));
    }

    #[test]
    fn test_round_trip_without_ambiguity() {
        // Values derived from a nested tree under non-colliding keys
        // rebuild the original tree field for field.
        let original = json!({
            "config": {"timeout": 30, "retries": 3, "db": {"host": "localhost"}},
            "name": "svc",
            "verbose": true,
        });
        let flat = [
            ("config-timeout".to_string(), json!(30)),
            ("config-retries".to_string(), json!(3)),
            ("config-db-host".to_string(), json!("localhost")),
            ("name".to_string(), json!("svc")),
            ("verbose".to_string(), json!(true)),
        ];

        assert_eq!(reconstruct(flat, "-"), original);
    }

    #[test]
    fn test_reconstruct_map_convenience() {
        let mut flat = Map::new();
        flat.insert("a-b".to_string(), json!(1));
        flat.insert("c".to_string(), json!("x"));

        assert_eq!(reconstruct_map(&flat, "-"), json!({"a": {"b": 1}, "c": "x"}));
    }

    #[test]
    fn test_custom_separator() {
        let tree = reconstruct([("a.b.c".to_string(), json!(9))], ".");
        assert_eq!(tree, json!({"a": {"b": {"c": 9}}}));
    }
}
