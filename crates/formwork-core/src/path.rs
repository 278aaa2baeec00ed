#![forbid(unsafe_code)]

//! Dotted/indexed path access into nested [`Value`] trees.
//!
//! A path is a `.`-separated list of segments: `"user.addresses.0.street"`.
//! Segments made entirely of ASCII digits index into arrays; every other
//! segment keys into objects. Objects may also carry numeric string keys, in
//! which case the segment is looked up as a key.
//!
//! # Invariants
//!
//! 1. **Leniency**: malformed paths never panic. An empty path, an empty
//!    segment, an out-of-range index or a scalar in the middle of the walk
//!    all resolve to `None`.
//!
//! 2. **`set_at` creates what it needs**: missing intermediates are created
//!    as arrays when the next segment is numeric and objects otherwise. An
//!    incompatible intermediate (a scalar where a container is needed) is
//!    replaced.
//!
//! 3. **Round trip**: after `set_at(tree, p, v)`, `resolve(tree, p)` yields
//!    `Some(&v)` for any non-empty `p`.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Empty path | `resolve` → `None`; `set_at`/`remove_at` are no-ops |
//! | Index out of range | `resolve`/`remove_at` → `None`; `set_at` pads with `null` |
//! | Scalar mid-walk | `resolve`/`remove_at` → `None`; `set_at` replaces it |

use serde_json::{Map, Value};

/// Parse a segment as an array index: all ASCII digits, nothing else.
fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Resolve `path` inside `tree`, returning the value at that location.
///
/// Returns `None` when any segment is missing. A stored JSON `null` is a
/// present value and resolves to `Some(&Value::Null)`.
#[must_use]
pub fn resolve<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    let mut node = tree;
    for segment in path.split('.') {
        node = match node {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(parse_index(segment)?)?,
            _ => return None,
        };
    }
    Some(node)
}

/// Write `value` at `path` inside `tree`, creating intermediate containers.
///
/// An empty path is a no-op.
pub fn set_at(tree: &mut Value, path: &str, value: Value) {
    if path.is_empty() {
        return;
    }
    let segments: Vec<&str> = path.split('.').collect();
    set_segments(tree, &segments, value);
}

fn set_segments(node: &mut Value, segments: &[&str], value: Value) {
    let (head, rest) = match segments.split_first() {
        Some(split) => split,
        None => {
            *node = value;
            return;
        }
    };
    match parse_index(head) {
        Some(index) => {
            if !node.is_array() {
                *node = Value::Array(Vec::new());
            }
            let items = node.as_array_mut().expect("just ensured array");
            while items.len() <= index {
                items.push(Value::Null);
            }
            set_segments(&mut items[index], rest, value);
        }
        None => {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            let map = node.as_object_mut().expect("just ensured object");
            let child = map.entry((*head).to_owned()).or_insert(Value::Null);
            set_segments(child, rest, value);
        }
    }
}

/// Remove and return the value at `path`, if present.
///
/// Removing an array element shifts the remaining elements down. Missing
/// paths return `None` and leave the tree untouched.
pub fn remove_at(tree: &mut Value, path: &str) -> Option<Value> {
    if path.is_empty() {
        return None;
    }
    let (parent_path, leaf) = match path.rsplit_once('.') {
        Some((parent, leaf)) => (Some(parent), leaf),
        None => (None, path),
    };
    let parent = match parent_path {
        Some(p) => resolve_mut(tree, p)?,
        None => tree,
    };
    match parent {
        Value::Object(map) => map.remove(leaf),
        Value::Array(items) => {
            let index = parse_index(leaf)?;
            if index < items.len() {
                Some(items.remove(index))
            } else {
                None
            }
        }
        _ => None,
    }
}

fn resolve_mut<'a>(tree: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    let mut node = tree;
    for segment in path.split('.') {
        node = match node {
            Value::Object(map) => map.get_mut(segment)?,
            Value::Array(items) => items.get_mut(parse_index(segment)?)?,
            _ => return None,
        };
    }
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ── resolve ─────────────────────────────────────────────────────

    #[test]
    fn resolve_object_key() {
        let tree = json!({"a": {"b": 1}});
        assert_eq!(resolve(&tree, "a.b"), Some(&json!(1)));
    }

    #[test]
    fn resolve_array_index() {
        let tree = json!({"items": [{"id": 7}, {"id": 8}]});
        assert_eq!(resolve(&tree, "items.1.id"), Some(&json!(8)));
    }

    #[test]
    fn resolve_numeric_object_key() {
        let tree = json!({"0": "zero"});
        assert_eq!(resolve(&tree, "0"), Some(&json!("zero")));
    }

    #[test]
    fn resolve_null_is_present() {
        let tree = json!({"a": null});
        assert_eq!(resolve(&tree, "a"), Some(&Value::Null));
    }

    #[test]
    fn resolve_missing_returns_none() {
        let tree = json!({"a": {"b": 1}});
        assert_eq!(resolve(&tree, "a.c"), None);
        assert_eq!(resolve(&tree, "a.b.c"), None);
        assert_eq!(resolve(&tree, ""), None);
    }

    #[test]
    fn resolve_out_of_range_index() {
        let tree = json!({"items": [1]});
        assert_eq!(resolve(&tree, "items.4"), None);
    }

    #[test]
    fn resolve_non_numeric_segment_into_array() {
        let tree = json!({"items": [1, 2]});
        assert_eq!(resolve(&tree, "items.first"), None);
    }

    // ── set_at ──────────────────────────────────────────────────────

    #[test]
    fn set_at_creates_objects() {
        let mut tree = json!({});
        set_at(&mut tree, "user.name", json!("ada"));
        assert_eq!(tree, json!({"user": {"name": "ada"}}));
    }

    #[test]
    fn set_at_creates_arrays_for_numeric_segments() {
        let mut tree = json!({});
        set_at(&mut tree, "rows.2.label", json!("third"));
        assert_eq!(tree, json!({"rows": [null, null, {"label": "third"}]}));
    }

    #[test]
    fn set_at_replaces_incompatible_intermediate() {
        let mut tree = json!({"a": 1});
        set_at(&mut tree, "a.b", json!(true));
        assert_eq!(tree, json!({"a": {"b": true}}));
    }

    #[test]
    fn set_at_overwrites_leaf() {
        let mut tree = json!({"a": {"b": 1}});
        set_at(&mut tree, "a.b", json!(2));
        assert_eq!(tree, json!({"a": {"b": 2}}));
    }

    #[test]
    fn set_at_empty_path_is_noop() {
        let mut tree = json!({"a": 1});
        set_at(&mut tree, "", json!(2));
        assert_eq!(tree, json!({"a": 1}));
    }

    // ── remove_at ───────────────────────────────────────────────────

    #[test]
    fn remove_at_object_leaf() {
        let mut tree = json!({"a": {"b": 1, "c": 2}});
        assert_eq!(remove_at(&mut tree, "a.b"), Some(json!(1)));
        assert_eq!(tree, json!({"a": {"c": 2}}));
    }

    #[test]
    fn remove_at_array_element_shifts() {
        let mut tree = json!({"items": [1, 2, 3]});
        assert_eq!(remove_at(&mut tree, "items.1"), Some(json!(2)));
        assert_eq!(tree, json!({"items": [1, 3]}));
    }

    #[test]
    fn remove_at_missing_is_none() {
        let mut tree = json!({"a": 1});
        assert_eq!(remove_at(&mut tree, "b"), None);
        assert_eq!(remove_at(&mut tree, "a.b"), None);
        assert_eq!(tree, json!({"a": 1}));
    }

    // ── properties ──────────────────────────────────────────────────

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn segment() -> impl Strategy<Value = String> {
            prop_oneof![
                "[a-z]{1,6}",
                (0usize..4).prop_map(|i| i.to_string()),
            ]
        }

        fn path() -> impl Strategy<Value = String> {
            proptest::collection::vec(segment(), 1..4).prop_map(|s| s.join("."))
        }

        proptest! {
            #[test]
            fn set_then_resolve_round_trips(p in path(), n in any::<i64>()) {
                let mut tree = json!({});
                set_at(&mut tree, &p, json!(n));
                prop_assert_eq!(resolve(&tree, &p), Some(&json!(n)));
            }

            #[test]
            fn resolve_never_panics(p in "[a-z0-9.]{0,20}") {
                let tree = json!({"a": [0, {"b": 1}], "c": null});
                let _ = resolve(&tree, &p);
            }
        }
    }
}
