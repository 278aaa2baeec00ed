#![forbid(unsafe_code)]

//! Aggregated form state and per-field derivations.
//!
//! The store owns the aggregates (error tree, dirty/touched trees,
//! whole-form flags); [`FieldState::for_field`] derives one field's view by
//! path lookup. Derivation happens on every read; nothing here is cached.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | No entry at the field's path | Flags are `false`, `error` is `None` |
//! | Error leaf not `{type, message}`-shaped | `invalid` is still `true`, `error` is `None` |

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::resolve;

/// One validation failure, as stored at a leaf of the error tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// Which rule failed (`"required"`, `"min"`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable message, possibly empty.
    #[serde(default)]
    pub message: String,
}

impl FieldError {
    /// Build an error for a failed rule.
    #[must_use]
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// Store-wide aggregate snapshot: everything a binding derives its
/// per-field view from, plus the whole-form flags.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    /// Error tree mirroring the value tree's shape; leaves are
    /// [`FieldError`]-shaped objects.
    pub errors: Value,
    /// Tree of `true` leaves for fields whose value diverged from default.
    pub dirty_fields: Value,
    /// Tree of `true` leaves for fields that received a blur.
    pub touched_fields: Value,
    /// Any field dirty.
    pub is_dirty: bool,
    /// No validation errors anywhere.
    pub is_valid: bool,
    /// Number of submit attempts.
    pub submit_count: u32,
}

/// One field's derived view of the aggregates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldState {
    /// An error exists at (or under) the field's path.
    pub invalid: bool,
    /// The field's value diverged from its default.
    pub is_dirty: bool,
    /// The field received a blur.
    pub is_touched: bool,
    /// The error leaf, when it decodes as a [`FieldError`].
    pub error: Option<FieldError>,
}

impl FieldState {
    /// Derive `name`'s view from a [`FormState`] snapshot.
    #[must_use]
    pub fn for_field(state: &FormState, name: &str) -> Self {
        let error_value = resolve(&state.errors, name);
        Self {
            invalid: error_value.is_some(),
            is_dirty: flag_at(&state.dirty_fields, name),
            is_touched: flag_at(&state.touched_fields, name),
            error: error_value
                .and_then(|v| serde_json::from_value(v.clone()).ok()),
        }
    }
}

fn flag_at(tree: &Value, path: &str) -> bool {
    resolve(tree, path).is_some_and(is_truthy)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        _ => true,
    }
}
