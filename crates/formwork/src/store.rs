#![forbid(unsafe_code)]

//! The store trait surface a binding consumes.
//!
//! A form store owns all field values, defaults, metadata and derived
//! state. Bindings reach it as `Rc<dyn FormStore>` and use only what is
//! declared here; everything else about a store (validation, submission,
//! persistence) is invisible to the binding layer.

use std::collections::HashSet;
use std::fmt;

use formwork_core::{FieldEvent, FieldMeta, FieldName, FormState, Rules, Value};

use crate::subject::Subject;

/// One published change: which field (or `None` for a bulk change) and the
/// full values tree after the change.
#[derive(Clone, Debug, PartialEq)]
pub struct ValuesSnapshot {
    /// Changed field, `None` when the whole tree changed.
    pub name: Option<FieldName>,
    /// The values tree after the change.
    pub values: Value,
}

impl ValuesSnapshot {
    /// Snapshot scoped to one field.
    #[must_use]
    pub fn for_field(name: impl Into<FieldName>, values: Value) -> Self {
        Self {
            name: Some(name.into()),
            values,
        }
    }

    /// Bulk snapshot: subscribers re-derive their value.
    #[must_use]
    pub fn bulk(values: Value) -> Self {
        Self { name: None, values }
    }
}

/// The pair of store-owned callbacks returned by [`FormStore::register`].
///
/// The binding forwards its synthetic change/blur events into these; what
/// the store does with them (validation, dirty tracking, publication) is
/// its own business.
pub struct FieldHandlers {
    /// Receives synthetic change events.
    pub on_change: Box<dyn Fn(FieldEvent)>,
    /// Receives synthetic blur events.
    pub on_blur: Box<dyn Fn(FieldEvent)>,
}

impl fmt::Debug for FieldHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldHandlers").finish_non_exhaustive()
    }
}

/// The narrow surface of a centralized form store.
///
/// All methods are synchronous; implementations are expected to use
/// interior mutability (the binding layer is single-threaded by design).
pub trait FormStore {
    /// Snapshot of the live values tree.
    fn values(&self) -> Value;

    /// Snapshot of the default values tree.
    fn default_values(&self) -> Value;

    /// Register (or idempotently re-register) a field, returning the
    /// store's event handlers for it. `initial` carries the binding's
    /// resolved initial value.
    fn register(&self, name: &str, rules: Rules, initial: Option<Value>) -> FieldHandlers;

    /// Remove a field's registration and state.
    fn unregister(&self, name: &str);

    /// The channel on which values snapshots are published.
    fn changes(&self) -> Subject<ValuesSnapshot>;

    /// Mutate a field's metadata in place. Returns `false` (and does not
    /// call `f`) when no metadata exists for `name`.
    fn with_field_mut(&self, name: &str, f: &mut dyn FnMut(&mut FieldMeta)) -> bool;

    /// Names currently organized as repeatable (array) groups.
    fn array_names(&self) -> HashSet<FieldName>;

    /// Store-level default for the unregister-on-unmount policy.
    fn unregister_on_unmount(&self) -> bool;

    /// Whether an array mutation (add/remove/move) is currently in flight.
    fn array_action_in_flight(&self) -> bool;

    /// Aggregated form state (errors, dirty, touched, whole-form flags).
    fn state(&self) -> FormState;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snapshot_constructors() {
        let scoped = ValuesSnapshot::for_field("a", json!({"a": 1}));
        assert_eq!(scoped.name.as_deref(), Some("a"));

        let bulk = ValuesSnapshot::bulk(json!({}));
        assert_eq!(bulk.name, None);
    }
}
