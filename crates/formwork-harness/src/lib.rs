#![forbid(unsafe_code)]

//! Test harness for Formwork: an in-memory [`FormStore`] with scriptable
//! knobs and call recording.
//!
//! [`TestStore`] implements the full store surface a [`formwork::FieldBinding`]
//! consumes. It applies registered change/blur handlers synchronously and
//! *silently*: snapshot publication is always an explicit test action
//! ([`TestStore::set_value`] / [`TestStore::set_values`]), so tests control
//! the exact interleaving of optimistic local updates and authoritative
//! store deliveries.
//!
//! ```ignore
//! use std::rc::Rc;
//! use formwork::{BindingOptions, FieldBinding, FormStore};
//! use formwork_harness::TestStore;
//! use serde_json::json;
//!
//! let store = TestStore::new();
//! let binding = FieldBinding::bind(
//!     Rc::new(store.clone()),
//!     BindingOptions::new("email"),
//! );
//!
//! binding.on_change("ada@example.com");          // handler applied, no snapshot
//! store.set_value("email", json!("confirmed"));  // authoritative delivery
//! assert_eq!(binding.value(), json!("confirmed"));
//! ```

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use ahash::AHashMap;
use serde_json::Value;

use formwork::{FieldHandlers, FormStore, Subject, ValuesSnapshot};
use formwork_core::{
    FieldError, FieldEvent, FieldMeta, FieldName, FormState, Rules, remove_at,
    resolve, set_at,
};

/// A recorded registry call, in arrival order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreCall {
    /// `register(name, ..)` was invoked.
    Register(FieldName),
    /// `unregister(name)` was invoked.
    Unregister(FieldName),
}

#[derive(Default)]
struct Inner {
    values: Value,
    default_values: Value,
    fields: AHashMap<FieldName, FieldMeta>,
    array_names: HashSet<FieldName>,
    unregister_default: bool,
    action_in_flight: bool,
    state: FormState,
    calls: Vec<StoreCall>,
    events: Vec<FieldEvent>,
}

/// In-memory form store for tests.
///
/// Cloning shares the underlying store: keep one clone for assertions and
/// hand another to the binding as `Rc<dyn FormStore>`.
#[derive(Clone, Default)]
pub struct TestStore {
    inner: Rc<RefCell<Inner>>,
    changes: Subject<ValuesSnapshot>,
}

impl TestStore {
    /// An empty store: no values, no defaults, preserve-on-unmount.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with a live values tree.
    #[must_use]
    pub fn with_values(values: Value) -> Self {
        let store = Self::new();
        store.inner.borrow_mut().values = values;
        store
    }

    // ── knobs ───────────────────────────────────────────────────────

    /// Replace the defaults tree.
    pub fn set_defaults(&self, defaults: Value) {
        self.inner.borrow_mut().default_values = defaults;
    }

    /// Write one field's value and publish a snapshot scoped to it.
    pub fn set_value(&self, name: &str, value: Value) {
        let values = {
            let mut inner = self.inner.borrow_mut();
            set_at(&mut inner.values, name, value);
            inner.values.clone()
        };
        self.changes.notify(&ValuesSnapshot::for_field(name, values));
    }

    /// Replace the whole values tree and publish a bulk snapshot.
    pub fn set_values(&self, values: Value) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.values = values.clone();
        }
        self.changes.notify(&ValuesSnapshot::bulk(values));
    }

    /// Declare which names are repeatable (array) groups.
    pub fn set_array_names<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<FieldName>,
    {
        self.inner.borrow_mut().array_names =
            names.into_iter().map(Into::into).collect();
    }

    /// Set the store-level unregister-on-unmount default.
    pub fn set_unregister_default(&self, value: bool) {
        self.inner.borrow_mut().unregister_default = value;
    }

    /// Mark an array mutation as in flight (or finished).
    pub fn set_action_in_flight(&self, value: bool) {
        self.inner.borrow_mut().action_in_flight = value;
    }

    /// Record a validation error for `name`.
    pub fn set_error(&self, name: &str, error: FieldError) {
        let mut inner = self.inner.borrow_mut();
        let leaf = serde_json::to_value(&error).expect("FieldError serializes");
        set_at(&mut inner.state.errors, name, leaf);
        inner.state.is_valid = false;
    }

    /// Mark `name` dirty in the aggregate.
    pub fn mark_dirty(&self, name: &str) {
        let mut inner = self.inner.borrow_mut();
        set_at(&mut inner.state.dirty_fields, name, Value::Bool(true));
        inner.state.is_dirty = true;
    }

    // ── inspectors ──────────────────────────────────────────────────

    /// The value currently stored at `name`.
    #[must_use]
    pub fn value_at(&self, name: &str) -> Option<Value> {
        resolve(&self.inner.borrow().values, name).cloned()
    }

    /// Whether a field is registered.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.inner.borrow().fields.contains_key(name)
    }

    /// A registered field's mount flag.
    #[must_use]
    pub fn is_mounted(&self, name: &str) -> Option<bool> {
        self.inner.borrow().fields.get(name).map(|meta| meta.mount)
    }

    /// Whether a registered field has an element handle installed.
    #[must_use]
    pub fn has_handle(&self, name: &str) -> bool {
        self.inner
            .borrow()
            .fields
            .get(name)
            .is_some_and(|meta| meta.handle.is_some())
    }

    /// Focus `name` through its installed handle, as the store's
    /// focus-first-invalid path would. Returns whether a handle was there.
    pub fn focus_field(&self, name: &str) -> bool {
        let handle = self
            .inner
            .borrow()
            .fields
            .get(name)
            .and_then(|meta| meta.handle.clone());
        match handle {
            Some(handle) => {
                handle.focus();
                true
            }
            None => false,
        }
    }

    /// Every registry call so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.inner.borrow().calls.clone()
    }

    /// How many times `name` was unregistered.
    #[must_use]
    pub fn unregister_count(&self, name: &str) -> usize {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter(|call| matches!(call, StoreCall::Unregister(n) if n == name))
            .count()
    }

    /// Every change/blur event received through registered handlers.
    #[must_use]
    pub fn events(&self) -> Vec<FieldEvent> {
        self.inner.borrow().events.clone()
    }

    /// The most recent handler event.
    #[must_use]
    pub fn last_event(&self) -> Option<FieldEvent> {
        self.inner.borrow().events.last().cloned()
    }
}

impl FormStore for TestStore {
    fn values(&self) -> Value {
        self.inner.borrow().values.clone()
    }

    fn default_values(&self) -> Value {
        self.inner.borrow().default_values.clone()
    }

    fn register(&self, name: &str, rules: Rules, initial: Option<Value>) -> FieldHandlers {
        {
            let mut inner = self.inner.borrow_mut();
            inner.calls.push(StoreCall::Register(name.to_owned()));
            match inner.fields.get_mut(name) {
                // idempotent re-register: update rules, keep mount/handle
                Some(meta) => meta.rules = rules,
                None => {
                    inner
                        .fields
                        .insert(name.to_owned(), FieldMeta::new(name, rules));
                }
            }
            if let Some(value) = initial {
                set_at(&mut inner.values, name, value);
            }
        }

        let change_inner = Rc::clone(&self.inner);
        let blur_inner = Rc::clone(&self.inner);
        FieldHandlers {
            on_change: Box::new(move |event: FieldEvent| {
                let mut inner = change_inner.borrow_mut();
                let name = event.target.name.clone();
                let value = event.target.value.clone();
                set_at(&mut inner.values, &name, value);
                set_at(&mut inner.state.dirty_fields, &name, Value::Bool(true));
                inner.state.is_dirty = true;
                inner.events.push(event);
            }),
            on_blur: Box::new(move |event: FieldEvent| {
                let mut inner = blur_inner.borrow_mut();
                let name = event.target.name.clone();
                set_at(&mut inner.state.touched_fields, &name, Value::Bool(true));
                inner.events.push(event);
            }),
        }
    }

    fn unregister(&self, name: &str) {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(StoreCall::Unregister(name.to_owned()));
        inner.fields.remove(name);
        remove_at(&mut inner.values, name);
    }

    fn changes(&self) -> Subject<ValuesSnapshot> {
        self.changes.clone()
    }

    fn with_field_mut(&self, name: &str, f: &mut dyn FnMut(&mut FieldMeta)) -> bool {
        match self.inner.borrow_mut().fields.get_mut(name) {
            Some(meta) => {
                f(meta);
                true
            }
            None => false,
        }
    }

    fn array_names(&self) -> HashSet<FieldName> {
        self.inner.borrow().array_names.clone()
    }

    fn unregister_on_unmount(&self) -> bool {
        self.inner.borrow().unregister_default
    }

    fn array_action_in_flight(&self) -> bool {
        self.inner.borrow().action_in_flight
    }

    fn state(&self) -> FormState {
        self.inner.borrow().state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn register_inserts_then_updates() {
        let store = TestStore::new();
        let _handlers = store.register("email", Rules::new(), Some(json!("a")));
        assert!(store.has_field("email"));
        assert_eq!(store.value_at("email"), Some(json!("a")));

        // re-register keeps the meta entry, one per name
        let _handlers = store.register("email", Rules::new().required(), None);
        assert_eq!(store.inner.borrow().fields.len(), 1);
    }

    #[test]
    fn change_handler_applies_silently() {
        let store = TestStore::new();
        let handlers = store.register("email", Rules::new(), None);
        (handlers.on_change)(FieldEvent::change("email", json!("x")));

        assert_eq!(store.value_at("email"), Some(json!("x")));
        assert_eq!(store.events().len(), 1);
        assert!(store.state().is_dirty);
    }

    #[test]
    fn blur_handler_marks_touched() {
        let store = TestStore::new();
        let handlers = store.register("email", Rules::new(), None);
        (handlers.on_blur)(FieldEvent::blur("email", json!("x")));

        let state = store.state();
        assert_eq!(resolve(&state.touched_fields, "email"), Some(&json!(true)));
    }

    #[test]
    fn unregister_removes_field_and_value() {
        let store = TestStore::new();
        let _handlers = store.register("email", Rules::new(), Some(json!("a")));
        store.unregister("email");

        assert!(!store.has_field("email"));
        assert_eq!(store.value_at("email"), None);
        assert_eq!(store.unregister_count("email"), 1);
    }

    #[test]
    fn set_value_publishes_scoped_snapshot() {
        let store = TestStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = store
            .changes()
            .subscribe(move |snap: &ValuesSnapshot| sink.borrow_mut().push(snap.clone()));

        store.set_value("a.b", json!(1));
        let snaps = seen.borrow();
        assert_eq!(snaps.len(), 1);
        assert_eq!(snaps[0].name.as_deref(), Some("a.b"));
        assert_eq!(resolve(&snaps[0].values, "a.b"), Some(&json!(1)));
    }
}
