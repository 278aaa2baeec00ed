#![forbid(unsafe_code)]

//! The field binding: one control's live synchronization contract.
//!
//! A [`FieldBinding`] bridges three independent lifecycles (the UI
//! control's mount/unmount, the store's asynchronous update stream, and
//! the field's membership in a repeatable group) without losing or
//! duplicating state.
//!
//! # Invariants
//!
//! 1. **Initial value precedence**: live store value, else stored default,
//!    else caller default, else `Value::Null`; resolved exactly once at
//!    bind time. Later drift of the defaults tree is not observed.
//! 2. **Snapshot filtering**: a snapshot overwrites the local value iff it
//!    is a bulk snapshot or names the binding's *current* field. The name
//!    is read from a live cell at delivery time, never captured at
//!    subscription time, because [`rebind`](FieldBinding::rebind) can move
//!    the binding to a new name without recreating it.
//! 3. **Optimistic-then-authoritative**: `on_change` updates the local
//!    value synchronously before forwarding to the store; the next
//!    matching snapshot overwrites it if the store disagrees.
//! 4. **Clean teardown**: dropping the binding unsubscribes before the
//!    unmount disposition runs; no notification is processed past
//!    deactivation.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | No metadata for the field | Mount-flag and handle writes are no-ops |
//! | Unrecognized change payload | Passed through as the stored value |
//! | Element not focus-ready | Handle is left unset |

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use formwork_core::{
    ChangePayload, ControlElement, ElementHandle, FieldEvent, FieldName,
    FieldState, FormState, Rules, Value, in_array_group, resolve,
};

use crate::policy::{Disposition, unmount_disposition};
use crate::store::{FieldHandlers, FormStore, ValuesSnapshot};
use crate::subject::Subscription;

/// Per-binding configuration handed to [`FieldBinding::bind`].
#[derive(Clone, Debug, Default)]
pub struct BindingOptions {
    /// Field name to bind.
    pub name: FieldName,
    /// Validation configuration passed through to registration.
    pub rules: Rules,
    /// Caller-supplied fallback default, last in the precedence chain.
    pub default_value: Option<Value>,
    /// Per-binding override of the store's unregister-on-unmount default.
    pub should_unregister: bool,
}

impl BindingOptions {
    /// Options for `name` with no rules, no default and no override.
    #[must_use]
    pub fn new(name: impl Into<FieldName>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Attach validation rules.
    #[must_use]
    pub fn rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    /// Set the caller-supplied fallback default.
    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Force unregistration on unmount for this binding regardless of the
    /// store-level default.
    #[must_use]
    pub fn unregister_on_unmount(mut self) -> Self {
        self.should_unregister = true;
        self
    }
}

/// Live binding between one field and a shared form store.
///
/// Created with [`bind`](Self::bind); unmounts on drop. At most one binding
/// is mounted per (store, field name) pair at a time; the store's registry
/// guarantees that by construction.
pub struct FieldBinding {
    store: Rc<dyn FormStore>,
    /// Tracked field name. Shared with the subscription callback, which
    /// must always compare against the latest name, not a captured one.
    name: Rc<RefCell<FieldName>>,
    /// Last-known local value; optimistically updated by `on_change`,
    /// confirmed or overwritten by matching snapshots.
    value: Rc<RefCell<Value>>,
    handlers: FieldHandlers,
    rules: Rules,
    should_unregister: bool,
    subscription: Option<Subscription>,
}

impl FieldBinding {
    /// Bind a field: resolve its initial value, register it with the
    /// store, subscribe to the change channel and mark it mounted.
    #[must_use]
    pub fn bind(store: Rc<dyn FormStore>, options: BindingOptions) -> Self {
        let BindingOptions {
            name,
            rules,
            default_value,
            should_unregister,
        } = options;

        let initial = resolve_initial(store.as_ref(), &name, default_value);
        let name_cell = Rc::new(RefCell::new(name.clone()));
        let value_cell = Rc::new(RefCell::new(initial.clone()));

        let handlers = store.register(&name, rules.clone(), Some(initial));
        let subscription = subscribe(&store, &name_cell, &value_cell);

        let binding = Self {
            store,
            name: name_cell,
            value: value_cell,
            handlers,
            rules,
            should_unregister,
            subscription: Some(subscription),
        };
        binding.set_mounted(true);
        trace!(field = %name, "field bound");
        binding
    }

    /// The currently tracked field name.
    #[must_use]
    pub fn name(&self) -> FieldName {
        self.name.borrow().clone()
    }

    /// The last-known local value.
    #[must_use]
    pub fn value(&self) -> Value {
        self.value.borrow().clone()
    }

    /// Translate a raw UI change notification into the canonical value,
    /// update the local value, and forward a synthetic change event to the
    /// store's registered handler.
    ///
    /// The local update is synchronous, so the rendered control reflects
    /// the new value before the store's validation pass completes.
    pub fn on_change(&self, payload: impl Into<ChangePayload>) {
        let value = payload.into().normalize();
        *self.value.borrow_mut() = value.clone();
        (self.handlers.on_change)(FieldEvent::change(self.name(), value));
    }

    /// Forward a synthetic blur event carrying the current local value.
    /// The local value is not mutated.
    pub fn on_blur(&self) {
        (self.handlers.on_blur)(FieldEvent::blur(self.name(), self.value()));
    }

    /// Install a capability handle for the live control into the field's
    /// metadata, if the control reports focus-readiness. Missing metadata
    /// is a no-op.
    pub fn attach_element(&self, element: Rc<dyn ControlElement>) {
        if !element.can_focus() {
            return;
        }
        let handle = ElementHandle::new(element);
        let name = self.name();
        self.store.with_field_mut(&name, &mut |meta| {
            meta.handle = Some(handle.clone());
        });
    }

    /// The store's aggregated state snapshot.
    #[must_use]
    pub fn form_state(&self) -> FormState {
        self.store.state()
    }

    /// This field's derived view of the aggregates, recomputed on every
    /// call.
    #[must_use]
    pub fn field_state(&self) -> FieldState {
        FieldState::for_field(&self.store.state(), &self.name())
    }

    /// Move the binding to a new identity (name, rules or unregister
    /// override) without recreating it.
    ///
    /// The previous identity is torn down first (unsubscribe, then the
    /// unmount disposition for the old name), so no notification intended
    /// for it can be observed afterwards. A fresh registration,
    /// subscription and mount are then established under the new identity.
    pub fn rebind(&mut self, options: BindingOptions) {
        let old_name = self.name();
        self.subscription = None;
        self.run_unmount(&old_name);

        let BindingOptions {
            name,
            rules,
            default_value,
            should_unregister,
        } = options;
        trace!(from = %old_name, to = %name, "rebinding field");

        let value = if name == old_name {
            self.value()
        } else {
            resolve_initial(self.store.as_ref(), &name, default_value)
        };
        *self.name.borrow_mut() = name.clone();
        *self.value.borrow_mut() = value.clone();

        self.handlers = self.store.register(&name, rules.clone(), Some(value));
        self.rules = rules;
        self.should_unregister = should_unregister;
        self.subscription = Some(subscribe(&self.store, &self.name, &self.value));
        self.set_mounted(true);
    }

    /// Validation rules currently attached to the binding.
    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    fn set_mounted(&self, mounted: bool) {
        let name = self.name();
        self.store.with_field_mut(&name, &mut |meta| {
            meta.mount = mounted;
        });
    }

    fn run_unmount(&self, name: &str) {
        let should = self.store.unregister_on_unmount() || self.should_unregister;
        let in_group = in_array_group(&self.store.array_names(), name);
        let disposition =
            unmount_disposition(in_group, should, self.store.array_action_in_flight());
        match disposition {
            Disposition::Unregister => {
                debug!(field = %name, "unregistering on unmount");
                self.store.unregister(name);
            }
            Disposition::Preserve => {
                self.store.with_field_mut(name, &mut |meta| {
                    meta.mount = false;
                });
            }
        }
    }
}

impl Drop for FieldBinding {
    fn drop(&mut self) {
        // Unsubscribe before the disposition runs: nothing the store does
        // during unregistration may reach this binding's callback.
        self.subscription = None;
        let name = self.name();
        self.run_unmount(&name);
    }
}

impl std::fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldBinding")
            .field("name", &*self.name.borrow())
            .field("value", &*self.value.borrow())
            .field("should_unregister", &self.should_unregister)
            .finish_non_exhaustive()
    }
}

/// Precedence chain: live value, stored default, caller default, null.
fn resolve_initial(
    store: &dyn FormStore,
    name: &str,
    caller_default: Option<Value>,
) -> Value {
    resolve(&store.values(), name)
        .cloned()
        .or_else(|| resolve(&store.default_values(), name).cloned())
        .or(caller_default)
        .unwrap_or(Value::Null)
}

fn subscribe(
    store: &Rc<dyn FormStore>,
    name: &Rc<RefCell<FieldName>>,
    value: &Rc<RefCell<Value>>,
) -> Subscription {
    let name = Rc::clone(name);
    let value = Rc::clone(value);
    store.changes().subscribe(move |snapshot: &ValuesSnapshot| {
        let tracked = name.borrow().clone();
        let relevant = snapshot
            .name
            .as_deref()
            .is_none_or(|changed| changed == tracked);
        if relevant {
            trace!(field = %tracked, "accepting values snapshot");
            *value.borrow_mut() = resolve(&snapshot.values, &tracked)
                .cloned()
                .unwrap_or(Value::Null);
        }
    })
}
