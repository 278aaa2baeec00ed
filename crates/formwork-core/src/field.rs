#![forbid(unsafe_code)]

//! Field metadata and element handles.
//!
//! [`FieldMeta`] is the per-field mutable record owned by the store's
//! registry. Bindings mutate it in place (mount flag, element handle)
//! through the store; they never copy it or hold onto it past a call.
//!
//! [`ElementHandle`] is the capability object a binding installs so the
//! store's imperative focus management (focus the first invalid field,
//! surface a native validity message) can reach one concrete control
//! without depending on how it is rendered.

use std::fmt;
use std::rc::Rc;

use crate::rules::Rules;

/// Path identifying one bound value within the store's nested value tree.
pub type FieldName = String;

/// Operations a live UI control exposes to the form layer.
///
/// `can_focus` doubles as the readiness probe: a handle is only installed
/// for elements that report it, mirroring how half-constructed controls
/// simply don't get one.
pub trait ControlElement {
    /// Whether the element is ready to receive focus.
    fn can_focus(&self) -> bool {
        true
    }

    /// Move input focus to the element.
    fn focus(&self);

    /// Set a custom validity message on the element (empty clears it).
    fn set_custom_validity(&self, message: &str);

    /// Trigger the element's native validity reporting UI.
    fn report_validity(&self) -> bool;
}

/// Shared capability handle to a [`ControlElement`], stored in [`FieldMeta`].
#[derive(Clone)]
pub struct ElementHandle {
    element: Rc<dyn ControlElement>,
}

impl ElementHandle {
    /// Wrap an element in a handle.
    #[must_use]
    pub fn new(element: Rc<dyn ControlElement>) -> Self {
        Self { element }
    }

    /// Focus the underlying element.
    pub fn focus(&self) {
        self.element.focus();
    }

    /// Set a custom validity message on the underlying element.
    pub fn set_custom_validity(&self, message: &str) {
        self.element.set_custom_validity(message);
    }

    /// Report validity through the underlying element.
    pub fn report_validity(&self) -> bool {
        self.element.report_validity()
    }
}

impl fmt::Debug for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementHandle").finish_non_exhaustive()
    }
}

/// Per-field mutable record owned by the store's registry.
#[derive(Debug, Default)]
pub struct FieldMeta {
    /// The field's name (registry key, duplicated here for diagnostics).
    pub name: FieldName,
    /// Whether a binding is currently mounted for this field.
    pub mount: bool,
    /// Validation configuration supplied at registration.
    pub rules: Rules,
    /// Capability handle to the live control, once one attached.
    pub handle: Option<ElementHandle>,
}

impl FieldMeta {
    /// Fresh, unmounted metadata for `name`.
    #[must_use]
    pub fn new(name: impl Into<FieldName>, rules: Rules) -> Self {
        Self {
            name: name.into(),
            mount: false,
            rules,
            handle: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakeElement {
        focusable: bool,
        focused: Rc<Cell<bool>>,
    }

    impl ControlElement for FakeElement {
        fn can_focus(&self) -> bool {
            self.focusable
        }

        fn focus(&self) {
            self.focused.set(true);
        }

        fn set_custom_validity(&self, _message: &str) {}

        fn report_validity(&self) -> bool {
            true
        }
    }

    #[test]
    fn handle_delegates_focus() {
        let focused = Rc::new(Cell::new(false));
        let handle = ElementHandle::new(Rc::new(FakeElement {
            focusable: true,
            focused: Rc::clone(&focused),
        }));
        handle.focus();
        assert!(focused.get());
    }

    #[test]
    fn meta_starts_unmounted_without_handle() {
        let meta = FieldMeta::new("email", Rules::default());
        assert_eq!(meta.name, "email");
        assert!(!meta.mount);
        assert!(meta.handle.is_none());
    }
}
