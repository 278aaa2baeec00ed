#![forbid(unsafe_code)]

//! # Formwork
//!
//! Headless form-state bindings for single-threaded, event-driven UIs.
//!
//! A [`FieldBinding`] is the live synchronization contract between one
//! externally-rendered input control and a shared form store: it resolves
//! the field's initial value, subscribes to the store's change channel,
//! translates raw UI change/blur notifications into store events, tracks
//! the field's mounted state and decides on unmount whether the field's
//! state is purged or preserved.
//!
//! The store itself is an external collaborator reached through the
//! [`FormStore`] trait; `formwork-harness` ships an in-memory
//! implementation for tests.
//!
//! ```ignore
//! use std::rc::Rc;
//! use formwork::{BindingOptions, FieldBinding, FormStore, Rules};
//!
//! let store: Rc<dyn FormStore> = build_store();
//! let binding = FieldBinding::bind(
//!     Rc::clone(&store),
//!     BindingOptions::new("user.email").rules(Rules::new().required()),
//! );
//!
//! binding.on_change("ada@example.com");   // optimistic local update + store event
//! binding.on_blur();                      // touched
//! assert!(!binding.field_state().invalid);
//! // dropping the binding unmounts the field
//! ```

pub mod binding;
pub mod policy;
pub mod store;
pub mod subject;

pub use binding::{BindingOptions, FieldBinding};
pub use policy::{Disposition, unmount_disposition};
pub use store::{FieldHandlers, FormStore, ValuesSnapshot};
pub use subject::{Subject, Subscription};

// Re-exported primitives so downstream code can depend on `formwork` alone.
pub use formwork_core::{
    ChangePayload, ControlElement, ElementHandle, EventKind, EventTarget,
    FieldError, FieldEvent, FieldMeta, FieldName, FieldState, FormState,
    InputEvent, Rules, Value,
};
