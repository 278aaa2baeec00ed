#![forbid(unsafe_code)]

//! Core primitives for Formwork.
//!
//! This crate holds the passive building blocks the reactive layer
//! (`formwork`) composes: value-tree path resolution, array-group
//! classification, change/blur event types, field metadata, validation rule
//! configuration and the aggregated form-state types.
//!
//! Everything here is synchronous, allocation-light and free of interior
//! mutability; shared mutable state lives one layer up.

pub mod event;
pub mod field;
pub mod group;
pub mod path;
pub mod rules;
pub mod state;

pub use event::{ChangePayload, EventKind, EventTarget, FieldEvent, InputEvent};
pub use field::{ControlElement, ElementHandle, FieldMeta, FieldName};
pub use group::in_array_group;
pub use path::{remove_at, resolve, set_at};
pub use rules::Rules;
pub use state::{FieldError, FieldState, FormState};

/// Canonical JSON-shaped value type for field values and aggregate trees.
pub use serde_json::Value;
