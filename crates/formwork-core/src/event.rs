#![forbid(unsafe_code)]

//! Change/blur events and raw-payload normalization.
//!
//! Two event shapes live here:
//!
//! - [`FieldEvent`] is the *synthetic* event a binding forwards into the
//!   store's registered handlers: a `{ target: { name, value }, kind }`
//!   triple.
//! - [`ChangePayload`] is the *raw* notification a UI layer hands to a
//!   binding's change entry point. It is either an input-event shape
//!   ([`InputEvent`]) or a plain value, and normalization picks the
//!   canonical stored value out of it.
//!
//! # Invariants
//!
//! 1. Normalizing an event-shaped payload with a `checked` capability yields
//!    the checked boolean, regardless of the event's `value`.
//! 2. Normalizing a plain value is the identity: unrecognized shapes pass
//!    through untouched; value correctness is the store's validation
//!    concern, not this layer's.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field::FieldName;

/// Kind of synthetic event forwarded to the store.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// The bound control's value changed.
    Change,
    /// The bound control lost focus.
    Blur,
}

/// The `target` of a synthetic event: which field, carrying what value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventTarget {
    /// Field name the event applies to.
    pub name: FieldName,
    /// Canonical value at the time of the event.
    pub value: Value,
}

/// Synthetic change/blur event delivered to the store's registered handlers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldEvent {
    /// Change or blur.
    pub kind: EventKind,
    /// Field name and value payload.
    pub target: EventTarget,
}

impl FieldEvent {
    /// Build a change event for `name` carrying `value`.
    #[must_use]
    pub fn change(name: impl Into<FieldName>, value: Value) -> Self {
        Self {
            kind: EventKind::Change,
            target: EventTarget {
                name: name.into(),
                value,
            },
        }
    }

    /// Build a blur event for `name` carrying `value`.
    #[must_use]
    pub fn blur(name: impl Into<FieldName>, value: Value) -> Self {
        Self {
            kind: EventKind::Blur,
            target: EventTarget {
                name: name.into(),
                value,
            },
        }
    }
}

/// An input-event shape as produced by a UI control: the control's current
/// `value`, plus `checked` when the control is checkbox-like.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputEvent {
    /// The control's value.
    pub value: Value,
    /// Checked state; `Some` only for checkbox-like controls.
    pub checked: Option<bool>,
}

impl InputEvent {
    /// An event for a plain (non-checkbox) control.
    #[must_use]
    pub fn with_value(value: Value) -> Self {
        Self {
            value,
            checked: None,
        }
    }

    /// An event for a checkbox-like control.
    #[must_use]
    pub fn with_checked(checked: bool) -> Self {
        Self {
            value: Value::Null,
            checked: Some(checked),
        }
    }
}

/// Raw change notification accepted by a binding's change entry point.
#[derive(Clone, Debug, PartialEq)]
pub enum ChangePayload {
    /// An event-shaped argument from a UI control.
    Event(InputEvent),
    /// A plain value, used directly.
    Plain(Value),
}

impl ChangePayload {
    /// Extract the canonical value: `checked` for checkbox-like events,
    /// `value` for other events, identity for plain values.
    #[must_use]
    pub fn normalize(self) -> Value {
        match self {
            Self::Event(event) => match event.checked {
                Some(checked) => Value::Bool(checked),
                None => event.value,
            },
            Self::Plain(value) => value,
        }
    }
}

impl From<InputEvent> for ChangePayload {
    fn from(event: InputEvent) -> Self {
        Self::Event(event)
    }
}

impl From<Value> for ChangePayload {
    fn from(value: Value) -> Self {
        Self::Plain(value)
    }
}

impl From<bool> for ChangePayload {
    fn from(value: bool) -> Self {
        Self::Plain(Value::Bool(value))
    }
}

impl From<&str> for ChangePayload {
    fn from(value: &str) -> Self {
        Self::Plain(Value::String(value.to_owned()))
    }
}

impl From<String> for ChangePayload {
    fn from(value: String) -> Self {
        Self::Plain(Value::String(value))
    }
}

impl From<i64> for ChangePayload {
    fn from(value: i64) -> Self {
        Self::Plain(Value::from(value))
    }
}

impl From<f64> for ChangePayload {
    fn from(value: f64) -> Self {
        Self::Plain(Value::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_checkbox_uses_checked() {
        let payload = ChangePayload::Event(InputEvent {
            value: json!("ignored"),
            checked: Some(true),
        });
        assert_eq!(payload.normalize(), json!(true));
    }

    #[test]
    fn normalize_event_uses_value() {
        let payload = ChangePayload::from(InputEvent::with_value(json!("typed")));
        assert_eq!(payload.normalize(), json!("typed"));
    }

    #[test]
    fn normalize_plain_is_identity() {
        let odd = json!({"nested": [1, 2]});
        assert_eq!(ChangePayload::Plain(odd.clone()).normalize(), odd);
    }

    #[test]
    fn conversions_produce_plain_values() {
        assert_eq!(ChangePayload::from("x").normalize(), json!("x"));
        assert_eq!(ChangePayload::from(3i64).normalize(), json!(3));
        assert_eq!(ChangePayload::from(false).normalize(), json!(false));
    }

    #[test]
    fn change_event_shape() {
        let event = FieldEvent::change("user.name", json!("ada"));
        assert_eq!(event.kind, EventKind::Change);
        assert_eq!(event.target.name, "user.name");
        assert_eq!(event.target.value, json!("ada"));
    }

    #[test]
    fn event_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&EventKind::Blur).unwrap(), "\"blur\"");
    }
}
