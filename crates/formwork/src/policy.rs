#![forbid(unsafe_code)]

//! Unmount disposition: purge a field's state, or keep it for a remount.
//!
//! The decision is a pure function of three inputs, kept as an explicit
//! table rather than branching inline in the binding's teardown path:
//!
//! | in array group | should unregister | action in flight | disposition |
//! |----------------|-------------------|------------------|-------------|
//! | no             | no                | —                | Preserve    |
//! | no             | yes               | —                | Unregister  |
//! | yes            | no                | —                | Preserve    |
//! | yes            | yes               | yes              | Preserve    |
//! | yes            | yes               | no               | Unregister  |
//!
//! The in-flight guard exists so that array entries being reordered,
//! inserted around or removed next to are not destroyed while their
//! bindings briefly unmount and remount.

/// What to do with a field's stored state when its binding unmounts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Disposition {
    /// Remove the field's registration, value and validation state.
    Unregister,
    /// Keep everything; only the mount flag flips to `false`.
    Preserve,
}

/// Decide the unmount disposition.
///
/// `should_unregister` is the OR of the store-level default and the
/// per-binding override.
#[must_use]
pub fn unmount_disposition(
    in_array_group: bool,
    should_unregister: bool,
    action_in_flight: bool,
) -> Disposition {
    let unregister = if in_array_group {
        should_unregister && !action_in_flight
    } else {
        should_unregister
    };
    if unregister {
        Disposition::Unregister
    } else {
        Disposition::Preserve
    }
}
