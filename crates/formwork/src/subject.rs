#![forbid(unsafe_code)]

//! Single-threaded publish/subscribe channel.
//!
//! [`Subject<T>`] fans one published value out to every live subscriber.
//! Subscribing returns a [`Subscription`], an RAII guard owning the
//! callback; the subject itself only holds `Weak` references and prunes
//! dead ones lazily during notification.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle: a callback never fires after its guard is gone,
//!    even when the drop happens inside an earlier callback of the same
//!    cycle.
//! 3. Subscribing or dropping from inside a callback never invalidates the
//!    in-progress notification; a subscriber added mid-cycle first fires on
//!    the next cycle.
//!
//! # Failure Modes
//!
//! - Callback panic: propagates to the notifier; remaining subscribers of
//!   that cycle are skipped.
//! - Publish with no subscribers: no-op.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// A shared broadcast point for values of type `T`.
///
/// Cloning a `Subject` clones the handle, not the channel: all clones share
/// one subscriber list.
pub struct Subject<T: 'static> {
    subscribers: Rc<RefCell<Vec<Weak<dyn Fn(&T)>>>>,
}

impl<T: 'static> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Rc::clone(&self.subscribers),
        }
    }
}

impl<T: 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Subject<T> {
    /// Create a channel with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Register `callback` and return the guard keeping it alive.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let callback = Rc::new(callback);
        let dyn_callback: Rc<dyn Fn(&T)> = callback.clone();
        let weak: Weak<dyn Fn(&T)> = Rc::downgrade(&dyn_callback);
        self.subscribers.borrow_mut().push(weak);
        Subscription {
            _callback: callback,
        }
    }

    /// Publish `value` to every live subscriber, in registration order.
    pub fn notify(&self, value: &T) {
        // Snapshot the list so re-entrant subscribe/unsubscribe cannot
        // invalidate the iteration.
        let snapshot: Vec<Weak<dyn Fn(&T)>> = self.subscribers.borrow().clone();
        for weak in &snapshot {
            if let Some(callback) = weak.upgrade() {
                callback(value);
            }
        }
        self.subscribers
            .borrow_mut()
            .retain(|weak| weak.strong_count() > 0);
    }

    /// Number of live subscribers (dead guards may linger until the next
    /// notification prunes them).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

impl<T: 'static> fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}

/// RAII guard for one subscription; dropping it unsubscribes.
pub struct Subscription {
    _callback: Rc<dyn Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
