//! Synchronous event listeners.
//!
//! A listener is registered with the store before it starts serving commands and
//! is invoked for every [`Effect::Emit`](crate::effect::Effect::Emit) while the
//! store still holds its write lock. Listeners therefore see events in the exact
//! order the transitions were applied, and never see an event whose transition
//! was rolled back (there is no rollback: rejected commands produce no effects).
//!
//! Listeners must return quickly and must not call back into the store, since
//! that would wait on the lock the store is holding. They must not panic
//! either: a panic unwinds out of the sending task after the transition has
//! been applied and broadcast, and later listeners for that event are skipped.
//!
//! # Example
//!
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use ticket721_core::listener::EventListener;
//!
//! let seen = AtomicUsize::new(0);
//! let listener = |_event: &u64| {
//!     seen.fetch_add(1, Ordering::SeqCst);
//! };
//!
//! listener.on_event(&1001);
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//! ```

/// Receives events emitted by a store.
pub trait EventListener<E>: Send + Sync {
    /// Called once per emitted event.
    fn on_event(&self, event: &E);
}

impl<E, F> EventListener<E> for F
where
    F: Fn(&E) + Send + Sync,
{
    fn on_event(&self, event: &E) {
        self(event);
    }
}
