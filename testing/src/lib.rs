//! # Ticket721 Testing
//!
//! Testing utilities and helpers for the Ticket721 crates.
//!
//! This crate provides:
//! - A deterministic [`FixedClock`]
//! - A [`RecordingListener`] that captures emitted events
//! - The fluent [`ReducerTest`] for Given-When-Then reducer tests
//!
//! ## Example
//!
//! ```ignore
//! use ticket721_testing::{test_clock, RecordingListener};
//!
//! #[tokio::test]
//! async fn consumption_is_observed() {
//!     let listener = Arc::new(RecordingListener::new());
//!     let registry = TicketRegistry::builder(operator())
//!         .clock(Arc::new(test_clock()))
//!         .listener(listener.clone())
//!         .build();
//!
//!     registry.issue(&operator(), alice(), TicketId::new(1001)).await?;
//!     registry.consume(&alice(), TicketId::new(1001)).await?;
//!
//!     assert_eq!(listener.count(), 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use std::sync::{Mutex, PoisonError};
use ticket721_core::{environment::Clock, listener::EventListener};


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use ticket721_testing::mocks::FixedClock;
    /// use ticket721_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Listener that keeps every event it receives, in order.
#[derive(Debug)]
pub struct RecordingListener<E> {
    events: Mutex<Vec<E>>,
}

impl<E: Clone> RecordingListener<E> {
    /// Create an empty recorder
    #[must_use]
    pub const fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of all recorded events
    #[must_use]
    pub fn events(&self) -> Vec<E> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded events
    #[must_use]
    pub fn count(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<E: Clone> Default for RecordingListener<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone + Send> EventListener<E> for RecordingListener<E> {
    fn on_event(&self, event: &E) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock};
pub use reducer_test::ReducerTest;
