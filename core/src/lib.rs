//! # Ticket721 Core
//!
//! Core traits and types shared by the Ticket721 crates.
//!
//! The registry is written in the Reducer style:
//!
//! - **State**: The ticket records and the minter set
//! - **Action**: Every command a caller can submit (issue, transfer, consume, ...)
//! - **Reducer**: `(State, Action, Environment) → Result<Effects, Error>`
//! - **Effect**: Descriptions of what must be observed after a transition
//! - **Environment**: Injected dependencies (the clock)
//!
//! Unlike a fire-and-forget command bus, a rejected command is returned to the
//! caller synchronously as the reducer's `Err`. A reducer must validate before it
//! writes, so an `Err` always means the state was left untouched.
//!
//! ## Example
//!
//! ```ignore
//! use ticket721_core::*;
//!
//! impl Reducer for TicketReducer {
//!     type State = RegistryState;
//!     type Action = TicketAction;
//!     type Event = TicketEvent;
//!     type Error = TicketError;
//!     type Environment = RegistryEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut RegistryState,
//!         action: TicketAction,
//!         env: &RegistryEnvironment,
//!     ) -> Result<Effects<TicketEvent>, TicketError> {
//!         // Validate, then mutate, then describe the effects
//!         Ok(smallvec![Effect::None])
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// Event listeners notified synchronously when effects are executed
pub mod listener;

/// Reducer module - The core trait for business rules
pub mod reducer {
    use super::effect::Effects;

    /// The Reducer trait - core abstraction for business rules
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The command type this reducer processes
    /// - `Event`: The observable event type carried by `Effect::Emit`
    /// - `Error`: The rejection type returned when a command is not allowed
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// Observable events produced by successful actions
        type Event;

        /// Rejection reasons
        type Error;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This function:
        /// 1. Validates the action against the current state
        /// 2. Updates state in place (only when validation passed)
        /// 3. Returns effect descriptions to be executed by the store
        ///
        /// # Errors
        ///
        /// Returns `Self::Error` when the action is rejected. Implementations
        /// must not have modified `state` in that case.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Result<Effects<Self::Event>, Self::Error>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects are NOT executed by the reducer. They are returned as values and
/// executed by the store while it still holds the state write lock, so an
/// emitted event and the transition that produced it are observed together.
pub mod effect {
    use smallvec::SmallVec;

    /// Effects returned by a single reduction
    pub type Effects<Event> = SmallVec<[Effect<Event>; 4]>;

    /// Effect type - describes a side effect to be executed
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Effect<Event> {
        /// No-op effect
        None,

        /// Deliver an event to every listener and subscriber
        Emit(Event),
    }

    impl<Event> Effect<Event> {
        /// The emitted event, if this effect carries one
        #[must_use]
        pub const fn event(&self) -> Option<&Event> {
            match self {
                Self::None => None,
                Self::Emit(event) => Some(event),
            }
        }

        /// Check whether this effect is a no-op
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Self::None)
        }
    }
}

/// Environment module - Dependency injection traits
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
