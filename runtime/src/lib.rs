//! # Ticket721 Runtime
//!
//! Runtime for reducers defined with `ticket721-core`.
//!
//! ## Core Components
//!
//! - **Store**: Owns the state behind a single `RwLock`, runs the reducer for
//!   every action under the write lock, and executes the returned effects before
//!   releasing it
//! - **Listeners**: Synchronous callbacks registered at construction time
//! - **Event broadcast**: A `tokio::sync::broadcast` channel for subscribers that
//!   attach while the store is running
//!
//! ## Example
//!
//! ```ignore
//! use ticket721_runtime::Store;
//!
//! let store = Store::new(initial_state, reducer, environment);
//!
//! // Send an action and get back the events it emitted
//! let events = store.send(action).await?;
//!
//! // Read state
//! let count = store.state(|s| s.len()).await;
//! ```

use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use ticket721_core::{effect::Effect, listener::EventListener, reducer::Reducer};
use tokio::sync::{broadcast, RwLock};

/// Events emitted by a single action, in emission order
pub type Emitted<E> = SmallVec<[E; 4]>;

/// Configuration for a [`Store`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Capacity of the event broadcast channel
    ///
    /// Subscribers that fall further behind than this receive
    /// `RecvError::Lagged` and skip the oldest events.
    pub event_capacity: usize,
}

impl StoreConfig {
    /// Set the broadcast channel capacity
    #[must_use]
    pub const fn with_event_capacity(mut self, event_capacity: usize) -> Self {
        self.event_capacity = event_capacity;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { event_capacity: 64 }
    }
}

/// Shared listener handle
type Listener<E> = Arc<dyn EventListener<E>>;

/// The Store - serializes actions against shared state
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
///
/// Cloning a store is cheap and every clone shares the same state.
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: Arc<R>,
    environment: Arc<E>,
    listeners: Arc<[Listener<R::Event>]>,
    event_broadcast: broadcast::Sender<R::Event>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
    R::Event: Clone + fmt::Debug,
    R::Error: fmt::Display,
{
    /// Create a new store with default configuration and no listeners
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_config(initial_state, reducer, environment, StoreConfig::default())
    }

    /// Create a new store with custom configuration and no listeners
    #[must_use]
    pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
        Self::with_listeners(initial_state, reducer, environment, config, Vec::new())
    }

    /// Create a new store with custom configuration and synchronous listeners
    ///
    /// A capacity of zero is raised to one, since a broadcast channel cannot
    /// be empty.
    #[must_use]
    pub fn with_listeners(
        initial_state: S,
        reducer: R,
        environment: E,
        config: StoreConfig,
        listeners: Vec<Listener<R::Event>>,
    ) -> Self {
        let (event_broadcast, _) = broadcast::channel(config.event_capacity.max(1));

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer: Arc::new(reducer),
            environment: Arc::new(environment),
            listeners: listeners.into(),
            event_broadcast,
        }
    }

    /// Send an action through the reducer
    ///
    /// The reducer and all of its effects run while the write lock is held, so
    /// two actions never interleave their check-then-write sequences and the
    /// emitted events are delivered in transition order.
    ///
    /// # Returns
    ///
    /// The events emitted by this action (empty when the action had no
    /// observable effect).
    ///
    /// # Errors
    ///
    /// Returns the reducer's error unchanged when the action is rejected. No
    /// effects are executed in that case.
    ///
    /// # Panics
    ///
    /// Propagates a panic from a listener. The transition and the broadcast
    /// have already happened by then.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<Emitted<R::Event>, R::Error> {
        metrics::counter!("ticket721.store.commands.total").increment(1);

        let mut state = self.state.write().await;
        tracing::trace!("Acquired write lock on state");

        let effects = match self.reducer.reduce(&mut state, action, &self.environment) {
            Ok(effects) => effects,
            Err(error) => {
                tracing::warn!(%error, "Action rejected");
                metrics::counter!("ticket721.store.commands.rejected").increment(1);
                return Err(error);
            }
        };

        tracing::trace!("Reducer completed, returned {} effects", effects.len());

        let mut emitted = Emitted::new();
        for effect in effects {
            if let Effect::Emit(event) = effect {
                self.emit(&event);
                emitted.push(event);
            }
        }

        drop(state);
        Ok(emitted)
    }

    /// Deliver one event to broadcast subscribers, then to listeners
    fn emit(&self, event: &R::Event) {
        tracing::debug!(?event, "Emitting event");
        metrics::counter!("ticket721.store.events.emitted").increment(1);

        // No receivers is not an error: the event is still part of the receipt
        if self.event_broadcast.send(event.clone()).is_err() {
            tracing::trace!("No broadcast subscribers for event");
        }

        // Subscribers already have the event if a listener panics past this point
        for listener in self.listeners.iter() {
            listener.on_event(event);
        }
    }

    /// Subscribe to every event emitted after this call
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<R::Event> {
        self.event_broadcast.subscribe()
    }

    /// Read current state via a closure
    ///
    /// The closure runs under the read lock, so everything it reads comes from
    /// one consistent snapshot:
    ///
    /// ```ignore
    /// let total = store.state(|s| s.total_supply()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: Arc::clone(&self.reducer),
            environment: Arc::clone(&self.environment),
            listeners: Arc::clone(&self.listeners),
            event_broadcast: self.event_broadcast.clone(),
        }
    }
}
