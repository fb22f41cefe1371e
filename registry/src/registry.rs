//! The `TicketRegistry` facade.
//!
//! Wraps the runtime [`Store`] with one async method per operation. Mutating
//! calls take the caller identity as their first argument and return a
//! [`Receipt`] listing the events they emitted.

use crate::actions::TicketAction;
use crate::config::Config;
use crate::environment::RegistryEnvironment;
use crate::error::TicketError;
use crate::events::{Receipt, TicketEvent};
use crate::metrics;
use crate::reducer::TicketReducer;
use crate::types::{Identity, RegistryState, Ticket, TicketId};
use std::sync::Arc;
use ticket721_core::environment::{Clock, SystemClock};
use ticket721_core::listener::EventListener;
use ticket721_runtime::{Store, StoreConfig};
use tokio::sync::broadcast;

/// Store specialised for the ticket registry
pub type RegistryStore = Store<RegistryState, TicketAction, RegistryEnvironment, TicketReducer>;

/// Builder for [`TicketRegistry`].
pub struct TicketRegistryBuilder {
    state: RegistryState,
    clock: Arc<dyn Clock>,
    store_config: StoreConfig,
    listeners: Vec<Arc<dyn EventListener<TicketEvent>>>,
}

impl TicketRegistryBuilder {
    fn new(deployer: Identity) -> Self {
        Self {
            state: RegistryState::new(deployer),
            clock: Arc::new(SystemClock),
            store_config: StoreConfig::default(),
            listeners: Vec::new(),
        }
    }

    /// Seed an additional minter.
    #[must_use]
    pub fn minter(mut self, minter: Identity) -> Self {
        self.state = self.state.with_minter(minter);
        self
    }

    /// Use a specific clock (tests use `FixedClock`).
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Capacity of the broadcast channel behind [`TicketRegistry::subscribe`].
    #[must_use]
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.store_config = self.store_config.with_event_capacity(capacity);
        self
    }

    /// Register a synchronous listener for emitted events.
    #[must_use]
    pub fn listener<L>(mut self, listener: Arc<L>) -> Self
    where
        L: EventListener<TicketEvent> + 'static,
    {
        self.listeners.push(listener);
        self
    }

    /// Build the registry.
    #[must_use]
    pub fn build(self) -> TicketRegistry {
        tracing::debug!(
            minters = self.state.minters().len(),
            listeners = self.listeners.len(),
            event_capacity = self.store_config.event_capacity,
            "Building ticket registry"
        );

        TicketRegistry {
            store: Store::with_listeners(
                self.state,
                TicketReducer::new(),
                RegistryEnvironment::new(self.clock),
                self.store_config,
                self.listeners,
            ),
        }
    }
}

/// Registry of non-fungible tickets.
///
/// Clones share the same underlying state.
#[derive(Clone)]
pub struct TicketRegistry {
    store: RegistryStore,
}

impl TicketRegistry {
    /// Registry with `deployer` as its only minter and default settings.
    #[must_use]
    pub fn new(deployer: Identity) -> Self {
        Self::builder(deployer).build()
    }

    /// Start building a registry whose initial minter is `deployer`.
    #[must_use]
    pub fn builder(deployer: Identity) -> TicketRegistryBuilder {
        TicketRegistryBuilder::new(deployer)
    }

    /// Builder pre-filled from configuration.
    #[must_use]
    pub fn builder_from_config(config: &Config) -> TicketRegistryBuilder {
        config
            .additional_minters
            .iter()
            .cloned()
            .fold(Self::builder(config.deployer.clone()), TicketRegistryBuilder::minter)
            .event_capacity(config.event_capacity)
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Issue `ticket_id` to `recipient`.
    ///
    /// # Errors
    ///
    /// - [`TicketError::Unauthorized`] if `caller` is not a minter
    /// - [`TicketError::AlreadyIssued`] if the ID already has an owner
    pub async fn issue(
        &self,
        caller: &Identity,
        recipient: Identity,
        ticket_id: TicketId,
    ) -> Result<Receipt, TicketError> {
        self.dispatch(TicketAction::Issue {
            caller: caller.clone(),
            recipient,
            ticket_id,
        })
        .await
    }

    /// Move `ticket_id` from `from` to `to`. Only `from` may call this.
    ///
    /// # Errors
    ///
    /// - [`TicketError::NotOwner`] if `from` does not hold the ticket
    /// - [`TicketError::NotAuthorized`] if `caller` is not `from`
    pub async fn transfer_from(
        &self,
        caller: &Identity,
        from: Identity,
        to: Identity,
        ticket_id: TicketId,
    ) -> Result<Receipt, TicketError> {
        self.dispatch(TicketAction::TransferFrom {
            caller: caller.clone(),
            from,
            to,
            ticket_id,
        })
        .await
    }

    /// Consume `ticket_id`. Emits `OnConsumption` on success.
    ///
    /// # Errors
    ///
    /// - [`TicketError::NotConsumable`] if the ticket is unissued or already consumed
    /// - [`TicketError::NotHeldBySender`] if `caller` does not hold it
    pub async fn consume(&self, caller: &Identity, ticket_id: TicketId) -> Result<Receipt, TicketError> {
        self.dispatch(TicketAction::Consume {
            caller: caller.clone(),
            ticket_id,
        })
        .await
    }

    /// Grant the minter role to `account`.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::MinterRequired`] if `caller` is not a minter.
    pub async fn add_minter(&self, caller: &Identity, account: Identity) -> Result<Receipt, TicketError> {
        self.dispatch(TicketAction::AddMinter {
            caller: caller.clone(),
            account,
        })
        .await
    }

    /// Drop the caller's own minter role.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::MinterRequired`] if `caller` is not a minter.
    pub async fn renounce_minter(&self, caller: &Identity) -> Result<Receipt, TicketError> {
        self.dispatch(TicketAction::RenounceMinter {
            caller: caller.clone(),
        })
        .await
    }

    async fn dispatch(&self, action: TicketAction) -> Result<Receipt, TicketError> {
        let operation = action.name();
        tracing::debug!(operation, caller = %action.caller(), "Dispatching command");

        match self.store.send(action).await {
            Ok(events) => {
                metrics::record_operation(operation, "ok");
                for event in &events {
                    metrics::record_event(event);
                }
                Ok(Receipt::new(events))
            },
            Err(error) => {
                metrics::record_operation(operation, error.code());
                Err(error)
            },
        }
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Issued and not yet consumed.
    pub async fn is_consumable(&self, ticket_id: TicketId) -> bool {
        self.store.state(|s| s.is_consumable(ticket_id)).await
    }

    /// Minter set membership.
    pub async fn is_minter(&self, identity: &Identity) -> bool {
        self.store.state(|s| s.is_minter(identity)).await
    }

    /// Current holder of `ticket_id`.
    pub async fn owner_of(&self, ticket_id: TicketId) -> Option<Identity> {
        self.store.state(|s| s.owner_of(ticket_id).cloned()).await
    }

    /// Number of tickets held by `identity`.
    pub async fn balance_of(&self, identity: &Identity) -> usize {
        self.store.state(|s| s.balance_of(identity)).await
    }

    /// Number of issued tickets.
    pub async fn total_supply(&self) -> usize {
        self.store.state(RegistryState::total_supply).await
    }

    /// Snapshot of one ticket record.
    pub async fn ticket(&self, ticket_id: TicketId) -> Option<Ticket> {
        self.store.state(|s| s.ticket(ticket_id).cloned()).await
    }

    /// Snapshot of the whole registry.
    pub async fn snapshot(&self) -> RegistryState {
        self.store.state(RegistryState::clone).await
    }

    /// Receive every event emitted after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TicketEvent> {
        self.store.subscribe()
    }
}

impl std::fmt::Debug for TicketRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketRegistry").finish_non_exhaustive()
    }
}
