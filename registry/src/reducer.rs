//! Reducer for the ticket registry.
//!
//! Every command goes through the same three steps: validate against the
//! current state, mutate, describe effects. Validation never writes, so a
//! rejected command leaves the registry exactly as it was.
//!
//! ```text
//! nonexistent ──Issue──▶ issued(unconsumed) ──Consume──▶ issued(consumed)
//!                          │        ▲                      │        ▲
//!                          └────────┘                      └────────┘
//!                         TransferFrom                    TransferFrom
//! ```

use crate::actions::TicketAction;
use crate::environment::RegistryEnvironment;
use crate::error::TicketError;
use crate::events::TicketEvent;
use crate::types::{Identity, RegistryState, Ticket, TicketId};
use ticket721_core::effect::{Effect, Effects};
use ticket721_core::{reducer::Reducer, smallvec};

/// Reducer for the ticket registry.
#[derive(Clone, Debug, Default)]
pub struct TicketReducer;

impl TicketReducer {
    /// Creates a new `TicketReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates `Issue`
    ///
    /// The minter check runs before the duplicate check, so a non-minter
    /// always sees `Unauthorized`.
    fn validate_issue(
        state: &RegistryState,
        caller: &Identity,
        ticket_id: TicketId,
    ) -> Result<(), TicketError> {
        if !state.is_minter(caller) {
            return Err(TicketError::Unauthorized {
                caller: caller.clone(),
            });
        }

        if state.is_issued(ticket_id) {
            return Err(TicketError::AlreadyIssued { ticket_id });
        }

        Ok(())
    }

    /// Validates `TransferFrom`
    ///
    /// Consumability is irrelevant here: consumed tickets can still change hands.
    fn validate_transfer(
        state: &RegistryState,
        caller: &Identity,
        from: &Identity,
        ticket_id: TicketId,
    ) -> Result<(), TicketError> {
        if state.owner_of(ticket_id) != Some(from) {
            return Err(TicketError::NotOwner {
                ticket_id,
                from: from.clone(),
            });
        }

        if caller != from {
            return Err(TicketError::NotAuthorized {
                ticket_id,
                caller: caller.clone(),
            });
        }

        Ok(())
    }

    /// Validates `Consume`
    ///
    /// Consumability is checked before ownership: an unissued or spent ticket
    /// reports `NotConsumable` no matter who asks.
    fn validate_consume(
        state: &RegistryState,
        caller: &Identity,
        ticket_id: TicketId,
    ) -> Result<(), TicketError> {
        let Some(ticket) = state.ticket(ticket_id).filter(|ticket| ticket.is_consumable()) else {
            return Err(TicketError::NotConsumable { ticket_id });
        };

        if ticket.owner() != caller {
            return Err(TicketError::NotHeldBySender {
                ticket_id,
                caller: caller.clone(),
            });
        }

        Ok(())
    }

    /// Validates role management commands
    fn validate_minter(state: &RegistryState, caller: &Identity) -> Result<(), TicketError> {
        if state.is_minter(caller) {
            Ok(())
        } else {
            Err(TicketError::MinterRequired {
                caller: caller.clone(),
            })
        }
    }
}

impl Reducer for TicketReducer {
    type State = RegistryState;
    type Action = TicketAction;
    type Event = TicketEvent;
    type Error = TicketError;
    type Environment = RegistryEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Result<Effects<Self::Event>, Self::Error> {
        match action {
            TicketAction::Issue {
                caller,
                recipient,
                ticket_id,
            } => {
                Self::validate_issue(state, &caller, ticket_id)?;

                tracing::info!(%caller, %recipient, %ticket_id, "Ticket issued");
                state.insert_ticket(Ticket::new(ticket_id, recipient, env.clock().now()));

                Ok(smallvec![Effect::None])
            },

            TicketAction::TransferFrom {
                caller,
                from,
                to,
                ticket_id,
            } => {
                Self::validate_transfer(state, &caller, &from, ticket_id)?;

                if let Some(ticket) = state.ticket_mut(ticket_id) {
                    tracing::info!(%from, %to, %ticket_id, "Ticket transferred");
                    ticket.transfer_to(to);
                }

                Ok(smallvec![Effect::None])
            },

            TicketAction::Consume { caller, ticket_id } => {
                Self::validate_consume(state, &caller, ticket_id)?;

                let consumed_at = env.clock().now();
                let Some(ticket) = state.ticket_mut(ticket_id) else {
                    return Err(TicketError::NotConsumable { ticket_id });
                };
                ticket.consume(consumed_at);
                tracing::info!(%caller, %ticket_id, "Ticket consumed");

                Ok(smallvec![Effect::Emit(TicketEvent::OnConsumption {
                    ticket_id,
                    consumed_at,
                })])
            },

            TicketAction::AddMinter { caller, account } => {
                Self::validate_minter(state, &caller)?;

                if state.add_minter(account.clone()) {
                    tracing::info!(%caller, %account, "Minter added");
                } else {
                    tracing::debug!(%account, "Already a minter");
                }

                Ok(smallvec![Effect::None])
            },

            TicketAction::RenounceMinter { caller } => {
                Self::validate_minter(state, &caller)?;

                state.remove_minter(&caller);
                tracing::info!(%caller, "Minter renounced");

                Ok(smallvec![Effect::None])
            },
        }
    }
}
