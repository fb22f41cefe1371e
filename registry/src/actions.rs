//! Commands accepted by the ticket registry.

use crate::types::{Identity, TicketId};
use serde::{Deserialize, Serialize};

/// Actions for the ticket registry.
///
/// Every action names its `caller` explicitly. The registry never consults an
/// ambient "current sender"; whoever dispatches the action has already
/// authenticated the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketAction {
    /// Issue a new ticket to `recipient` (minters only)
    Issue {
        /// Identity submitting the command
        caller: Identity,
        /// Initial holder of the ticket
        recipient: Identity,
        /// Caller-chosen ID, must not be issued yet
        ticket_id: TicketId,
    },

    /// Move a ticket from `from` to `to` (only `from` may do this)
    TransferFrom {
        /// Identity submitting the command
        caller: Identity,
        /// Current holder
        from: Identity,
        /// New holder
        to: Identity,
        /// Ticket to move
        ticket_id: TicketId,
    },

    /// Redeem a ticket (holder only, once)
    Consume {
        /// Identity submitting the command
        caller: Identity,
        /// Ticket to redeem
        ticket_id: TicketId,
    },

    /// Grant the minter role (minters only)
    AddMinter {
        /// Identity submitting the command
        caller: Identity,
        /// Identity receiving the role
        account: Identity,
    },

    /// Give up the caller's own minter role
    RenounceMinter {
        /// Identity submitting the command
        caller: Identity,
    },
}

impl TicketAction {
    /// The identity that submitted this action.
    #[must_use]
    pub const fn caller(&self) -> &Identity {
        match self {
            Self::Issue { caller, .. }
            | Self::TransferFrom { caller, .. }
            | Self::Consume { caller, .. }
            | Self::AddMinter { caller, .. }
            | Self::RenounceMinter { caller } => caller,
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Issue { .. } => "issue",
            Self::TransferFrom { .. } => "transfer_from",
            Self::Consume { .. } => "consume",
            Self::AddMinter { .. } => "add_minter",
            Self::RenounceMinter { .. } => "renounce_minter",
        }
    }
}
