//! Rejection reasons for registry commands.
//!
//! The display strings are part of the public contract: callers and tests match
//! on them, so they must not change.

use crate::types::{Identity, TicketId};
use thiserror::Error;

/// Why a command was rejected.
///
/// A rejected command never changes registry state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TicketError {
    /// Issue attempted by an identity outside the minter set
    #[error("Only minter can issue ticket.")]
    Unauthorized {
        /// The rejected caller
        caller: Identity,
    },

    /// Issue attempted for an ID that already has an owner
    #[error("Ticket already issued.")]
    AlreadyIssued {
        /// The existing ticket
        ticket_id: TicketId,
    },

    /// Transfer where `from` does not hold the ticket (or it was never issued)
    #[error("Transfer of ticket that is not own.")]
    NotOwner {
        /// The ticket being moved
        ticket_id: TicketId,
        /// The claimed holder
        from: Identity,
    },

    /// Transfer submitted by someone other than the holder
    #[error("Transfer caller is not owner.")]
    NotAuthorized {
        /// The ticket being moved
        ticket_id: TicketId,
        /// The rejected caller
        caller: Identity,
    },

    /// Consume submitted by someone other than the holder
    #[error("Ticket should be held by tx sender to be consumed.")]
    NotHeldBySender {
        /// The ticket being consumed
        ticket_id: TicketId,
        /// The rejected caller
        caller: Identity,
    },

    /// Consume of a ticket that was never issued or is already consumed
    #[error("Ticket needs to be consumable.")]
    NotConsumable {
        /// The ticket being consumed
        ticket_id: TicketId,
    },

    /// Role management attempted by an identity outside the minter set
    #[error("Caller does not have the minter role.")]
    MinterRequired {
        /// The rejected caller
        caller: Identity,
    },
}

impl TicketError {
    /// Stable machine-readable code for dispatch and metrics labels.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "unauthorized",
            Self::AlreadyIssued { .. } => "already_issued",
            Self::NotOwner { .. } => "not_owner",
            Self::NotAuthorized { .. } => "not_authorized",
            Self::NotHeldBySender { .. } => "not_held_by_sender",
            Self::NotConsumable { .. } => "not_consumable",
            Self::MinterRequired { .. } => "minter_required",
        }
    }
}
