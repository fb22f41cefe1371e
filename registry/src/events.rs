//! Observable events and operation receipts.

use crate::types::TicketId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Events delivered to listeners and subscribers.
///
/// Only consumption is observable. Issuance, transfers and role changes are
/// reflected in state and logs but not announced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TicketEvent {
    /// A ticket was consumed; emitted exactly once per ticket
    OnConsumption {
        /// The consumed ticket
        ticket_id: TicketId,
        /// When the registry recorded the consumption
        consumed_at: DateTime<Utc>,
    },
}

impl TicketEvent {
    /// Ticket this event is about.
    #[must_use]
    pub const fn ticket_id(&self) -> TicketId {
        match self {
            Self::OnConsumption { ticket_id, .. } => *ticket_id,
        }
    }
}

/// Outcome of a successful mutating call: the events it emitted, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    events: Vec<TicketEvent>,
}

impl Receipt {
    /// Build a receipt from emitted events.
    #[must_use]
    pub fn new(events: impl IntoIterator<Item = TicketEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// Events emitted by the call.
    #[must_use]
    pub fn events(&self) -> &[TicketEvent] {
        &self.events
    }

    /// Whether the call emitted `OnConsumption` for `ticket_id`.
    #[must_use]
    pub fn consumed(&self, ticket_id: TicketId) -> bool {
        self.events.iter().any(|event| {
            matches!(event, TicketEvent::OnConsumption { ticket_id: id, .. } if *id == ticket_id)
        })
    }
}
