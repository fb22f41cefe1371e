//! Core domain types for the ticket registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Identifiers
// ============================================================================

/// Caller-supplied unique ticket identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(u64);

impl TicketId {
    /// Create a ticket ID from its numeric value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the numeric value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for TicketId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors raised when building an [`Identity`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The identity string was empty or whitespace only
    #[error("Identity must not be empty")]
    Empty,
}

/// An already-authenticated account identity.
///
/// Authentication happens outside the registry; this is only the resolved name
/// of whoever is calling, receiving or holding a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Create an identity, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Empty`] if nothing is left after trimming.
    pub fn new(value: impl AsRef<str>) -> Result<Self, IdentityError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdentityError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Identity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Identity {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Ticket
// ============================================================================

/// A single issued ticket.
///
/// A ticket only exists once issued, so there is no "unowned" ticket value.
/// `consumed` can be set but never cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    id: TicketId,
    owner: Identity,
    consumed: bool,
    issued_at: DateTime<Utc>,
    consumed_at: Option<DateTime<Utc>>,
}

impl Ticket {
    /// Create a freshly issued, unconsumed ticket.
    #[must_use]
    pub const fn new(id: TicketId, owner: Identity, issued_at: DateTime<Utc>) -> Self {
        Self {
            id,
            owner,
            consumed: false,
            issued_at,
            consumed_at: None,
        }
    }

    /// Ticket ID
    #[must_use]
    pub const fn id(&self) -> TicketId {
        self.id
    }

    /// Current holder
    #[must_use]
    pub const fn owner(&self) -> &Identity {
        &self.owner
    }

    /// Whether the ticket has been consumed
    #[must_use]
    pub const fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// When the ticket was issued
    #[must_use]
    pub const fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// When the ticket was consumed, if it has been
    #[must_use]
    pub const fn consumed_at(&self) -> Option<DateTime<Utc>> {
        self.consumed_at
    }

    /// An issued ticket is consumable until it has been consumed.
    #[must_use]
    pub const fn is_consumable(&self) -> bool {
        !self.consumed
    }

    pub(crate) fn transfer_to(&mut self, to: Identity) {
        self.owner = to;
    }

    pub(crate) fn consume(&mut self, consumed_at: DateTime<Utc>) {
        if !self.consumed {
            self.consumed = true;
            self.consumed_at = Some(consumed_at);
        }
    }
}

// ============================================================================
// Registry State
// ============================================================================

/// All ticket records plus the minter set.
///
/// There is intentionally no `Default`: a registry always starts with at least
/// its deployer in the minter set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryState {
    tickets: HashMap<TicketId, Ticket>,
    minters: HashSet<Identity>,
}

impl RegistryState {
    /// Create an empty registry whose only minter is `deployer`.
    #[must_use]
    pub fn new(deployer: Identity) -> Self {
        Self {
            tickets: HashMap::new(),
            minters: HashSet::from([deployer]),
        }
    }

    /// Seed an additional minter at construction time.
    #[must_use]
    pub fn with_minter(mut self, minter: Identity) -> Self {
        self.minters.insert(minter);
        self
    }

    /// Look up a ticket.
    #[must_use]
    pub fn ticket(&self, ticket_id: TicketId) -> Option<&Ticket> {
        self.tickets.get(&ticket_id)
    }

    pub(crate) fn ticket_mut(&mut self, ticket_id: TicketId) -> Option<&mut Ticket> {
        self.tickets.get_mut(&ticket_id)
    }

    pub(crate) fn insert_ticket(&mut self, ticket: Ticket) {
        self.tickets.insert(ticket.id(), ticket);
    }

    /// Whether `ticket_id` has been issued.
    #[must_use]
    pub fn is_issued(&self, ticket_id: TicketId) -> bool {
        self.tickets.contains_key(&ticket_id)
    }

    /// Issued and not yet consumed.
    #[must_use]
    pub fn is_consumable(&self, ticket_id: TicketId) -> bool {
        self.ticket(ticket_id).is_some_and(Ticket::is_consumable)
    }

    /// Current holder of `ticket_id`, if issued.
    #[must_use]
    pub fn owner_of(&self, ticket_id: TicketId) -> Option<&Identity> {
        self.ticket(ticket_id).map(Ticket::owner)
    }

    /// Number of tickets currently held by `identity`, consumed ones included.
    #[must_use]
    pub fn balance_of(&self, identity: &Identity) -> usize {
        self.tickets
            .values()
            .filter(|ticket| ticket.owner() == identity)
            .count()
    }

    /// Number of issued tickets.
    #[must_use]
    pub fn total_supply(&self) -> usize {
        self.tickets.len()
    }

    /// Minter set membership.
    #[must_use]
    pub fn is_minter(&self, identity: &Identity) -> bool {
        self.minters.contains(identity)
    }

    /// Current minters, sorted for stable output.
    #[must_use]
    pub fn minters(&self) -> Vec<&Identity> {
        let mut minters: Vec<&Identity> = self.minters.iter().collect();
        minters.sort();
        minters
    }

    pub(crate) fn add_minter(&mut self, identity: Identity) -> bool {
        self.minters.insert(identity)
    }

    pub(crate) fn remove_minter(&mut self, identity: &Identity) -> bool {
        self.minters.remove(identity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use ticket721_testing::test_clock;
    use ticket721_core::environment::Clock;

    fn id(name: &str) -> Identity {
        Identity::new(name).unwrap()
    }

    #[test]
    fn test_identity_rejects_blank() {
        assert_eq!(Identity::new(""), Err(IdentityError::Empty));
        assert_eq!(Identity::new("   "), Err(IdentityError::Empty));
        assert_eq!(Identity::new("  alice ").unwrap().as_str(), "alice");
    }

    #[test]
    fn test_identity_deserialize_validates() {
        let ok: Identity = serde_json::from_str("\"bob\"").unwrap();
        assert_eq!(ok, id("bob"));
        assert!(serde_json::from_str::<Identity>("\"\"").is_err());
    }

    #[test]
    fn test_ticket_consume_is_one_way() {
        let now = test_clock().now();
        let mut ticket = Ticket::new(TicketId::new(1), id("alice"), now);
        assert!(ticket.is_consumable());

        ticket.consume(now);
        assert!(ticket.is_consumed());
        assert_eq!(ticket.consumed_at(), Some(now));

        // Transfer leaves the flag alone
        ticket.transfer_to(id("bob"));
        assert!(ticket.is_consumed());
        assert_eq!(ticket.owner(), &id("bob"));
    }

    #[test]
    fn test_state_queries() {
        let now = test_clock().now();
        let mut state = RegistryState::new(id("operator"));
        state.insert_ticket(Ticket::new(TicketId::new(1), id("alice"), now));
        state.insert_ticket(Ticket::new(TicketId::new(2), id("alice"), now));
        state.insert_ticket(Ticket::new(TicketId::new(3), id("bob"), now));

        assert_eq!(state.total_supply(), 3);
        assert_eq!(state.balance_of(&id("alice")), 2);
        assert_eq!(state.balance_of(&id("carol")), 0);
        assert_eq!(state.owner_of(TicketId::new(3)), Some(&id("bob")));
        assert_eq!(state.owner_of(TicketId::new(4)), None);
        assert!(state.is_consumable(TicketId::new(1)));
        assert!(!state.is_consumable(TicketId::new(4)));
    }

    #[test]
    fn test_minters_seeded_with_deployer() {
        let state = RegistryState::new(id("operator")).with_minter(id("box-office"));
        assert!(state.is_minter(&id("operator")));
        assert!(state.is_minter(&id("box-office")));
        assert!(!state.is_minter(&id("alice")));
        assert_eq!(state.minters(), vec![&id("box-office"), &id("operator")]);
    }
}
