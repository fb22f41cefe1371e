//! # Ticket721
//!
//! A registry of unique, non-fungible tickets with three lifecycle operations:
//!
//! - **Issue**: minters create a ticket under a caller-chosen ID
//! - **Transfer**: the holder hands the ticket to someone else
//! - **Consume**: the holder redeems the ticket, once, emitting `OnConsumption`
//!
//! # Ticket lifecycle
//!
//! ```text
//! nonexistent → issued(unconsumed) → issued(consumed)
//! ```
//!
//! Transfers change only the owner and are allowed in both issued states.
//! Nothing ever returns a ticket to `nonexistent` or clears `consumed`.
//!
//! # Architecture
//!
//! ```text
//! caller ──▶ TicketRegistry ──▶ Store (write lock) ──▶ TicketReducer
//!                                    │                      │
//!                                    │◀── Effect::Emit ─────┘
//!                                    ▼
//!                    listeners + broadcast subscribers
//! ```
//!
//! The reducer validates before it writes, and the store delivers emitted
//! events before releasing its lock, so a consumption and its event are always
//! observed together.
//!
//! # Example
//!
//! ```no_run
//! use ticket721::{Identity, TicketId, TicketRegistry};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let operator = Identity::new("operator")?;
//! let alice = Identity::new("alice")?;
//! let registry = TicketRegistry::new(operator.clone());
//!
//! registry.issue(&operator, alice.clone(), TicketId::new(1001)).await?;
//! let receipt = registry.consume(&alice, TicketId::new(1001)).await?;
//!
//! assert!(receipt.consumed(TicketId::new(1001)));
//! assert!(!registry.is_consumable(TicketId::new(1001)).await);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod actions;
pub mod config;
pub mod environment;
pub mod error;
pub mod events;
pub mod metrics;
pub mod reducer;
pub mod registry;
#[cfg(test)]
mod tests;
pub mod types;

pub use actions::TicketAction;
pub use config::{Config, ConfigError};
pub use environment::RegistryEnvironment;
pub use error::TicketError;
pub use events::{Receipt, TicketEvent};
pub use reducer::TicketReducer;
pub use registry::{TicketRegistry, TicketRegistryBuilder};
pub use types::{Identity, IdentityError, RegistryState, Ticket, TicketId};
