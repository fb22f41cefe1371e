//! Configuration management for the ticket registry.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::types::Identity;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use thiserror::Error;

/// Default initial minter when `TICKET721_MINTERS` is unset
const DEFAULT_MINTERS: &str = "operator";

/// Default broadcast channel capacity
const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Errors raised while loading configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `TICKET721_MINTERS` contained no usable identity
    #[error("TICKET721_MINTERS must name at least one minter")]
    NoMinters,

    /// `TICKET721_EVENT_CAPACITY` was not a positive integer
    #[error("TICKET721_EVENT_CAPACITY must be a positive integer, got '{0}'")]
    InvalidEventCapacity(String),
}

/// Registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Identity that deploys the registry (first entry of `TICKET721_MINTERS`)
    pub deployer: Identity,
    /// Further minters seeded at construction
    pub additional_minters: Vec<Identity>,
    /// Broadcast channel capacity for event subscribers
    pub event_capacity: usize,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `TICKET721_MINTERS` (comma-separated, first is the deployer) | `operator` |
    /// | `TICKET721_EVENT_CAPACITY` | `64` |
    /// | `TICKET721_LOG_LEVEL` | `info` |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is present but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a value is present but unusable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let minters_raw =
            lookup("TICKET721_MINTERS").unwrap_or_else(|| DEFAULT_MINTERS.to_string());

        let mut seen = HashSet::new();
        let mut minters = minters_raw
            .split(',')
            .filter_map(|entry| Identity::new(entry).ok())
            .filter(|identity| seen.insert(identity.clone()));

        let deployer = minters.next().ok_or(ConfigError::NoMinters)?;
        let additional_minters = minters.collect();

        let event_capacity = match lookup("TICKET721_EVENT_CAPACITY") {
            None => DEFAULT_EVENT_CAPACITY,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => capacity,
                _ => return Err(ConfigError::InvalidEventCapacity(raw)),
            },
        };

        let log_level = lookup("TICKET721_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            deployer,
            additional_minters,
            event_capacity,
            log_level,
        })
    }

    /// Every configured minter, deployer first.
    #[must_use]
    pub fn minters(&self) -> Vec<&Identity> {
        std::iter::once(&self.deployer)
            .chain(self.additional_minters.iter())
            .collect()
    }
}
