//! Environment dependencies for the ticket reducer.

use std::sync::Arc;
use ticket721_core::environment::{Clock, SystemClock};

/// Injected dependencies for [`TicketReducer`](crate::reducer::TicketReducer).
///
/// Production uses `SystemClock`, tests use `FixedClock`.
#[derive(Clone)]
pub struct RegistryEnvironment {
    clock: Arc<dyn Clock>,
}

impl RegistryEnvironment {
    /// Create an environment with the given clock.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Clock used to timestamp issuance and consumption.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

impl Default for RegistryEnvironment {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for RegistryEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEnvironment").finish_non_exhaustive()
    }
}
