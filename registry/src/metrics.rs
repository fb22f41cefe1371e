//! Registry metrics.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the host
//! process installs a recorder.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `ticket721_operations_total{operation, outcome}` - Commands by name and outcome
//!   (`ok` or the error code)
//! - `ticket721_tickets_consumed_total` - Successful consumptions
//!
//! The store additionally records `ticket721.store.commands.total`,
//! `ticket721.store.commands.rejected` and `ticket721.store.events.emitted`.

use crate::events::TicketEvent;
use metrics::describe_counter;

/// Commands by operation and outcome
const OPERATIONS_TOTAL: &str = "ticket721_operations_total";

/// Successful consumptions
const TICKETS_CONSUMED_TOTAL: &str = "ticket721_tickets_consumed_total";

/// Register metric descriptions.
///
/// This should be called once at application startup, before any metrics are recorded.
pub fn register_registry_metrics() {
    describe_counter!(
        OPERATIONS_TOTAL,
        "Registry commands by operation (issue, transfer_from, consume, add_minter, renounce_minter) and outcome"
    );
    describe_counter!(
        TICKETS_CONSUMED_TOTAL,
        "Total number of tickets consumed"
    );

    tracing::info!("Registry metrics registered");
}

/// Count one command outcome.
pub fn record_operation(operation: &'static str, outcome: &'static str) {
    metrics::counter!(OPERATIONS_TOTAL, "operation" => operation, "outcome" => outcome).increment(1);
}

/// Count one emitted event.
pub fn record_event(event: &TicketEvent) {
    match event {
        TicketEvent::OnConsumption { .. } => {
            metrics::counter!(TICKETS_CONSUMED_TOTAL).increment(1);
        },
    }
}
