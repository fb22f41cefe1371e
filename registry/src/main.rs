//! Ticket721 demo binary
//!
//! Builds a registry from the environment and walks one ticket through its
//! whole lifecycle: issue, transfer, a rejected consume by the previous holder,
//! and the final consume by the new holder.

use anyhow::Context;
use std::sync::Arc;
use ticket721::{metrics, Config, Identity, TicketEvent, TicketId, TicketRegistry};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present; missing file is fine
    let _ = dotenvy::dotenv();

    let config = Config::from_env().context("invalid registry configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("ticket721={}", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    metrics::register_registry_metrics();

    info!(
        deployer = %config.deployer,
        additional_minters = config.additional_minters.len(),
        event_capacity = config.event_capacity,
        "Configuration loaded"
    );

    let registry = TicketRegistry::builder_from_config(&config)
        .listener(Arc::new(|event: &TicketEvent| {
            info!(ticket_id = %event.ticket_id(), "OnConsumption observed by listener");
        }))
        .build();

    let mut events = registry.subscribe();
    let watcher = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            info!(?event, "OnConsumption received by subscriber");
        }
    });

    let operator = config.deployer.clone();
    let alice = Identity::new("alice")?;
    let bob = Identity::new("bob")?;
    let ticket_id = TicketId::new(1001);

    registry.issue(&operator, alice.clone(), ticket_id).await?;
    info!(
        %ticket_id,
        consumable = registry.is_consumable(ticket_id).await,
        "Issued to alice"
    );

    registry
        .transfer_from(&alice, alice.clone(), bob.clone(), ticket_id)
        .await?;
    info!(
        %ticket_id,
        consumable = registry.is_consumable(ticket_id).await,
        "Transferred alice -> bob"
    );

    match registry.consume(&alice, ticket_id).await {
        Ok(_) => warn!(%ticket_id, "Previous holder was able to consume"),
        Err(error) => info!(%ticket_id, code = error.code(), %error, "Consume by alice rejected"),
    }

    let receipt = registry.consume(&bob, ticket_id).await?;
    info!(
        %ticket_id,
        events = receipt.events().len(),
        consumable = registry.is_consumable(ticket_id).await,
        "Consumed by bob"
    );

    // Dropping the last registry handle closes the broadcast channel
    drop(registry);
    watcher.await.context("event watcher task failed")?;

    Ok(())
}
