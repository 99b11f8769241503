//! stockroomd - keeps the stockroom inventory in sync with the catalog
//!
//! Discovers the catalog's event feed, then polls it on a fixed delay and
//! creates an inventory item for every product the catalog adds.

use anyhow::{Context, Result};
use inventory::{
    CatalogClient, HalCapabilityResolver, IntegrationConfig, Scheduler, SqliteInventoryStore,
    Synchronizer, TickOutcome,
};
use log::{error, info};
use std::sync::Arc;
use std::sync::mpsc;

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if let Err(e) = run() {
        error!("stockroomd failed: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Bootstrap config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    let settings = IntegrationConfig::load()?;
    if let Some(path) = IntegrationConfig::default_config_path() {
        info!("Integration settings can be placed at {}", path.display());
    }

    let db_path = settings.database_path()?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory: {}", parent.display()))?;
    }
    let store = Arc::new(SqliteInventoryStore::new(&db_path)?);
    info!("Inventory database at {}", db_path.display());

    let client = Arc::new(CatalogClient::new());
    let resolver = Arc::new(HalCapabilityResolver::new(
        client.clone(),
        settings.catalog_url.clone(),
        settings.events_rel.clone(),
    ));
    let synchronizer =
        Synchronizer::new(resolver, client, store).with_event_type(settings.event_type.clone());

    info!(
        "Syncing catalog {} ('{}' feed, type {})",
        settings.catalog_url, settings.events_rel, settings.event_type
    );

    // The daemon runs until killed; the sender is kept alive for that.
    let (_shutdown_tx, shutdown_rx) = mpsc::channel();
    Scheduler::new(settings.interval()).run(
        || {
            let outcome = synchronizer.tick()?;
            if let TickOutcome::Synced(stats) = &outcome {
                info!(
                    "Applied {}/{} events, created {} items in {}ms",
                    stats.events_applied,
                    stats.events_fetched,
                    stats.records_created,
                    stats.duration_ms
                );
            }
            Ok::<_, anyhow::Error>(outcome)
        },
        &shutdown_rx,
    );

    Ok(())
}
