//! Inventory crate - catalog integration for the stockroom inventory
//!
//! This crate provides:
//! - Domain models (InventoryItem, ProductId, Checkpoint)
//! - Storage trait abstractions with in-memory and SQLite backends
//! - Catalog API client, HAL types and capability discovery
//! - Checkpointed, idempotent event synchronization
//! - A fixed-delay scheduler driving the synchronization
//!
//! Everything is blocking code; the synchronizer is meant to run on a
//! dedicated worker thread.

pub mod catalog;
pub mod config;
pub mod models;
pub mod storage;
pub mod sync;

pub use catalog::{
    CapabilityResolver, CatalogClient, CatalogEvent, EventSource, HalCapabilityResolver,
    UriTemplate,
};
pub use config::IntegrationConfig;
pub use models::{Checkpoint, InventoryItem, ProductId};
pub use storage::{InMemoryInventoryStore, InventoryStore, SqliteInventoryStore};
pub use sync::{
    AppliedEvent, Applier, FetchParameters, Scheduler, SyncError, SyncStats, Synchronizer,
    TickOutcome,
};
