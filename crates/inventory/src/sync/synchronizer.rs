//! Checkpointed catalog synchronization

use chrono::NaiveDateTime;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Instant;

use super::{Applier, FetchParameters, SyncError};
use crate::catalog::{CapabilityResolver, CatalogEvent, EventSource};
use crate::models::Checkpoint;
use crate::storage::InventoryStore;

/// Event type requested from the catalog feed
pub const DEFAULT_EVENT_TYPE: &str = "productAdded";

/// Statistics from a tick that reached the catalog feed
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SyncStats {
    /// Number of events returned by the catalog
    pub events_fetched: usize,
    /// Number of events applied and checkpointed
    pub events_applied: usize,
    /// Number of inventory items created
    pub records_created: usize,
    /// Checkpoint after the tick (None if nothing was ever applied)
    pub checkpoint: Option<NaiveDateTime>,
    /// Duration of the tick
    pub duration_ms: u64,
}

/// What a successful tick did
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The catalog does not advertise its event feed; nothing was touched
    NoCapability,
    /// The feed was fetched and every returned event applied
    Synced(SyncStats),
}

/// Pulls catalog events and applies them to the inventory
///
/// Collaborators are injected so the same orchestration runs against the
/// real catalog and SQLite, or against fakes in tests.
pub struct Synchronizer {
    resolver: Arc<dyn CapabilityResolver>,
    source: Arc<dyn EventSource>,
    store: Arc<dyn InventoryStore>,
    applier: Applier,
    event_type: String,
}

impl Synchronizer {
    pub fn new(
        resolver: Arc<dyn CapabilityResolver>,
        source: Arc<dyn EventSource>,
        store: Arc<dyn InventoryStore>,
    ) -> Self {
        Self {
            resolver,
            source,
            applier: Applier::new(Arc::clone(&store)),
            store,
            event_type: DEFAULT_EVENT_TYPE.to_string(),
        }
    }

    /// Request a different event type from the feed
    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    /// Run one synchronization pass
    ///
    /// Events are applied strictly in publication order and the checkpoint
    /// is committed after each one. Any error stops the pass immediately and
    /// is returned; the checkpoint then points at the last event that was
    /// fully applied, so the next tick resumes from there.
    pub fn tick(&self) -> Result<TickOutcome, SyncError> {
        info!("Catalog integration update triggered...");
        let start = Instant::now();

        let Some(template) = self.resolver.resolve() else {
            debug!("Catalog event feed not advertised, skipping update");
            return Ok(TickOutcome::NoCapability);
        };

        let mut checkpoint = self.store.get_checkpoint().map_err(SyncError::CheckpointRead)?;

        let params = FetchParameters::new(&self.event_type, checkpoint.as_ref());
        let uri = template
            .expand(params.as_pairs())
            .map_err(|source| SyncError::Fetch {
                uri: template.to_string(),
                source,
            })?;

        info!("Requesting new events from {}...", uri);

        let mut events = self
            .source
            .fetch_events(uri.as_str())
            .map_err(|source| SyncError::Fetch {
                uri: uri.to_string(),
                source,
            })?;

        info!("Processing {} new events...", events.len());

        let mut stats = SyncStats {
            events_fetched: events.len(),
            ..Default::default()
        };

        ensure_publication_order(&mut events);

        for event in &events {
            let applied = self.applier.apply_and_checkpoint(event)?;

            if let Some(current) = &checkpoint {
                if applied.publication_date < current.last_publication {
                    warn!(
                        "Event for {} published {} predates checkpoint {}, keeping checkpoint",
                        applied.product_id,
                        applied.publication_date,
                        current.since()
                    );
                }
            }

            let next = Checkpoint::advance(checkpoint.take(), applied.publication_date);
            self.store
                .save_checkpoint(next.clone())
                .map_err(|source| SyncError::Checkpoint {
                    publication: applied.publication_date,
                    source,
                })?;

            info!(
                "Successful catalog update. New reference time: {}.",
                next.since()
            );

            stats.events_applied += 1;
            if applied.created {
                stats.records_created += 1;
            }
            checkpoint = Some(next);
        }

        stats.checkpoint = checkpoint.map(|c| c.last_publication);
        stats.duration_ms = start.elapsed().as_millis() as u64;
        Ok(TickOutcome::Synced(stats))
    }
}

/// Stable-sort events by publication date unless they already are
///
/// The catalog is expected to return events in publication order. If it
/// does not, applying out of order could move the checkpoint past an event
/// that is still pending.
fn ensure_publication_order(events: &mut [CatalogEvent]) {
    if !events.is_sorted_by_key(|e| e.publication_date) {
        warn!("Catalog returned events out of publication order, sorting batch");
        events.sort_by_key(|e| e.publication_date);
    }
}
