//! Idempotent application of a single catalog event

use chrono::NaiveDateTime;
use log::{debug, info};
use std::sync::Arc;

use super::SyncError;
use crate::catalog::CatalogEvent;
use crate::models::ProductId;
use crate::storage::InventoryStore;

/// Result of applying one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedEvent {
    pub product_id: ProductId,
    /// Checkpoint value to commit for this event
    pub publication_date: NaiveDateTime,
    /// Whether a new inventory item was created
    pub created: bool,
}

/// Makes sure every product announced by the catalog is tracked
pub struct Applier {
    store: Arc<dyn InventoryStore>,
}

impl Applier {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Ensure an inventory item exists for the event's product
    ///
    /// An existing item is left untouched. Creation goes through the
    /// store's idempotent `create_item`, so a concurrent writer creating the
    /// same product first is not an error. The returned publication date is
    /// the checkpoint value for this event; it is checked after the mutation
    /// so an undated event fails rather than being silently skipped.
    pub fn apply_and_checkpoint(&self, event: &CatalogEvent) -> Result<AppliedEvent, SyncError> {
        let product_id = event.product_id().ok_or(SyncError::MissingSubjectLink)?;

        let existing = self
            .store
            .find_item(&product_id)
            .map_err(|source| SyncError::Apply {
                product_id: product_id.clone(),
                source,
            })?;

        let created = match existing {
            Some(_) => {
                debug!("Inventory item for product {} already exists", product_id);
                false
            }
            None => {
                info!(
                    "Creating inventory item for product {}.",
                    event.description()
                );
                self.store
                    .create_item(&product_id, 0)
                    .map_err(|source| SyncError::Apply {
                        product_id: product_id.clone(),
                        source,
                    })?;
                true
            }
        };

        let publication_date = event
            .publication_date
            .ok_or_else(|| SyncError::MissingPublicationDate {
                product_id: product_id.clone(),
            })?;

        Ok(AppliedEvent {
            product_id,
            publication_date,
            created,
        })
    }
}
