//! Errors that abort a synchronization tick

use chrono::NaiveDateTime;

use crate::models::ProductId;

/// Why a tick stopped early
///
/// None of these are handled inside the synchronizer. They propagate to
/// whoever drives the ticks, and the checkpoint stays at the last event that
/// was fully applied.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The stored checkpoint could not be read
    #[error("Failed to read integration checkpoint")]
    CheckpointRead(#[source] anyhow::Error),

    /// Retrieving the event collection failed (network, status or body)
    #[error("Failed to fetch catalog events from {uri}")]
    Fetch {
        uri: String,
        #[source]
        source: anyhow::Error,
    },

    /// The inventory store rejected the idempotent upsert
    #[error("Failed to apply catalog event for product {product_id}")]
    Apply {
        product_id: ProductId,
        #[source]
        source: anyhow::Error,
    },

    /// The applied event could not be recorded as the new checkpoint
    #[error("Failed to commit checkpoint {publication}")]
    Checkpoint {
        publication: NaiveDateTime,
        #[source]
        source: anyhow::Error,
    },

    /// The event does not say which product it is about
    #[error("Catalog event has no 'product' link")]
    MissingSubjectLink,

    /// The event cannot be checkpointed without a publication date
    #[error("Catalog event for product {product_id} has no publication date")]
    MissingPublicationDate { product_id: ProductId },
}

impl SyncError {
    /// Whether the catalog sent an event that can never be applied as-is
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            SyncError::MissingSubjectLink | SyncError::MissingPublicationDate { .. }
        )
    }
}
