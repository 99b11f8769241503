//! Catalog event synchronization
//!
//! Pulls productAdded events from the catalog, applies them idempotently to
//! the inventory and advances the checkpoint after every applied event.
//! Nothing here retries: a failed tick leaves the checkpoint before the
//! first unapplied event, so the next tick fetches it again.

mod applier;
mod error;
mod parameters;
mod scheduler;
mod synchronizer;

pub use applier::{AppliedEvent, Applier};
pub use error::SyncError;
pub use parameters::{FetchParameters, SINCE_PARAM, TYPE_PARAM};
pub use scheduler::Scheduler;
pub use synchronizer::{DEFAULT_EVENT_TYPE, SyncStats, Synchronizer, TickOutcome};
