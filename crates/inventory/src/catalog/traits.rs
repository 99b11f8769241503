//! Collaborator traits the synchronizer depends on

use anyhow::Result;

use super::{CatalogEvent, UriTemplate};

/// Discovers whether the catalog currently advertises its event feed
pub trait CapabilityResolver: Send + Sync {
    /// The advertised event link, or `None` if the feed is not available
    ///
    /// Unavailability is not an error: the catalog may simply not expose
    /// the feed (yet), or may be unreachable at the moment.
    fn resolve(&self) -> Option<UriTemplate>;
}

/// Fetches a page of catalog events
pub trait EventSource: Send + Sync {
    /// Fetch the event collection at `uri`, in the order the catalog returns it
    ///
    /// Transport and protocol errors must be returned, never swallowed.
    fn fetch_events(&self, uri: &str) -> Result<Vec<CatalogEvent>>;
}
