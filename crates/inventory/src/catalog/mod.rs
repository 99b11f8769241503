//! Catalog service integration
//!
//! This module provides:
//! - HAL response types for catalog events
//! - URI template expansion for advertised links
//! - A blocking HTTP client for the catalog API
//! - Capability discovery through the catalog's root document

mod client;
mod discovery;
mod hal;
mod template;
mod traits;

pub use client::CatalogClient;
pub use discovery::HalCapabilityResolver;
pub use hal::{
    CatalogEvent, EventCollection, HAL_JSON, Link, LinkEntry, Links, PRODUCT_REL, ProductPayload,
    RootDocument,
};
pub use template::UriTemplate;
pub use traits::{CapabilityResolver, EventSource};
