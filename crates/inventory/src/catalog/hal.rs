//! HAL response types published by the catalog service

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, HashMap};

use crate::models::{ProductId, parse_iso_date_time};

/// Media type requested from the catalog
pub const HAL_JSON: &str = "application/hal+json";

/// Link relation pointing from an event to its product
pub const PRODUCT_REL: &str = "product";

/// A single HAL link object
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default)]
    pub templated: bool,
}

/// HAL allows a relation to hold one link or an array of links
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LinkEntry {
    One(Link),
    Many(Vec<Link>),
}

impl LinkEntry {
    pub fn first(&self) -> Option<&Link> {
        match self {
            LinkEntry::One(link) => Some(link),
            LinkEntry::Many(links) => links.first(),
        }
    }
}

/// `_links` section of a HAL resource
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Links(HashMap<String, LinkEntry>);

impl Links {
    /// Get the first link for a relation
    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.0.get(rel).and_then(LinkEntry::first)
    }

    fn insert(&mut self, rel: impl Into<String>, link: Link) {
        self.0.insert(rel.into(), LinkEntry::One(link));
    }
}

/// Root document of the catalog API, used for capability discovery
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RootDocument {
    #[serde(rename = "_links", default)]
    pub links: Links,
}

/// Product snapshot carried in a productAdded event
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductPayload {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
}

/// A catalog event resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEvent {
    #[serde(default)]
    pub product: Option<ProductPayload>,
    #[serde(default, deserialize_with = "deserialize_publication_date")]
    pub publication_date: Option<NaiveDateTime>,
    #[serde(rename = "_links", default)]
    pub links: Links,
}

impl CatalogEvent {
    /// Fixture constructor: an event pointing at `product_href`
    ///
    /// Events from the catalog are always deserialized. This builds one in
    /// memory for tests and in-process feeds.
    pub fn new(product_href: impl Into<String>, publication_date: NaiveDateTime) -> Self {
        let mut links = Links::default();
        links.insert(
            PRODUCT_REL,
            Link {
                href: product_href.into(),
                templated: false,
            },
        );
        Self {
            product: None,
            publication_date: Some(publication_date),
            links,
        }
    }

    /// Fixture constructor: attach a product snapshot
    pub fn with_product(
        mut self,
        description: impl Into<String>,
        price: Option<Decimal>,
    ) -> Self {
        self.product = Some(ProductPayload {
            description: Some(description.into()),
            price,
        });
        self
    }

    /// Identifier of the product this event refers to
    pub fn product_id(&self) -> Option<ProductId> {
        self.links
            .get(PRODUCT_REL)
            .map(|link| ProductId::new(link.href.clone()))
    }

    /// Human readable product description for logging
    pub fn description(&self) -> &str {
        self.product
            .as_ref()
            .and_then(|p| p.description.as_deref())
            .unwrap_or("(no description)")
    }
}

/// HAL collection of events
///
/// A collection without `_embedded` is an empty page.
#[derive(Debug, Default, Deserialize)]
pub struct EventCollection {
    #[serde(rename = "_embedded", default)]
    pub embedded: BTreeMap<String, Vec<CatalogEvent>>,
}

impl EventCollection {
    pub fn into_events(self) -> Vec<CatalogEvent> {
        self.embedded.into_values().flatten().collect()
    }
}

fn deserialize_publication_date<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| {
        parse_iso_date_time(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid publicationDate: {}", s)))
    })
    .transpose()
}
