//! Inventory item model tracking stock for a catalog product

use serde::{Deserialize, Serialize};

/// Identifier of a catalog product
///
/// This is the href of the product resource as published by the catalog,
/// so it is globally unique without any local translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Local stock record for a single catalog product
///
/// At most one item exists per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub product_id: ProductId,
    /// Units currently in stock
    pub quantity: u32,
}

impl InventoryItem {
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }

    /// A freshly tracked product with nothing in stock
    pub fn empty(product_id: ProductId) -> Self {
        Self::new(product_id, 0)
    }
}
