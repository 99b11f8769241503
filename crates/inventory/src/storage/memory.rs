//! In-memory storage implementation
//!
//! Used for tests and for running the integration without a database.

use anyhow::{Result, anyhow};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::InventoryStore;
use crate::models::{Checkpoint, InventoryItem, ProductId};

/// In-memory implementation of InventoryStore
///
/// Items are kept in a BTreeMap so listing is ordered by product ID.
/// Creation checks and inserts under a single write lock.
pub struct InMemoryInventoryStore {
    items: RwLock<BTreeMap<ProductId, InventoryItem>>,
    checkpoint: RwLock<Option<Checkpoint>>,
}

impl InMemoryInventoryStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
            checkpoint: RwLock::new(None),
        }
    }

    fn read_items(&self) -> Result<RwLockReadGuard<'_, BTreeMap<ProductId, InventoryItem>>> {
        self.items
            .read()
            .map_err(|_| anyhow!("inventory items lock poisoned"))
    }

    fn write_items(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<ProductId, InventoryItem>>> {
        self.items
            .write()
            .map_err(|_| anyhow!("inventory items lock poisoned"))
    }
}

impl Default for InMemoryInventoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryStore for InMemoryInventoryStore {
    fn get_checkpoint(&self) -> Result<Option<Checkpoint>> {
        let checkpoint = self
            .checkpoint
            .read()
            .map_err(|_| anyhow!("checkpoint lock poisoned"))?;
        Ok(checkpoint.clone())
    }

    fn save_checkpoint(&self, checkpoint: Checkpoint) -> Result<()> {
        let mut current = self
            .checkpoint
            .write()
            .map_err(|_| anyhow!("checkpoint lock poisoned"))?;
        *current = Some(checkpoint);
        Ok(())
    }

    fn find_item(&self, product_id: &ProductId) -> Result<Option<InventoryItem>> {
        Ok(self.read_items()?.get(product_id).cloned())
    }

    fn create_item(&self, product_id: &ProductId, quantity: u32) -> Result<InventoryItem> {
        let mut items = self.write_items()?;
        let item = items
            .entry(product_id.clone())
            .or_insert_with(|| InventoryItem::new(product_id.clone(), quantity));
        Ok(item.clone())
    }

    fn list_items(&self) -> Result<Vec<InventoryItem>> {
        Ok(self.read_items()?.values().cloned().collect())
    }

    fn count_items(&self) -> Result<usize> {
        Ok(self.read_items()?.len())
    }

    fn clear(&self) -> Result<()> {
        self.write_items()?.clear();
        *self
            .checkpoint
            .write()
            .map_err(|_| anyhow!("checkpoint lock poisoned"))? = None;
        Ok(())
    }
}
