//! Storage trait definitions

use crate::models::{Checkpoint, InventoryItem, ProductId};
use anyhow::Result;

/// Trait for inventory storage operations
///
/// Implementations may be shared with other parts of the system, so every
/// method must be safe to call concurrently.
pub trait InventoryStore: Send + Sync {
    /// Get the integration checkpoint, if any event was applied yet
    fn get_checkpoint(&self) -> Result<Option<Checkpoint>>;

    /// Replace the integration checkpoint
    fn save_checkpoint(&self, checkpoint: Checkpoint) -> Result<()>;

    /// Find the inventory item tracking a product
    fn find_item(&self, product_id: &ProductId) -> Result<Option<InventoryItem>>;

    /// Create an inventory item for a product
    ///
    /// Idempotent: if an item for `product_id` already exists it is returned
    /// unchanged and `quantity` is ignored.
    fn create_item(&self, product_id: &ProductId, quantity: u32) -> Result<InventoryItem>;

    /// List all inventory items, ordered by product ID
    fn list_items(&self) -> Result<Vec<InventoryItem>>;

    /// Count inventory items
    fn count_items(&self) -> Result<usize>;

    /// Clear all data including the checkpoint (for testing)
    fn clear(&self) -> Result<()>;
}
