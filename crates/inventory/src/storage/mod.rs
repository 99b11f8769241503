//! Storage traits and implementations
//!
//! This module defines the storage abstraction for inventory items and the
//! integration checkpoint. The trait-based design allows swapping between
//! in-memory and persistent storage implementations.

mod memory;
mod sqlite;
mod traits;

pub use memory::InMemoryInventoryStore;
pub use sqlite::SqliteInventoryStore;
pub use traits::InventoryStore;
