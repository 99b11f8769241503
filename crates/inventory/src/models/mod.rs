//! Domain models for inventory entities

mod checkpoint;
mod item;

pub use checkpoint::{Checkpoint, format_iso_date_time, parse_iso_date_time};
pub use item::{InventoryItem, ProductId};
