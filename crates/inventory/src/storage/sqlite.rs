//! SQLite-based inventory storage

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use rusqlite_migration::{M, Migrations};

use super::traits::InventoryStore;
use crate::models::{
    Checkpoint, InventoryItem, ProductId, format_iso_date_time, parse_iso_date_time,
};

/// Database migrations
///
/// Each migration is applied in order. The user_version pragma tracks which
/// migrations have been applied.
fn migrations() -> Migrations<'static> {
    Migrations::new(vec![
        // Migration 1: Initial schema
        M::up(
            r#"
            -- Catalog integration cursor; at most one row
            CREATE TABLE integration (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                last_publication TEXT NOT NULL,
                committed_at TEXT NOT NULL
            );

            -- One stock record per catalog product
            CREATE TABLE inventory_items (
                product_id TEXT PRIMARY KEY,
                quantity INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        ),
    ])
}

/// SQLite-based inventory storage
///
/// The PRIMARY KEY on `product_id` makes item creation safe against other
/// writers sharing the same database file.
pub struct SqliteInventoryStore {
    conn: Mutex<Connection>,
}

impl SqliteInventoryStore {
    /// Open (or create) the inventory database at `db_path`
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(db_path.as_ref())
            .with_context(|| format!("Failed to open database at {:?}", db_path.as_ref()))?;

        // WAL lets the REST side read while the integration writes.
        // busy_timeout covers writers from other processes.
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 5000;
            "#,
        )?;

        migrations()
            .to_latest(&mut conn)
            .context("Failed to run database migrations")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("database connection lock poisoned"))
    }

    fn load_item(conn: &Connection, product_id: &ProductId) -> Result<Option<InventoryItem>> {
        let quantity: Option<u32> = conn
            .query_row(
                "SELECT quantity FROM inventory_items WHERE product_id = ?",
                [product_id.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        Ok(quantity.map(|quantity| InventoryItem::new(product_id.clone(), quantity)))
    }
}

impl InventoryStore for SqliteInventoryStore {
    fn get_checkpoint(&self) -> Result<Option<Checkpoint>> {
        let conn = self.conn()?;
        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT last_publication, committed_at FROM integration WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((last_publication, committed_at)) = row else {
            return Ok(None);
        };

        let last_publication = parse_iso_date_time(&last_publication)
            .with_context(|| format!("Corrupt checkpoint timestamp: {}", last_publication))?;
        let committed_at = DateTime::parse_from_rfc3339(&committed_at)
            .map(|dt| dt.with_timezone(&Utc))
            .with_context(|| format!("Corrupt checkpoint commit time: {}", committed_at))?;

        Ok(Some(Checkpoint {
            last_publication,
            committed_at,
        }))
    }

    fn save_checkpoint(&self, checkpoint: Checkpoint) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO integration (id, last_publication, committed_at)
             VALUES (1, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                last_publication = excluded.last_publication,
                committed_at = excluded.committed_at",
            params![
                format_iso_date_time(&checkpoint.last_publication),
                checkpoint.committed_at.to_rfc3339(),
            ],
        )
        .context("Failed to save checkpoint")?;
        Ok(())
    }

    fn find_item(&self, product_id: &ProductId) -> Result<Option<InventoryItem>> {
        let conn = self.conn()?;
        Self::load_item(&conn, product_id)
    }

    fn create_item(&self, product_id: &ProductId, quantity: u32) -> Result<InventoryItem> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        // Duplicate keys are a successful no-op
        tx.execute(
            "INSERT INTO inventory_items (product_id, quantity) VALUES (?, ?)
             ON CONFLICT(product_id) DO NOTHING",
            params![product_id.as_str(), quantity],
        )
        .with_context(|| format!("Failed to create inventory item for {}", product_id))?;

        let item = Self::load_item(&tx, product_id)?
            .with_context(|| format!("Inventory item for {} vanished after insert", product_id))?;

        tx.commit()?;
        Ok(item)
    }

    fn list_items(&self) -> Result<Vec<InventoryItem>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT product_id, quantity FROM inventory_items ORDER BY product_id")?;

        let items = stmt
            .query_map([], |row| {
                Ok(InventoryItem::new(
                    ProductId::new(row.get::<_, String>(0)?),
                    row.get(1)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    fn count_items(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM inventory_items", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn clear(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(
            r#"
            DELETE FROM inventory_items;
            DELETE FROM integration;
            "#,
        )?;
        Ok(())
    }
}
