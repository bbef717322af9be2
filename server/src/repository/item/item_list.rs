//! Item List Operations
//!
//! Operations for items within a specific list.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{Item, DomainError, DomainResult};
use crate::repository::db::{not_initialized, now_millis};
use super::item_repo::{row_to_item, ITEM_COLUMNS};

/// Trait for list-scoped item operations
#[async_trait]
pub trait ItemListOperations {
    /// Items of one list, oldest first
    async fn list_by_list(&self, list_id: u32) -> DomainResult<Vec<Item>>;

    /// Flip the packed flag and return the updated item
    async fn toggle_packed(&self, id: u32) -> DomainResult<Item>;

    /// Mark every item of a list as unpacked; returns how many changed
    async fn unpack_all(&self, list_id: u32) -> DomainResult<u32>;
}

#[async_trait]
impl ItemListOperations for super::item_repo::ItemRepository {
    async fn list_by_list(&self, list_id: u32) -> DomainResult<Vec<Item>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM items WHERE list_id = ? ORDER BY id",
            ITEM_COLUMNS
        ))?;
        let items = stmt
            .query_map(params![list_id], row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    async fn toggle_packed(&self, id: u32) -> DomainResult<Item> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute(
            "UPDATE items SET packed = NOT packed, updated_at = ? WHERE id = ?",
            params![now_millis(), id],
        )?;

        conn.query_row(
            &format!("SELECT {} FROM items WHERE id = ?", ITEM_COLUMNS),
            params![id],
            row_to_item,
        )
        .optional()?
        .ok_or_else(|| DomainError::NotFound(format!("Item {} not found", id)))
    }

    async fn unpack_all(&self, list_id: u32) -> DomainResult<u32> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute(
            "UPDATE items SET packed = 0, updated_at = ? WHERE list_id = ? AND packed = 1",
            params![now_millis(), list_id],
        )?;
        Ok(changed as u32)
    }
}
