//! Item Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for Item CRUD operations.
//! Specialized operations are in separate modules:
//! - item_list: Operations scoped to one list (listing, packing)

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{hosted_key, Item, DomainError, DomainResult};
use crate::repository::db::{not_initialized, now_millis, row_id, SharedConnection};
use crate::repository::unused_image_repo::{claim_for_item, release_keys, UnusedImageRepository};
use super::super::traits::{OwnedRepository, Repository};

pub(crate) const ITEM_COLUMNS: &str =
    "id, name, description, image, quantity, bag, packed, list_id, category_id, owner, created_at, updated_at";

/// SQLite implementation of Item repository
pub struct ItemRepository {
    pub(super) conn: SharedConnection,
}

impl ItemRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Delete an item and hand back what was deleted, together with its
    /// hosted image key when no other item uses it. That key is already
    /// queued as being deleted.
    pub async fn delete_returning(&self, id: u32) -> DomainResult<Option<(Item, Vec<String>)>> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let item = tx
            .query_row(
                &format!("SELECT {} FROM items WHERE id = ?", ITEM_COLUMNS),
                params![id],
                row_to_item,
            )
            .optional()?;
        let Some(item) = item else {
            return Ok(None);
        };

        tx.execute("DELETE FROM items WHERE id = ?", params![id])?;
        let keys: Vec<String> = hosted_key(&item.image).into_iter().collect();
        let released = release_keys(&tx, &keys)?;
        tx.commit()?;

        Ok(Some((item, released)))
    }
}

#[async_trait]
impl Repository<Item> for ItemRepository {
    /// Insert the item. If its image is a hosted upload, the upload stops
    /// being tracked as unused in the same transaction.
    async fn create(&self, entity: &Item) -> DomainResult<Item> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let image_key = hosted_key(&entity.image);
        if let Some(key) = &image_key {
            claim_for_item(&tx, key)?;
        }

        let now = now_millis();
        tx.execute(
            "INSERT INTO items (name, description, image, quantity, bag, packed, list_id, category_id, image_key, owner, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                entity.name,
                entity.description,
                entity.image,
                entity.quantity,
                entity.bag,
                entity.packed,
                entity.list_id,
                entity.category_id,
                image_key,
                entity.owner,
                now,
                now,
            ],
        )?;
        let id = row_id(tx.last_insert_rowid())?;
        tx.commit()?;

        let mut item = entity.clone();
        item.id = id;
        item.created_at = Some(now);
        item.updated_at = Some(now);
        Ok(item)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Item>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let item = conn
            .query_row(
                &format!("SELECT {} FROM items WHERE id = ?", ITEM_COLUMNS),
                params![id],
                row_to_item,
            )
            .optional()?;
        Ok(item)
    }

    async fn list(&self) -> DomainResult<Vec<Item>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!("SELECT {} FROM items ORDER BY id", ITEM_COLUMNS))?;
        let items = stmt
            .query_map([], row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    async fn update(&self, entity: &Item) -> DomainResult<Item> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let now = now_millis();
        let changed = conn.execute(
            "UPDATE items SET name = ?, description = ?, image = ?, quantity = ?, bag = ?, packed = ?, category_id = ?, updated_at = ? WHERE id = ?",
            params![
                entity.name,
                entity.description,
                entity.image,
                entity.quantity,
                entity.bag,
                entity.packed,
                entity.category_id,
                now,
                entity.id,
            ],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Item {} not found", entity.id)));
        }

        let mut item = entity.clone();
        item.updated_at = Some(now);
        Ok(item)
    }

    /// Delete without contacting the file host; a released image is left
    /// for the sweeper.
    async fn delete(&self, id: u32) -> DomainResult<()> {
        let released = self.delete_returning(id).await?.map(|(_, keys)| keys).unwrap_or_default();
        UnusedImageRepository::new(self.conn.clone()).unclaim(&released).await
    }
}

#[async_trait]
impl OwnedRepository<Item> for ItemRepository {
    async fn list_by_owner(&self, owner: &str) -> DomainResult<Vec<Item>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM items WHERE owner = ? ORDER BY id",
            ITEM_COLUMNS
        ))?;
        let items = stmt
            .query_map(params![owner], row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }
}

/// Convert a database row to Item
pub(crate) fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        image: row.get(3)?,
        quantity: row.get(4)?,
        bag: row.get(5)?,
        packed: row.get(6)?,
        list_id: row.get(7)?,
        category_id: row.get(8)?,
        owner: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}
