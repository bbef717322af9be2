//! List Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for List CRUD operations.
//! Category management lives in `list_category`.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{Item, List, DomainError, DomainResult};
use crate::repository::db::{not_initialized, now_millis, row_id, SharedConnection};
use crate::repository::unused_image_repo::{release_keys, UnusedImageRepository};
use crate::repository::item::{row_to_item, ITEM_COLUMNS};
use super::super::traits::{OwnedRepository, Repository};

pub(crate) const LIST_COLUMNS: &str = "id, name, owner, created_at, updated_at";

/// SQLite implementation of List repository
pub struct ListRepository {
    pub(super) conn: SharedConnection,
}

impl ListRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Delete a list together with its items and categories.
    ///
    /// Returns the deleted items and the hosted image keys nothing else uses
    /// any more. Those keys are already queued as being deleted.
    pub async fn delete_with_items(&self, id: u32) -> DomainResult<Option<(List, Vec<Item>, Vec<String>)>> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let list = tx
            .query_row(
                &format!("SELECT {} FROM lists WHERE id = ?", LIST_COLUMNS),
                params![id],
                row_to_list,
            )
            .optional()?;
        let Some(list) = list else {
            return Ok(None);
        };

        let items = {
            let mut stmt = tx.prepare(&format!(
                "SELECT {} FROM items WHERE list_id = ? ORDER BY id",
                ITEM_COLUMNS
            ))?;
            let items = stmt
                .query_map(params![id], row_to_item)?
                .collect::<Result<Vec<_>, _>>()?;
            items
        };
        let keys = {
            let mut stmt = tx.prepare(
                "SELECT DISTINCT image_key FROM items WHERE list_id = ? AND image_key IS NOT NULL ORDER BY image_key",
            )?;
            let keys = stmt
                .query_map(params![id], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            keys
        };

        tx.execute("DELETE FROM items WHERE list_id = ?", params![id])?;
        tx.execute("DELETE FROM categories WHERE list_id = ?", params![id])?;
        tx.execute("DELETE FROM lists WHERE id = ?", params![id])?;
        let released = release_keys(&tx, &keys)?;
        tx.commit()?;

        Ok(Some((list, items, released)))
    }
}

#[async_trait]
impl Repository<List> for ListRepository {
    async fn create(&self, entity: &List) -> DomainResult<List> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let now = now_millis();
        conn.execute(
            "INSERT INTO lists (name, owner, created_at, updated_at) VALUES (?, ?, ?, ?)",
            params![entity.name, entity.owner, now, now],
        )?;

        let mut list = entity.clone();
        list.id = row_id(conn.last_insert_rowid())?;
        list.created_at = Some(now);
        list.updated_at = Some(now);
        Ok(list)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<List>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let list = conn
            .query_row(
                &format!("SELECT {} FROM lists WHERE id = ?", LIST_COLUMNS),
                params![id],
                row_to_list,
            )
            .optional()?;
        Ok(list)
    }

    async fn list(&self) -> DomainResult<Vec<List>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!("SELECT {} FROM lists ORDER BY id", LIST_COLUMNS))?;
        let lists = stmt
            .query_map([], row_to_list)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lists)
    }

    async fn update(&self, entity: &List) -> DomainResult<List> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let now = now_millis();
        let changed = conn.execute(
            "UPDATE lists SET name = ?, updated_at = ? WHERE id = ?",
            params![entity.name, now, entity.id],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("List {} not found", entity.id)));
        }

        let mut list = entity.clone();
        list.updated_at = Some(now);
        Ok(list)
    }

    /// Delete without contacting the file host; released images are left
    /// for the sweeper.
    async fn delete(&self, id: u32) -> DomainResult<()> {
        let released = self
            .delete_with_items(id)
            .await?
            .map(|(_, _, keys)| keys)
            .unwrap_or_default();
        UnusedImageRepository::new(self.conn.clone()).unclaim(&released).await
    }
}

#[async_trait]
impl OwnedRepository<List> for ListRepository {
    async fn list_by_owner(&self, owner: &str) -> DomainResult<Vec<List>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM lists WHERE owner = ? ORDER BY id",
            LIST_COLUMNS
        ))?;
        let lists = stmt
            .query_map(params![owner], row_to_list)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lists)
    }
}

/// Convert a database row to List
pub(crate) fn row_to_list(row: &rusqlite::Row) -> rusqlite::Result<List> {
    Ok(List {
        id: row.get(0)?,
        name: row.get(1)?,
        owner: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}
