//! Unused Image Repository
//!
//! Tracks uploads that no saved item references, so the sweeper can ask the
//! file host to delete them. A row whose `deleting_at` is set has been handed
//! to the file host; items cannot claim it until the deletion settles.

use rusqlite::{params, OptionalExtension, Transaction};

use crate::domain::{DomainError, DomainResult, UnusedImage};
use super::db::{not_initialized, now_millis, SharedConnection};

pub struct UnusedImageRepository {
    conn: SharedConnection,
}

impl UnusedImageRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Record an upload key. Recording the same key twice keeps the first time.
    pub async fn record(&self, key: &str) -> DomainResult<UnusedImage> {
        self.record_at(key, now_millis()).await
    }

    /// Record an upload key with an explicit timestamp.
    ///
    /// Fails with `Conflict` if a saved item already uses the key.
    pub async fn record_at(&self, key: &str, created_at: i64) -> DomainResult<UnusedImage> {
        if key.trim().is_empty() {
            return Err(DomainError::InvalidInput("upload key must not be empty".into()));
        }
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let attached: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM items WHERE image_key = ?)",
            params![key],
            |row| row.get(0),
        )?;
        if attached {
            return Err(DomainError::Conflict(format!("Upload {} is already attached to an item", key)));
        }

        conn.execute(
            "INSERT OR IGNORE INTO unused_images (id, created_at) VALUES (?, ?)",
            params![key, created_at],
        )?;
        let image = conn.query_row(
            "SELECT id, created_at FROM unused_images WHERE id = ?",
            params![key],
            row_to_unused_image,
        )?;
        Ok(image)
    }

    pub async fn list(&self) -> DomainResult<Vec<UnusedImage>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare("SELECT id, created_at FROM unused_images ORDER BY created_at, id")?;
        let images = stmt
            .query_map([], row_to_unused_image)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(images)
    }

    /// Mark every idle upload recorded at or before `cutoff` (unix millis) as
    /// being deleted and return their keys.
    ///
    /// Rows for keys an item has since picked up are dropped instead.
    pub async fn claim_older_than(&self, cutoff: i64) -> DomainResult<Vec<String>> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM unused_images WHERE id IN (SELECT image_key FROM items WHERE image_key IS NOT NULL)",
            [],
        )?;

        let keys = {
            let mut stmt = tx.prepare(
                "SELECT id FROM unused_images
                 WHERE created_at <= ? AND deleting_at IS NULL
                 ORDER BY created_at, id",
            )?;
            let keys = stmt
                .query_map(params![cutoff], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            keys
        };

        let now = now_millis();
        for key in &keys {
            tx.execute("UPDATE unused_images SET deleting_at = ? WHERE id = ?", params![now, key])?;
        }
        tx.commit()?;

        Ok(keys)
    }

    /// Put claimed keys back in the queue after the file host refused them
    pub async fn unclaim(&self, keys: &[String]) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        for key in keys {
            tx.execute("UPDATE unused_images SET deleting_at = NULL WHERE id = ?", params![key])?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Forget the given keys; returns how many rows went away
    pub async fn remove(&self, keys: &[String]) -> DomainResult<u32> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let mut removed = 0;
        for key in keys {
            removed += tx.execute("DELETE FROM unused_images WHERE id = ?", params![key])?;
        }
        tx.commit()?;
        Ok(removed as u32)
    }
}

/// Queue `keys` for deletion within a transaction that just deleted items.
///
/// Keys still used by a remaining item are skipped. The rest are recorded as
/// being deleted and returned.
pub(crate) fn release_keys(tx: &Transaction, keys: &[String]) -> rusqlite::Result<Vec<String>> {
    let now = now_millis();
    let mut released = Vec::new();
    for key in keys {
        let in_use: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM items WHERE image_key = ?)",
            params![key],
            |row| row.get(0),
        )?;
        if in_use {
            continue;
        }
        tx.execute(
            "INSERT INTO unused_images (id, created_at, deleting_at) VALUES (?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET deleting_at = excluded.deleting_at",
            params![key, now, now],
        )?;
        released.push(key.clone());
    }
    Ok(released)
}

/// Take `key` out of the queue for an item being saved in `tx`.
///
/// Fails with `Conflict` while the file host is deleting the upload.
pub(crate) fn claim_for_item(tx: &Transaction, key: &str) -> DomainResult<()> {
    let deleting: Option<Option<i64>> = tx
        .query_row(
            "SELECT deleting_at FROM unused_images WHERE id = ?",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(Some(_)) = deleting {
        return Err(DomainError::Conflict(format!("Upload {} is being deleted", key)));
    }
    tx.execute("DELETE FROM unused_images WHERE id = ?", params![key])?;
    Ok(())
}

fn row_to_unused_image(row: &rusqlite::Row) -> rusqlite::Result<UnusedImage> {
    Ok(UnusedImage {
        id: row.get(0)?,
        created_at: row.get(1)?,
    })
}
