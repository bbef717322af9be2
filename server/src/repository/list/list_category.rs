//! List-Category Operations
//!
//! Categories are created and removed through their list. Removing a
//! category that an item still references is refused.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Transaction};

use crate::domain::{Category, List, DomainError, DomainResult};
use crate::repository::db::{not_initialized, now_millis, row_id};
use super::list_repo::{row_to_list, LIST_COLUMNS};

/// Trait for category operations scoped to a list
#[async_trait]
pub trait ListCategoryOperations {
    /// Create a list and its initial categories in one transaction
    async fn create_with_categories(&self, list: &List, categories: &[String]) -> DomainResult<(List, Vec<Category>)>;

    /// All categories of a list, in creation order
    async fn get_categories(&self, list_id: u32) -> DomainResult<Vec<Category>>;

    /// Find a single category by ID
    async fn find_category(&self, category_id: u32) -> DomainResult<Option<Category>>;

    /// Rename a list and add/remove categories atomically.
    ///
    /// Fails with `Conflict` if a removed category is referenced by an item,
    /// and with `InvalidInput` if an added name already exists or the list
    /// would end up without categories.
    async fn update_with_categories(
        &self,
        list_id: u32,
        name: &str,
        added: &[String],
        removed: &[String],
    ) -> DomainResult<(List, Vec<Category>)>;
}

#[async_trait]
impl ListCategoryOperations for super::list_repo::ListRepository {
    async fn create_with_categories(&self, list: &List, categories: &[String]) -> DomainResult<(List, Vec<Category>)> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        let now = now_millis();
        tx.execute(
            "INSERT INTO lists (name, owner, created_at, updated_at) VALUES (?, ?, ?, ?)",
            params![list.name, list.owner, now, now],
        )?;
        let list_id = row_id(tx.last_insert_rowid())?;

        for name in categories {
            tx.execute(
                "INSERT INTO categories (name, list_id) VALUES (?, ?)",
                params![name, list_id],
            )?;
        }

        let created = select_categories(&tx, list_id)?;
        tx.commit()?;

        let mut list = list.clone();
        list.id = list_id;
        list.created_at = Some(now);
        list.updated_at = Some(now);
        Ok((list, created))
    }

    async fn get_categories(&self, list_id: u32) -> DomainResult<Vec<Category>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare("SELECT id, name, list_id FROM categories WHERE list_id = ? ORDER BY id")?;
        let categories = stmt
            .query_map(params![list_id], row_to_category)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    async fn find_category(&self, category_id: u32) -> DomainResult<Option<Category>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let category = conn
            .query_row(
                "SELECT id, name, list_id FROM categories WHERE id = ?",
                params![category_id],
                row_to_category,
            )
            .optional()?;
        Ok(category)
    }

    async fn update_with_categories(
        &self,
        list_id: u32,
        name: &str,
        added: &[String],
        removed: &[String],
    ) -> DomainResult<(List, Vec<Category>)> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction()?;

        // Check every removal before touching anything
        let in_use = categories_in_use(&tx, list_id, removed)?;
        if !in_use.is_empty() {
            return Err(DomainError::Conflict(format!(
                "Cannot remove categories that are in use: {}",
                in_use.join(", ")
            )));
        }

        for category in removed {
            tx.execute(
                "DELETE FROM categories WHERE list_id = ? AND name = ? COLLATE NOCASE",
                params![list_id, category],
            )?;
        }

        for category in added {
            let exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM categories WHERE list_id = ? AND name = ? COLLATE NOCASE)",
                params![list_id, category],
                |row| row.get(0),
            )?;
            if exists {
                return Err(DomainError::InvalidInput(format!("Category already exists: {}", category)));
            }
            tx.execute(
                "INSERT INTO categories (name, list_id) VALUES (?, ?)",
                params![category, list_id],
            )?;
        }

        let categories = select_categories(&tx, list_id)?;
        if categories.is_empty() {
            return Err(DomainError::InvalidInput("A list needs at least one category".into()));
        }

        let changed = tx.execute(
            "UPDATE lists SET name = ?, updated_at = ? WHERE id = ?",
            params![name, now_millis(), list_id],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("List {} not found", list_id)));
        }

        let list = tx.query_row(
            &format!("SELECT {} FROM lists WHERE id = ?", LIST_COLUMNS),
            params![list_id],
            row_to_list,
        )?;
        tx.commit()?;

        Ok((list, categories))
    }
}

/// Names from `names` that belong to `list_id` and are referenced by an item
fn categories_in_use(tx: &Transaction<'_>, list_id: u32, names: &[String]) -> DomainResult<Vec<String>> {
    let mut stmt = tx.prepare(
        "SELECT EXISTS(
            SELECT 1 FROM items i
            JOIN categories c ON c.id = i.category_id
            WHERE c.list_id = ? AND c.name = ? COLLATE NOCASE
        )",
    )?;

    let mut in_use = Vec::new();
    for name in names {
        let used: bool = stmt.query_row(params![list_id, name], |row| row.get(0))?;
        if used {
            in_use.push(name.clone());
        }
    }
    Ok(in_use)
}

fn select_categories(tx: &Transaction<'_>, list_id: u32) -> DomainResult<Vec<Category>> {
    let mut stmt = tx.prepare("SELECT id, name, list_id FROM categories WHERE list_id = ? ORDER BY id")?;
    let categories = stmt
        .query_map(params![list_id], row_to_category)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(categories)
}

/// Convert a database row to Category
pub(crate) fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        list_id: row.get(2)?,
    })
}
