//! List procedures

use serde::{Deserialize, Serialize};

use crate::domain::{
    normalize_category_names, require_name, DomainError, DomainResult, List, ListDetail, UserIdentity,
};
use crate::repository::{ItemListOperations, ListCategoryOperations, OwnedRepository};
use crate::AppState;
use super::{owned_list, release_images};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListInput {
    pub name: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetListInput {
    pub list_id: u32,
    #[serde(default)]
    pub include_items: bool,
    #[serde(default)]
    pub include_categories: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListInput {
    pub list_id: u32,
    pub name: String,
    #[serde(default)]
    pub categories_added: Vec<String>,
    #[serde(default)]
    pub categories_removed: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListIdInput {
    pub list_id: u32,
}

/// Create a list with its initial categories
pub async fn create_list(state: &AppState, user: &UserIdentity, input: CreateListInput) -> DomainResult<List> {
    let name = require_name("list name", &input.name)?;
    let categories = normalize_category_names(&input.categories)?;
    if categories.is_empty() {
        return Err(DomainError::InvalidInput("A list needs at least one category".into()));
    }

    let list = List::new(0, name, user.id.clone());
    let (created, _) = state.lists.create_with_categories(&list, &categories).await?;
    log::info!("List {} created by {}", created.id, user.id);
    Ok(created)
}

/// Lists owned by the session user
pub async fn get_lists(state: &AppState, user: &UserIdentity) -> DomainResult<Vec<List>> {
    state.lists.list_by_owner(&user.id).await
}

pub async fn get_list(state: &AppState, user: &UserIdentity, input: GetListInput) -> DomainResult<ListDetail> {
    let list = owned_list(state, user, input.list_id).await?;

    let categories = if input.include_categories {
        Some(state.lists.get_categories(list.id).await?)
    } else {
        None
    };
    let items = if input.include_items {
        Some(state.items.list_by_list(list.id).await?)
    } else {
        None
    };

    Ok(ListDetail { list, categories, items })
}

/// Rename a list and add/remove categories in one step.
///
/// Fails with a conflict naming every removed category that items still use.
pub async fn update_list(state: &AppState, user: &UserIdentity, input: UpdateListInput) -> DomainResult<ListDetail> {
    let list = owned_list(state, user, input.list_id).await?;
    let name = require_name("list name", &input.name)?;
    let added = normalize_category_names(&input.categories_added)?;
    let removed: Vec<String> = input
        .categories_removed
        .iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();

    let (updated, categories) = state
        .lists
        .update_with_categories(list.id, &name, &added, &removed)
        .await?;

    Ok(ListDetail {
        list: updated,
        categories: Some(categories),
        items: None,
    })
}

/// Delete a list with all of its categories and items
pub async fn delete_list(state: &AppState, user: &UserIdentity, input: ListIdInput) -> DomainResult<List> {
    let list = owned_list(state, user, input.list_id).await?;

    let (deleted, items, released) = state
        .lists
        .delete_with_items(list.id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("List {} not found", list.id)))?;
    log::info!("List {} deleted with {} item(s)", deleted.id, items.len());

    release_images(state, released).await;
    Ok(deleted)
}
