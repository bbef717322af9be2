//! Item procedures

use serde::{Deserialize, Serialize};

use crate::domain::{
    is_valid_image_url, require_name, DomainError, DomainResult, Item, ItemFilter, List,
    UserIdentity,
};
use crate::repository::{ItemListOperations, ListCategoryOperations, OwnedRepository, Repository};
use crate::AppState;
use super::{owned_item, owned_list, release_images};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemInput {
    pub name: String,
    pub description: String,
    /// URL of the uploaded image
    pub image: String,
    pub category_id: u32,
    pub quantity: u32,
    pub bag: u32,
    pub packed: bool,
    pub list_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemInput {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category_id: u32,
    pub quantity: u32,
    pub bag: u32,
    pub packed: bool,
    pub list_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemIdInput {
    pub id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnpackAllInput {
    pub list_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnpackAllOutput {
    pub unpacked: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterItemsInput {
    pub list_id: u32,
    #[serde(flatten)]
    pub filter: ItemFilter,
}

/// The category must exist and belong to `list`
async fn check_category(state: &AppState, list: &List, category_id: u32) -> DomainResult<()> {
    match state.lists.find_category(category_id).await? {
        Some(category) if category.list_id == list.id => Ok(()),
        _ => Err(DomainError::InvalidInput("Category does not exist".into())),
    }
}

/// Every item the session user owns, across all lists
pub async fn get_items(state: &AppState, user: &UserIdentity) -> DomainResult<Vec<Item>> {
    state.items.list_by_owner(&user.id).await
}

/// Add an item to a list. Attaching a hosted image claims it from the
/// unused-image queue.
pub async fn add_item(state: &AppState, user: &UserIdentity, input: AddItemInput) -> DomainResult<Item> {
    let list = owned_list(state, user, input.list_id).await?;
    check_category(state, &list, input.category_id).await?;

    let image = input.image.trim().to_string();
    if !is_valid_image_url(&image) {
        return Err(DomainError::InvalidInput("image must be an http(s) URL".into()));
    }

    let mut item = Item::new(0, require_name("item name", &input.name)?, list.id, input.category_id, user.id.clone());
    item.description = input.description.trim().to_string();
    item.image = image;
    item.quantity = input.quantity;
    item.bag = input.bag;
    item.packed = input.packed;
    item.validate()?;

    let created = state.items.create(&item).await?;
    log::info!("Item {} added to list {}", created.id, list.id);
    Ok(created)
}

/// Edit an item in place. The image and the list cannot change.
pub async fn update_item(state: &AppState, user: &UserIdentity, input: UpdateItemInput) -> DomainResult<Item> {
    let existing = owned_item(state, user, input.id).await?;
    if existing.list_id != input.list_id {
        return Err(DomainError::InvalidInput("Item does not belong to this list".into()));
    }
    let list = owned_list(state, user, existing.list_id).await?;
    check_category(state, &list, input.category_id).await?;

    let updated = Item {
        name: require_name("item name", &input.name)?,
        description: input.description.trim().to_string(),
        category_id: input.category_id,
        quantity: input.quantity,
        bag: input.bag,
        packed: input.packed,
        ..existing
    };
    updated.validate()?;

    state.items.update(&updated).await
}

pub async fn toggle_packed(state: &AppState, user: &UserIdentity, input: ItemIdInput) -> DomainResult<Item> {
    let item = owned_item(state, user, input.id).await?;
    state.items.toggle_packed(item.id).await
}

/// Mark every item of a list as not packed
pub async fn unpack_all(state: &AppState, user: &UserIdentity, input: UnpackAllInput) -> DomainResult<UnpackAllOutput> {
    let list = owned_list(state, user, input.list_id).await?;
    let unpacked = state.items.unpack_all(list.id).await?;
    Ok(UnpackAllOutput { unpacked })
}

/// Delete an item, then its hosted image unless another item still uses it
pub async fn delete_item(state: &AppState, user: &UserIdentity, input: ItemIdInput) -> DomainResult<Item> {
    let item = owned_item(state, user, input.id).await?;
    let (deleted, released) = state
        .items
        .delete_returning(item.id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Item {} not found", item.id)))?;

    release_images(state, released).await;
    Ok(deleted)
}

/// Items of one list narrowed by the filter chips and ranked by the search text
pub async fn filter_items(state: &AppState, user: &UserIdentity, input: FilterItemsInput) -> DomainResult<Vec<Item>> {
    let list = owned_list(state, user, input.list_id).await?;
    let items = state.items.list_by_list(list.id).await?;
    Ok(input.filter.apply(items))
}
