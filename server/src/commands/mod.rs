//! Commands Layer
//!
//! Procedure handlers: validate input, check that the session user owns what
//! it touches, then call into the repositories.

mod list_cmd;
mod item_cmd;
mod upload_cmd;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::domain::{DomainError, DomainResult, Item, List, UserIdentity};
use crate::repository::Repository;
use crate::AppState;

pub use list_cmd::*;
pub use item_cmd::*;
pub use upload_cmd::*;

/// Every procedure name reachable through `dispatch`
pub const PROCEDURES: &[&str] = &[
    "createList",
    "getLists",
    "getList",
    "updateList",
    "deleteList",
    "getItems",
    "addItem",
    "updateItem",
    "togglePacked",
    "unpackAll",
    "deleteItem",
    "filterItems",
    "recordUpload",
];

pub fn is_procedure(name: &str) -> bool {
    PROCEDURES.contains(&name)
}

fn parse<T: DeserializeOwned>(input: Value) -> DomainResult<T> {
    serde_json::from_value(input).map_err(|e| DomainError::InvalidInput(format!("Invalid input: {}", e)))
}

fn reply<T: Serialize>(output: DomainResult<T>) -> DomainResult<Value> {
    serde_json::to_value(output?).map_err(|e| DomainError::Internal(e.to_string()))
}

/// Run the named procedure with a JSON input on behalf of `user`
pub async fn dispatch(
    state: &AppState,
    user: &UserIdentity,
    procedure: &str,
    input: Value,
) -> DomainResult<Value> {
    log::debug!("rpc {} by {}", procedure, user.id);
    match procedure {
        "createList" => reply(create_list(state, user, parse(input)?).await),
        "getLists" => reply(get_lists(state, user).await),
        "getList" => reply(get_list(state, user, parse(input)?).await),
        "updateList" => reply(update_list(state, user, parse(input)?).await),
        "deleteList" => reply(delete_list(state, user, parse(input)?).await),
        "getItems" => reply(get_items(state, user).await),
        "addItem" => reply(add_item(state, user, parse(input)?).await),
        "updateItem" => reply(update_item(state, user, parse(input)?).await),
        "togglePacked" => reply(toggle_packed(state, user, parse(input)?).await),
        "unpackAll" => reply(unpack_all(state, user, parse(input)?).await),
        "deleteItem" => reply(delete_item(state, user, parse(input)?).await),
        "filterItems" => reply(filter_items(state, user, parse(input)?).await),
        "recordUpload" => reply(record_upload(state, user, parse(input)?).await),
        other => Err(DomainError::NotFound(format!("Unknown procedure: {}", other))),
    }
}

/// Load a list the user owns
pub(crate) async fn owned_list(state: &AppState, user: &UserIdentity, list_id: u32) -> DomainResult<List> {
    let list = state
        .lists
        .find_by_id(list_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("List {} not found", list_id)))?;
    if !list.is_owned_by(&user.id) {
        return Err(DomainError::Forbidden("You do not own this list".into()));
    }
    Ok(list)
}

/// Load an item the user owns
pub(crate) async fn owned_item(state: &AppState, user: &UserIdentity, item_id: u32) -> DomainResult<Item> {
    let item = state
        .items
        .find_by_id(item_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Item {} not found", item_id)))?;
    if !item.is_owned_by(&user.id) {
        return Err(DomainError::Forbidden("You do not own this item".into()));
    }
    Ok(item)
}

/// Delete hosted files whose keys the repositories just released.
///
/// Never fails the caller: keys the host refuses go back to the unused-image
/// queue for the sweeper to retry.
pub(crate) async fn release_images(state: &AppState, keys: Vec<String>) {
    if keys.is_empty() {
        return;
    }
    match state.file_host.delete_files(&keys).await {
        Ok(()) => {
            log::info!("Released {} image(s) via {}", keys.len(), state.file_host.name());
            if let Err(e) = state.unused_images.remove(&keys).await {
                log::error!("Failed to forget released images {:?}: {}", keys, e);
            }
        }
        Err(e) => {
            log::warn!("Image delete failed, queueing {} key(s) for cleanup: {}", keys.len(), e);
            if let Err(e) = state.unused_images.unclaim(&keys).await {
                log::error!("Failed to queue unused images {:?}: {}", keys, e);
            }
        }
    }
}
