//! List Commands

use serde::Serialize;
use serde_json::Value;

use crate::models::{CategoryChanges, List, ListDetail};
use super::{ListIdArgs, RpcClient, RpcError};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateListArgs<'a> {
    name: &'a str,
    categories: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GetListArgs {
    list_id: u32,
    include_items: bool,
    include_categories: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateListArgs<'a> {
    list_id: u32,
    name: &'a str,
    categories_added: &'a [String],
    categories_removed: &'a [String],
}

pub async fn create_list(client: &RpcClient, name: &str, categories: &[String]) -> Result<List, RpcError> {
    client.invoke("createList", &CreateListArgs { name, categories }).await
}

pub async fn get_lists(client: &RpcClient) -> Result<Vec<List>, RpcError> {
    client.invoke("getLists", &Value::Null).await
}

pub async fn get_list(
    client: &RpcClient,
    list_id: u32,
    include_items: bool,
    include_categories: bool,
) -> Result<ListDetail, RpcError> {
    let args = GetListArgs { list_id, include_items, include_categories };
    client.invoke("getList", &args).await
}

pub async fn update_list(
    client: &RpcClient,
    list_id: u32,
    name: &str,
    changes: &CategoryChanges,
) -> Result<ListDetail, RpcError> {
    let args = UpdateListArgs {
        list_id,
        name,
        categories_added: &changes.added,
        categories_removed: &changes.removed,
    };
    client.invoke("updateList", &args).await
}

pub async fn delete_list(client: &RpcClient, list_id: u32) -> Result<List, RpcError> {
    client.invoke("deleteList", &ListIdArgs { list_id }).await
}
