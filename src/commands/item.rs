//! Item Commands

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Item;
use super::{IdArgs, ListIdArgs, RpcClient, RpcError};

/// Fields of a new or edited item
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemArgs {
    pub name: String,
    pub description: String,
    pub category_id: u32,
    pub quantity: u32,
    pub bag: u32,
    pub packed: bool,
    pub list_id: u32,
}

impl ItemArgs {
    pub fn new(name: &str, list_id: u32, category_id: u32) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            category_id,
            quantity: 1,
            bag: 1,
            packed: false,
            list_id,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddItemArgs<'a> {
    #[serde(flatten)]
    item: &'a ItemArgs,
    image: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateItemArgs<'a> {
    id: u32,
    #[serde(flatten)]
    item: &'a ItemArgs,
}

/// Filter chips and search text for `filter_items`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bag: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FilterArgs<'a> {
    list_id: u32,
    #[serde(flatten)]
    query: &'a ItemQuery,
}

#[derive(Deserialize)]
struct Unpacked {
    unpacked: u32,
}

pub async fn get_items(client: &RpcClient) -> Result<Vec<Item>, RpcError> {
    client.invoke("getItems", &Value::Null).await
}

/// Add an item; `image` is the URL of the uploaded file
pub async fn add_item(client: &RpcClient, item: &ItemArgs, image: &str) -> Result<Item, RpcError> {
    client.invoke("addItem", &AddItemArgs { item, image }).await
}

pub async fn update_item(client: &RpcClient, id: u32, item: &ItemArgs) -> Result<Item, RpcError> {
    client.invoke("updateItem", &UpdateItemArgs { id, item }).await
}

pub async fn toggle_packed(client: &RpcClient, id: u32) -> Result<Item, RpcError> {
    client.invoke("togglePacked", &IdArgs { id }).await
}

/// Reset every item of a list to unpacked; returns how many changed
pub async fn unpack_all(client: &RpcClient, list_id: u32) -> Result<u32, RpcError> {
    let result: Unpacked = client.invoke("unpackAll", &ListIdArgs { list_id }).await?;
    Ok(result.unpacked)
}

pub async fn delete_item(client: &RpcClient, id: u32) -> Result<Item, RpcError> {
    client.invoke("deleteItem", &IdArgs { id }).await
}

pub async fn filter_items(client: &RpcClient, list_id: u32, query: &ItemQuery) -> Result<Vec<Item>, RpcError> {
    client.invoke("filterItems", &FilterArgs { list_id, query }).await
}
