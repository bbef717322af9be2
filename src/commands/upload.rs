//! Upload Commands

use serde::Serialize;
use serde_json::Value;

use crate::models::{SweepReport, UnusedImage};
use super::{RpcClient, RpcError};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordUploadArgs<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
}

/// Report a finished upload by its file key
pub async fn record_upload_key(client: &RpcClient, key: &str) -> Result<UnusedImage, RpcError> {
    client.invoke("recordUpload", &RecordUploadArgs { key: Some(key), url: None }).await
}

/// Report a finished upload by its hosted URL
pub async fn record_upload_url(client: &RpcClient, url: &str) -> Result<UnusedImage, RpcError> {
    client.invoke("recordUpload", &RecordUploadArgs { key: None, url: Some(url) }).await
}

/// Trigger an unused-image sweep. Uses the client's token as the cleanup token.
pub async fn run_cleanup(client: &RpcClient) -> Result<SweepReport, RpcError> {
    client.post("/api/cleanup", &Value::Null).await
}
