//! RPC Command Wrappers
//!
//! Client bindings to server procedures, organized by domain.

mod list;
mod item;
mod upload;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub use list::*;
pub use item::*;
pub use upload::*;

/// Error returned by the server, or produced locally for transport failures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: String,
    pub message: String,
}

impl RpcError {
    fn transport(e: impl fmt::Display) -> Self {
        Self {
            code: "TRANSPORT".to_string(),
            message: e.to_string(),
        }
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for RpcError {}

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope {
    Data { data: Value },
    Error { error: RpcError },
}

/// Connection to a packlist server on behalf of one session
#[derive(Debug, Clone)]
pub struct RpcClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl RpcClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    async fn post<A: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, args: &A) -> Result<T, RpcError> {
        let mut req = self.http.post(format!("{}{}", self.base_url, path)).json(args);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await.map_err(RpcError::transport)?;
        let envelope: Envelope = resp.json().await.map_err(RpcError::transport)?;
        match envelope {
            Envelope::Data { data } => serde_json::from_value(data).map_err(RpcError::transport),
            Envelope::Error { error } => Err(error),
        }
    }

    /// Call a procedure by name
    pub async fn invoke<A: Serialize + ?Sized, T: DeserializeOwned>(&self, procedure: &str, args: &A) -> Result<T, RpcError> {
        self.post(&format!("/api/rpc/{}", procedure), args).await
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdArgs {
    id: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListIdArgs {
    list_id: u32,
}
