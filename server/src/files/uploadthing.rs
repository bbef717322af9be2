//! UploadThing client
//!
//! Only the delete endpoint is used; uploads go from the browser to the host.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::{DomainError, DomainResult};
use super::FileHost;

const API_KEY_HEADER: &str = "x-uploadthing-api-key";
const DELETE_PATH: &str = "/v6/deleteFiles";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteFilesRequest<'a> {
    file_keys: &'a [String],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteFilesResponse {
    success: bool,
    #[serde(default)]
    deleted_count: Option<u64>,
}

pub struct UploadThingHost {
    base_url: String,
    secret: String,
    client: reqwest::Client,
}

impl UploadThingHost {
    pub fn new(base_url: &str, secret: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            secret,
            client,
        }
    }

    fn delete_url(&self) -> String {
        format!("{}{}", self.base_url, DELETE_PATH)
    }

    fn headers(&self) -> DomainResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.secret)
            .map_err(|e| DomainError::Internal(format!("invalid file host secret: {}", e)))?;
        headers.insert(API_KEY_HEADER, key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl FileHost for UploadThingHost {
    fn name(&self) -> &'static str {
        "uploadthing"
    }

    async fn delete_files(&self, keys: &[String]) -> DomainResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let resp = self
            .client
            .post(self.delete_url())
            .headers(self.headers()?)
            .json(&DeleteFilesRequest { file_keys: keys })
            .send()
            .await
            .map_err(|e| DomainError::Upstream(format!("delete request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Upstream(format!("delete failed status={} body={}", status, body)));
        }

        let parsed: DeleteFilesResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Upstream(format!("unreadable delete response: {}", e)))?;
        if !parsed.success {
            return Err(DomainError::Upstream("file host reported failure".into()));
        }

        log::info!(
            "Deleted {} hosted file(s) ({} requested)",
            parsed.deleted_count.unwrap_or(keys.len() as u64),
            keys.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::{HeaderMap as AxumHeaders, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    async fn fake_delete(
        State(seen): State<Seen>,
        headers: AxumHeaders,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let key = headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let authorized = key.as_deref() == Some("sk_test");
        seen.lock().await.push((key, body));
        if authorized {
            (StatusCode::OK, Json(json!({"success": true, "deletedCount": 2})))
        } else {
            (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})))
        }
    }

    async fn spawn_fake_host() -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route(DELETE_PATH, post(fake_delete))
            .with_state(seen.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), seen)
    }

    #[tokio::test]
    async fn test_delete_sends_keys_and_secret() {
        let (url, seen) = spawn_fake_host().await;
        let host = UploadThingHost::new(&format!("{}/", url), "sk_test".to_string());

        host.delete_files(&["a.jpg".to_string(), "b.jpg".to_string()])
            .await
            .expect("delete should succeed");

        let seen = seen.lock().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.as_deref(), Some("sk_test"));
        assert_eq!(seen[0].1, json!({"fileKeys": ["a.jpg", "b.jpg"]}));
    }

    #[tokio::test]
    async fn test_rejected_key_is_upstream_error() {
        let (url, _) = spawn_fake_host().await;
        let host = UploadThingHost::new(&url, "wrong".to_string());

        let err = host.delete_files(&["a.jpg".to_string()]).await.unwrap_err();
        assert!(matches!(err, DomainError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_empty_delete_makes_no_request() {
        let (url, seen) = spawn_fake_host().await;
        let host = UploadThingHost::new(&url, "sk_test".to_string());

        host.delete_files(&[]).await.unwrap();
        assert!(seen.lock().await.is_empty());
    }
}
