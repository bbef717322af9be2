//! Upload bookkeeping
//!
//! The browser uploads images straight to the file host and reports the key
//! here. Until an item claims it the key sits in the unused-image queue.

use serde::{Deserialize, Serialize};

use crate::domain::{hosted_key, DomainError, DomainResult, UnusedImage, UserIdentity};
use crate::AppState;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUploadInput {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Queue an upload for cleanup. Keys already attached to an item are refused.
pub async fn record_upload(state: &AppState, user: &UserIdentity, input: RecordUploadInput) -> DomainResult<UnusedImage> {
    let key = match (input.key, input.url) {
        (Some(key), _) if !key.trim().is_empty() => key.trim().to_string(),
        (_, Some(url)) => hosted_key(url.trim())
            .ok_or_else(|| DomainError::InvalidInput(format!("Not a hosted file URL: {}", url)))?,
        _ => return Err(DomainError::InvalidInput("key or url is required".into())),
    };

    let image = state.unused_images.record(&key).await?;
    log::info!("Upload {} recorded for {}", image.id, user.id);
    Ok(image)
}
