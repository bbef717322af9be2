//! Hosted Images
//!
//! Item images live on the external file host. The database only stores the
//! public URL; the file key embedded in it is what the host needs to delete it.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// URL shapes served by the file host: `https://uploadthing.com/f/<key>`
/// and the CDN alias `https://utfs.io/f/<key>`
static HOSTED_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://(?:uploadthing\.com|utfs\.io)/f/([^/?#]+)/?(?:[?#].*)?$")
        .expect("hosted url pattern")
});

/// An upload that no saved item references (yet)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnusedImage {
    /// File key on the host
    pub id: String,
    /// Unix millis when the upload was recorded
    pub created_at: i64,
}

/// Extract the file key from a hosted image URL.
///
/// Returns `None` for URLs that do not point at the file host.
pub fn hosted_key(url: &str) -> Option<String> {
    let caps = HOSTED_URL.captures(url.trim())?;
    let raw = caps.get(1)?.as_str();
    let key = percent_decode_str(raw).decode_utf8_lossy().to_string();
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

/// Public URL for a file key
pub fn hosted_url(key: &str) -> String {
    format!("https://utfs.io/f/{}", key)
}

/// Validate an item image reference: it must be an absolute http(s) URL
pub fn is_valid_image_url(url: &str) -> bool {
    match reqwest::Url::parse(url.trim()) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some(),
        Err(_) => false,
    }
}
