//! Unused Image Sweeper
//!
//! Uploaded files that never got attached to an item are deleted from the
//! file host once they are older than the grace period.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::domain::DomainResult;
use crate::AppState;

/// Outcome of one sweep
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub success: bool,
    /// Keys removed from the host and the queue
    pub deleted: Vec<String>,
    /// Keys the host refused; they stay queued
    pub failed: Vec<String>,
}

/// Delete every queued image older than the grace period
pub async fn sweep_unused_images(state: &AppState) -> DomainResult<SweepReport> {
    let grace_ms = (state.config.cleanup_grace_secs as i64).saturating_mul(1000);
    let cutoff = chrono::Utc::now().timestamp_millis().saturating_sub(grace_ms);

    // Claimed rows cannot be picked up by an item while the host deletes them
    let keys = state.unused_images.claim_older_than(cutoff).await?;
    if keys.is_empty() {
        return Ok(SweepReport { success: true, ..SweepReport::default() });
    }

    match state.file_host.delete_files(&keys).await {
        Ok(()) => {
            state.unused_images.remove(&keys).await?;
            log::info!("Swept {} unused image(s)", keys.len());
            Ok(SweepReport {
                success: true,
                deleted: keys,
                failed: Vec::new(),
            })
        }
        Err(e) => {
            log::warn!("Sweep of {} unused image(s) failed: {}", keys.len(), e);
            state.unused_images.unclaim(&keys).await?;
            Ok(SweepReport {
                success: false,
                deleted: Vec::new(),
                failed: keys,
            })
        }
    }
}

/// Run a sweep every `interval` until the task is aborted
pub fn spawn_sweeper(state: Arc<AppState>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = sweep_unused_images(&state).await {
                log::error!("Unused image sweep failed: {}", e);
            }
            match state.sessions.purge_expired().await {
                Ok(0) => {}
                Ok(n) => log::info!("Purged {} expired session(s)", n),
                Err(e) => log::error!("Session purge failed: {}", e),
            }
        }
    })
}
