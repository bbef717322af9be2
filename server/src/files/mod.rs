//! File Host
//!
//! Item images are uploaded straight to an external file host. The service
//! only ever asks the host to delete files it no longer references.

mod uploadthing;

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

pub use uploadthing::UploadThingHost;

/// Backend that stores uploaded files
#[async_trait]
pub trait FileHost: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Delete files by key. Keys the host does not know are not an error.
    async fn delete_files(&self, keys: &[String]) -> DomainResult<()>;
}

/// Used when no file host credentials are configured: logs, deletes nothing
#[derive(Debug, Default)]
pub struct NoopFileHost;

#[async_trait]
impl FileHost for NoopFileHost {
    fn name(&self) -> &'static str {
        "noop"
    }

    async fn delete_files(&self, keys: &[String]) -> DomainResult<()> {
        if !keys.is_empty() {
            log::warn!("No file host configured, not deleting {} file(s): {:?}", keys.len(), keys);
        }
        Ok(())
    }
}

/// In-process host that records deletions; can be told to fail
#[derive(Debug, Default)]
pub struct FakeFileHost {
    pub deleted: Mutex<Vec<String>>,
    pub fail: AtomicBool,
}

impl FakeFileHost {
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub async fn deleted_keys(&self) -> Vec<String> {
        self.deleted.lock().await.clone()
    }
}

#[async_trait]
impl FileHost for FakeFileHost {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn delete_files(&self, keys: &[String]) -> DomainResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::Upstream("fake host is failing".into()));
        }
        self.deleted.lock().await.extend(keys.iter().cloned());
        Ok(())
    }
}
