//! # Storage Repository
//!
//! File bucket stub: uploads are kept in memory and addressed by
//! `(bucket, path)`.
//!
//! ```text
//! upload_file("health-files", "health-files/1705312800000.pdf", bytes)
//!      │
//!      ▼
//! objects[("health-files", "health-files/1705312800000.pdf")] = bytes
//!      │
//!      ▼
//! public_url(..) = https://mock-storage.medora.app/health-files/health-files/1705312800000.pdf
//! ```

use std::sync::Arc;

use medora_core::validation::{validate_bucket, validate_object_path};
use tracing::{debug, info};

use crate::error::StoreResult;
use crate::store::{simulate, StoreState};

/// Repository for bucket operations.
#[derive(Debug, Clone)]
pub struct StorageRepository {
    state: Arc<StoreState>,
}

impl StorageRepository {
    pub(crate) fn new(state: Arc<StoreState>) -> Self {
        StorageRepository { state }
    }

    /// Stores `bytes` at `path` inside `bucket`, replacing any previous
    /// object at that path.
    ///
    /// ## Returns
    /// * `Ok(String)` - The stored path
    /// * `Err(StoreError::Validation)` - Empty or malformed bucket / path
    pub async fn upload_file(&self, bucket: &str, path: &str, bytes: Vec<u8>) -> StoreResult<String> {
        validate_bucket(bucket)?;
        validate_object_path(path)?;
        simulate(self.state.config.upload_latency).await;

        let size = bytes.len();
        let mut objects = self.state.objects.write().await;
        let replaced = objects
            .insert((bucket.to_string(), path.to_string()), bytes)
            .is_some();

        info!(bucket = %bucket, path = %path, size, replaced, "Uploaded object");
        Ok(path.to_string())
    }

    /// Public URL for an object: `<public_host>/<bucket>/<path>`.
    ///
    /// Pure string formatting; the object need not exist.
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/{}/{}", self.state.config.public_host, bucket, path)
    }

    /// Reads back an uploaded object (no latency).
    pub async fn object(&self, bucket: &str, path: &str) -> Option<Vec<u8>> {
        let objects = self.state.objects.read().await;
        let found = objects
            .get(&(bucket.to_string(), path.to_string()))
            .cloned();
        debug!(bucket = %bucket, path = %path, found = found.is_some(), "Object lookup");
        found
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
