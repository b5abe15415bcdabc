//! Flat-file user store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use super::error::StoreError;
use super::snapshot_cache::SnapshotCache;
use crate::domain::access::{UserIndex, UserRecord};
use crate::ports::UserDirectory;

/// User store backed by a JSON file.
///
/// The file holds either an array of user rows or an object with a `users`
/// array. It is re-read whenever its modification time changes.
pub struct FlatFileUserStore {
    cache: SnapshotCache<UserIndex>,
}

impl FlatFileUserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            cache: SnapshotCache::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.cache.path()
    }

    /// Loads (or reuses) the decoded file, propagating failures.
    pub async fn load(&self) -> Result<Arc<UserIndex>, StoreError> {
        self.cache.load_with(UserIndex::from_document).await
    }

    /// Same as [`UserDirectory::find_user`] but reports store failures.
    pub async fn try_find_user(&self, identifier: &str) -> Result<Option<UserRecord>, StoreError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Ok(None);
        }
        let index = self.load().await?;
        Ok(index.find(identifier).cloned())
    }

    /// Forces the next lookup to re-read the file.
    pub async fn invalidate(&self) {
        self.cache.invalidate().await;
    }
}

#[async_trait]
impl UserDirectory for FlatFileUserStore {
    async fn find_user(&self, identifier: &str) -> Option<UserRecord> {
        match self.try_find_user(identifier).await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!("User store lookup failed: {}", e);
                None
            }
        }
    }
}
