//! Flat-file subscription store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use super::error::StoreError;
use super::snapshot_cache::SnapshotCache;
use crate::domain::access::{SubscriptionIndex, SubscriptionLookup, SubscriptionRecord};
use crate::domain::foundation::Timestamp;
use crate::ports::SubscriptionDirectory;

/// Subscription store backed by a JSON file.
///
/// Rows are decoded with their activity rule and evaluated against the
/// clock on every lookup, so expiries take effect without a file change.
pub struct FlatFileSubscriptionStore {
    cache: SnapshotCache<SubscriptionIndex>,
}

impl FlatFileSubscriptionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            cache: SnapshotCache::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.cache.path()
    }

    pub async fn load(&self) -> Result<Arc<SubscriptionIndex>, StoreError> {
        self.cache.load_with(SubscriptionIndex::from_document).await
    }

    /// Same as [`SubscriptionDirectory::find_subscription`] but reports store failures.
    pub async fn try_find_subscription(
        &self,
        identifier: &str,
        lookup: &SubscriptionLookup,
    ) -> Result<Option<SubscriptionRecord>, StoreError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Ok(None);
        }
        let index = self.load().await?;
        let now = Timestamp::now();
        Ok(index
            .find(identifier, lookup)
            .map(|entry| entry.evaluate(&now)))
    }

    pub async fn invalidate(&self) {
        self.cache.invalidate().await;
    }
}

#[async_trait]
impl SubscriptionDirectory for FlatFileSubscriptionStore {
    async fn find_subscription(
        &self,
        identifier: &str,
        lookup: &SubscriptionLookup,
    ) -> Option<SubscriptionRecord> {
        match self.try_find_subscription(identifier, lookup).await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!("Subscription store lookup failed: {}", e);
                None
            }
        }
    }
}
