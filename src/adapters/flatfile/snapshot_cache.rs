//! Path and modification-time keyed cache for decoded store files.
//!
//! A store file is decoded once and reused until its modification time
//! changes. A missing file decodes to the empty snapshot and clears the
//! cache. Writers replace the whole snapshot, so readers never observe a
//! partially built index.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use serde_json::Value;
use tokio::sync::RwLock;

use super::error::StoreError;

struct CachedSnapshot<T> {
    modified: SystemTime,
    snapshot: Arc<T>,
}

/// Cache of one decoded store file.
pub struct SnapshotCache<T> {
    path: PathBuf,
    state: RwLock<Option<CachedSnapshot<T>>>,
}

impl<T: Default> SnapshotCache<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current snapshot, re-reading the file when it changed.
    ///
    /// `decode` runs only on a cache miss. On failure the previous snapshot
    /// stays cached; it is never served for a different modification time.
    pub async fn load_with<F>(&self, decode: F) -> Result<Arc<T>, StoreError>
    where
        F: FnOnce(Value) -> T,
    {
        let modified = match tokio::fs::metadata(&self.path).await {
            Ok(metadata) => metadata
                .modified()
                .map_err(|e| StoreError::io(&self.path, e))?,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(self.clear().await),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        {
            let cache = self.state.read().await;
            if let Some(ref cached) = *cache {
                if cached.modified == modified {
                    return Ok(cached.snapshot.clone());
                }
            }
        }

        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(self.clear().await),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        let document: Value =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::parse(&self.path, e))?;
        let snapshot = Arc::new(decode(document));

        tracing::debug!("Reloaded store file {}", self.path.display());

        {
            let mut cache = self.state.write().await;
            *cache = Some(CachedSnapshot {
                modified,
                snapshot: snapshot.clone(),
            });
        }

        Ok(snapshot)
    }

    /// Drops the cached snapshot; the next load re-reads the file.
    pub async fn invalidate(&self) {
        *self.state.write().await = None;
    }

    /// Returns true if a snapshot is currently cached.
    pub async fn is_cached(&self) -> bool {
        self.state.read().await.is_some()
    }

    async fn clear(&self) -> Arc<T> {
        self.invalidate().await;
        Arc::new(T::default())
    }
}
