//! Flat-file adapters.
//!
//! JSON files on local disk acting as the user and subscription stores.
//! Both share a snapshot cache keyed by the file's modification time.

mod error;
mod snapshot_cache;
mod subscription_store;
mod user_store;

pub use error::StoreError;
pub use snapshot_cache::SnapshotCache;
pub use subscription_store::FlatFileSubscriptionStore;
pub use user_store::FlatFileUserStore;
