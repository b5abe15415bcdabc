//! User directory port.
//!
//! Looks up user records by primary or linked id. Implementations absorb
//! their own storage failures: a lookup that cannot be answered is a miss.

use async_trait::async_trait;

use crate::domain::access::UserRecord;

/// Read access to the user store.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds the user whose primary id, or failing that linked id, equals
    /// the trimmed `identifier`.
    ///
    /// Blank identifiers return `None` without touching storage.
    async fn find_user(&self, identifier: &str) -> Option<UserRecord>;
}
