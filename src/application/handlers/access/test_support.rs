//! In-memory directories for handler tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::access::{
    SubscriptionIndex, SubscriptionLookup, SubscriptionRecord, UserIndex, UserRecord,
};
use crate::domain::foundation::Timestamp;
use crate::ports::{SubscriptionDirectory, UserDirectory};

/// User directory backed by a fixed index. Counts lookups that reach the index.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    index: UserIndex,
    lookups: AtomicUsize,
}

impl InMemoryUserDirectory {
    pub fn from_document(document: Value) -> Self {
        Self {
            index: UserIndex::from_document(document),
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_user(&self, identifier: &str) -> Option<UserRecord> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.index.find(identifier).cloned()
    }
}

/// Subscription directory backed by a fixed index. Records every lookup.
#[derive(Default)]
pub struct InMemorySubscriptionDirectory {
    index: SubscriptionIndex,
    lookups: Mutex<Vec<(String, SubscriptionLookup)>>,
}

impl InMemorySubscriptionDirectory {
    pub fn from_document(document: Value) -> Self {
        Self {
            index: SubscriptionIndex::from_document(document),
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn lookups(&self) -> Vec<(String, SubscriptionLookup)> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubscriptionDirectory for InMemorySubscriptionDirectory {
    async fn find_subscription(
        &self,
        identifier: &str,
        lookup: &SubscriptionLookup,
    ) -> Option<SubscriptionRecord> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }
        self.lookups
            .lock()
            .unwrap()
            .push((identifier.to_string(), lookup.clone()));
        self.index
            .find(identifier, lookup)
            .map(|entry| entry.evaluate(&Timestamp::now()))
    }
}
