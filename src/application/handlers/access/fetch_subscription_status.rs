//! FetchSubscriptionStatusHandler - Query handler for a user's subscription status.
//!
//! Sources are consulted in a fixed order and the first answer wins:
//! configured overrides, the remote status source, the flat-file stores,
//! the built-in table, and finally a default inactive status.

use std::sync::Arc;

use tracing::debug;

use crate::domain::access::{static_subscription, SubscriptionLookup, SubscriptionStatus};
use crate::ports::{
    SubscriptionDirectory, SubscriptionStatusError, SubscriptionStatusSource, UserDirectory,
};

/// Query for the subscription status of one user id.
#[derive(Debug, Clone)]
pub struct FetchSubscriptionStatusQuery {
    pub user_id: String,
}

/// Ids granted an active subscription by configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionOverrides {
    pub user_ids: Vec<String>,
    pub plan_name: Option<String>,
    pub expires_at: Option<String>,
}

impl SubscriptionOverrides {
    /// Parses a comma-separated id list. Blank entries are dropped.
    pub fn from_list(list: &str) -> Self {
        Self {
            user_ids: list
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_plan_name(mut self, plan_name: Option<String>) -> Self {
        self.plan_name = plan_name;
        self
    }

    pub fn with_expires_at(mut self, expires_at: Option<String>) -> Self {
        self.expires_at = expires_at;
        self
    }

    fn status_for(&self, user_id: &str) -> Option<SubscriptionStatus> {
        self.user_ids
            .iter()
            .any(|id| id == user_id)
            .then(|| SubscriptionStatus::overridden(self.plan_name.clone(), self.expires_at.clone()))
    }
}

/// Handler answering subscription status queries.
pub struct FetchSubscriptionStatusHandler {
    users: Arc<dyn UserDirectory>,
    subscriptions: Arc<dyn SubscriptionDirectory>,
    remote: Option<Arc<dyn SubscriptionStatusSource>>,
    overrides: SubscriptionOverrides,
}

impl FetchSubscriptionStatusHandler {
    pub fn new(users: Arc<dyn UserDirectory>, subscriptions: Arc<dyn SubscriptionDirectory>) -> Self {
        Self {
            users,
            subscriptions,
            remote: None,
            overrides: SubscriptionOverrides::default(),
        }
    }

    /// Consults `remote` before the stores. A remote failure is final.
    pub fn with_remote(mut self, remote: Arc<dyn SubscriptionStatusSource>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_overrides(mut self, overrides: SubscriptionOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub async fn handle(
        &self,
        query: FetchSubscriptionStatusQuery,
    ) -> Result<SubscriptionStatus, SubscriptionStatusError> {
        let user_id = query.user_id.trim();
        if user_id.is_empty() {
            return Err(SubscriptionStatusError::MissingUserId);
        }

        if let Some(status) = self.overrides.status_for(user_id) {
            debug!(user_id, "Subscription status from configured override");
            return Ok(status);
        }

        if let Some(remote) = &self.remote {
            return remote.fetch_status(user_id).await;
        }

        if let Some(status) = self.from_stores(user_id).await {
            return Ok(status);
        }

        Ok(static_subscription(user_id).unwrap_or_else(SubscriptionStatus::inactive))
    }

    async fn from_stores(&self, user_id: &str) -> Option<SubscriptionStatus> {
        let user = self.users.find_user(user_id).await;

        let mut lookup = SubscriptionLookup::new();
        if let Some(user) = &user {
            let linked_id = user.linked_id.as_ref().map(|id| id.as_str().to_string());
            lookup = lookup
                .with_linked_id(linked_id.clone())
                .with_alias(user.user_id.as_str());
            if let Some(linked_id) = linked_id {
                lookup = lookup.with_alias(linked_id);
            }
        }

        let record = self.subscriptions.find_subscription(user_id, &lookup).await?;
        debug!(user_id, record_id = %record.user_id, "Subscription status from store");
        Some(SubscriptionStatus::from_record(&record))
    }
}
