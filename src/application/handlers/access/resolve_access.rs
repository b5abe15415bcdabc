//! ResolveAccessHandler - Query handler combining both stores into an access ticket.

use std::sync::Arc;

use tracing::debug;

use crate::domain::access::{AccessTicket, SubscriptionLookup};
use crate::ports::{SubscriptionDirectory, UserDirectory};

/// Query to resolve access for an identifier.
#[derive(Debug, Clone)]
pub struct ResolveAccessQuery {
    /// The identifier as supplied by the caller, untrimmed.
    pub lookup_id: String,
}

impl ResolveAccessQuery {
    pub fn new(lookup_id: impl Into<String>) -> Self {
        Self {
            lookup_id: lookup_id.into(),
        }
    }
}

/// Handler resolving an identifier into an [`AccessTicket`].
///
/// Never fails. Store failures surface as missing records, and an unknown
/// identifier yields a `user_not_found` ticket.
pub struct ResolveAccessHandler {
    users: Arc<dyn UserDirectory>,
    subscriptions: Arc<dyn SubscriptionDirectory>,
}

impl ResolveAccessHandler {
    pub fn new(users: Arc<dyn UserDirectory>, subscriptions: Arc<dyn SubscriptionDirectory>) -> Self {
        Self {
            users,
            subscriptions,
        }
    }

    pub async fn handle(&self, query: ResolveAccessQuery) -> AccessTicket {
        let identifier = query.lookup_id.trim();
        if identifier.is_empty() {
            debug!(lookup_id = %query.lookup_id, "Blank identifier, skipping store lookups");
            return AccessTicket::not_found(query.lookup_id);
        }

        let user = self.users.find_user(identifier).await;
        let lookup = SubscriptionLookup::new().with_linked_id(
            user.as_ref()
                .and_then(|user| user.linked_id.as_ref())
                .map(|linked_id| linked_id.as_str().to_string()),
        );
        let subscription = self.subscriptions.find_subscription(identifier, &lookup).await;

        let ticket = AccessTicket::from_records(query.lookup_id, user, subscription);
        debug!(
            lookup_id = %ticket.lookup_id,
            reason = %ticket.reason,
            has_chat_access = ticket.has_chat_access,
            "Access resolved"
        );
        ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::access::test_support::{
        InMemorySubscriptionDirectory, InMemoryUserDirectory,
    };
    use crate::domain::access::AccessReason;
    use serde_json::json;

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn fixture_users() -> Arc<InMemoryUserDirectory> {
        Arc::new(InMemoryUserDirectory::from_document(json!({
            "users": [
                {"userId": "user3001@example.com", "gtcUserId": "3001", "providers": ["google"]},
                {"userId": "vip", "chatAccess": "yes"},
                {"userId": "lapsed@example.com", "gtcUserId": "4001"},
                {"userId": "plain"}
            ]
        })))
    }

    fn fixture_subscriptions() -> Arc<InMemorySubscriptionDirectory> {
        Arc::new(InMemorySubscriptionDirectory::from_document(json!({
            "subscriptions": [
                {"userId": "3001", "status": "active", "expiresAt": "2099-12-31T23:59:59Z"},
                {"userId": "4001", "status": "canceled"},
                {"userId": "vip", "active": false},
                {"userId": "orphan", "status": "trialing"}
            ]
        })))
    }

    fn handler_with(
        users: Arc<InMemoryUserDirectory>,
        subscriptions: Arc<InMemorySubscriptionDirectory>,
    ) -> ResolveAccessHandler {
        ResolveAccessHandler::new(users, subscriptions)
    }

    async fn resolve(lookup_id: &str) -> AccessTicket {
        handler_with(fixture_users(), fixture_subscriptions())
            .handle(ResolveAccessQuery::new(lookup_id))
            .await
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Reasons
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn linked_id_resolves_subscription() {
        let ticket = resolve("user3001@example.com").await;

        assert_eq!(ticket.reason, AccessReason::Subscription);
        assert!(ticket.has_subscription);
        assert!(ticket.has_chat_access);
        assert!(!ticket.has_direct_access);
        assert_eq!(ticket.subscription.unwrap().user_id.as_str(), "3001");
    }

    #[tokio::test]
    async fn direct_access_ignores_inactive_subscription() {
        let ticket = resolve("vip").await;
        assert_eq!(ticket.reason, AccessReason::DirectAccess);
        assert!(ticket.has_direct_access);
        assert!(!ticket.has_subscription);
        assert!(ticket.has_chat_access);
    }

    #[tokio::test]
    async fn canceled_subscription_is_inactive() {
        let ticket = resolve("lapsed@example.com").await;
        assert_eq!(ticket.reason, AccessReason::InactiveSubscription);
        assert!(!ticket.has_chat_access);
        assert!(ticket.subscription.is_some());
    }

    #[tokio::test]
    async fn user_without_subscription_is_inactive() {
        let ticket = resolve("plain").await;
        assert_eq!(ticket.reason, AccessReason::InactiveSubscription);
        assert!(ticket.user.is_some());
        assert!(ticket.subscription.is_none());
    }

    #[tokio::test]
    async fn subscription_without_user_grants_access() {
        let ticket = resolve("orphan").await;
        assert_eq!(ticket.reason, AccessReason::Subscription);
        assert!(ticket.user.is_none());
    }

    #[tokio::test]
    async fn unknown_identifier_is_not_found() {
        let ticket = resolve("ghost").await;
        assert_eq!(ticket.reason, AccessReason::UserNotFound);
        assert!(!ticket.has_direct_access);
        assert!(!ticket.has_subscription);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Identifier handling
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn identifier_is_trimmed_for_lookup_but_echoed_verbatim() {
        let ticket = resolve("  3001\t").await;
        assert_eq!(ticket.reason, AccessReason::Subscription);
        assert_eq!(ticket.lookup_id, "  3001\t");
    }

    #[tokio::test]
    async fn blank_identifier_skips_stores() {
        let users = fixture_users();
        let subscriptions = fixture_subscriptions();
        let handler = handler_with(users.clone(), subscriptions.clone());

        let ticket = handler.handle(ResolveAccessQuery::new("   ")).await;

        assert_eq!(ticket.reason, AccessReason::UserNotFound);
        assert!(ticket.user.is_none() && ticket.subscription.is_none());
        assert_eq!(users.lookups(), 0);
        assert!(subscriptions.lookups().is_empty());
    }

    #[tokio::test]
    async fn passes_user_linked_id_to_subscription_lookup() {
        let users = fixture_users();
        let subscriptions = fixture_subscriptions();
        let handler = handler_with(users, subscriptions.clone());

        handler
            .handle(ResolveAccessQuery::new(" user3001@example.com "))
            .await;

        let lookups = subscriptions.lookups();
        assert_eq!(lookups.len(), 1);
        assert_eq!(lookups[0].0, "user3001@example.com");
        assert_eq!(lookups[0].1.also_try_linked_id.as_deref(), Some("3001"));
        assert!(lookups[0].1.aliases.is_empty());
    }
}
