//! Subscription directory port.

use async_trait::async_trait;

use crate::domain::access::{SubscriptionLookup, SubscriptionRecord};

/// Read access to the subscription store.
///
/// # Contract
///
/// Implementations must:
/// - Return `None` for blank identifiers without touching storage
/// - Evaluate the record's `active` flag at call time
/// - Try the keys of `lookup` in the order documented on
///   [`SubscriptionLookup`] after the identifier itself
/// - Log and absorb storage failures, answering `None`
#[async_trait]
pub trait SubscriptionDirectory: Send + Sync {
    async fn find_subscription(
        &self,
        identifier: &str,
        lookup: &SubscriptionLookup,
    ) -> Option<SubscriptionRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_directory_is_object_safe() {
        fn _accepts_dyn(_directory: &dyn SubscriptionDirectory) {}
    }
}
