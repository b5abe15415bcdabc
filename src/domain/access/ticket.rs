//! Access tickets: the outcome of combining a user and a subscription record.

use serde::{Deserialize, Serialize};

use super::subscription::SubscriptionRecord;
use super::user::UserRecord;

/// Why a ticket grants or denies chat access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessReason {
    /// The user row carries an explicit chat access flag.
    DirectAccess,
    /// An active subscription was found.
    Subscription,
    /// The identifier is known to at least one store but nothing grants access.
    InactiveSubscription,
    /// Neither store knows the identifier.
    UserNotFound,
}

impl AccessReason {
    /// Picks the reason, first match wins.
    pub fn determine(
        has_direct_access: bool,
        has_subscription: bool,
        is_known: bool,
    ) -> AccessReason {
        if has_direct_access {
            AccessReason::DirectAccess
        } else if has_subscription {
            AccessReason::Subscription
        } else if is_known {
            AccessReason::InactiveSubscription
        } else {
            AccessReason::UserNotFound
        }
    }

    /// Get a user-facing message explaining the decision.
    pub fn user_message(&self) -> &'static str {
        match self {
            AccessReason::DirectAccess => "Your account has direct access to the chat.",
            AccessReason::Subscription => "Your subscription is active.",
            AccessReason::InactiveSubscription => {
                "We found your account, but your subscription is not active. Please renew to continue."
            }
            AccessReason::UserNotFound => {
                "We could not find an account for this identifier. Please subscribe to continue."
            }
        }
    }
}

impl std::fmt::Display for AccessReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AccessReason::DirectAccess => "direct_access",
            AccessReason::Subscription => "subscription",
            AccessReason::InactiveSubscription => "inactive_subscription",
            AccessReason::UserNotFound => "user_not_found",
        };
        write!(f, "{}", s)
    }
}

/// The access decision for one lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTicket {
    /// The identifier exactly as supplied, untrimmed.
    pub lookup_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<SubscriptionRecord>,
    pub has_direct_access: bool,
    pub has_subscription: bool,
    pub has_chat_access: bool,
    pub reason: AccessReason,
}

impl AccessTicket {
    /// Ticket for an identifier that could not be matched at all.
    pub fn not_found(lookup_id: impl Into<String>) -> Self {
        Self::from_records(lookup_id, None, None)
    }

    /// Combines the records found for `lookup_id` into a ticket.
    pub fn from_records(
        lookup_id: impl Into<String>,
        user: Option<UserRecord>,
        subscription: Option<SubscriptionRecord>,
    ) -> Self {
        let has_direct_access = user.as_ref().is_some_and(UserRecord::has_direct_access);
        let has_subscription = subscription.as_ref().is_some_and(|record| record.active);
        let is_known = user.is_some() || subscription.is_some();

        Self {
            lookup_id: lookup_id.into(),
            user,
            subscription,
            has_direct_access,
            has_subscription,
            has_chat_access: has_direct_access || has_subscription,
            reason: AccessReason::determine(has_direct_access, has_subscription, is_known),
        }
    }

    /// The id to send to the payment page.
    ///
    /// Prefers the user record id, then the subscription record id, then the
    /// lookup id as supplied.
    pub fn payment_user_id(&self) -> &str {
        self.user
            .as_ref()
            .map(|user| user.user_id.as_str())
            .or_else(|| self.subscription.as_ref().map(|sub| sub.user_id.as_str()))
            .unwrap_or(self.lookup_id.as_str())
    }
}

/// Where to send the caller, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectDecision {
    pub destination: String,
    pub ticket: AccessTicket,
}
