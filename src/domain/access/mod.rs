//! Access domain module.
//!
//! Combines user and subscription records into access decisions and builds
//! the payment redirect for callers without access.
//!
//! # Module Structure
//!
//! - `loose` - Decoding of hand-edited store values
//! - `user` - User records and their index
//! - `subscription` - Subscription records, active derivation, index
//! - `ticket` - Access reason, ticket and redirect decision
//! - `payment_url` - `user_id` merging into the payment URL
//! - `status` - Subscription status reported by the status service

pub mod loose;
pub mod payment_url;
mod status;
mod subscription;
mod ticket;
mod user;

pub use payment_url::{fallback_payment_url, merge_user_id, DEFAULT_PAYMENT_URL, USER_ID_PARAM};
pub use status::{
    extract_active_from_payload, parse_status_token, static_subscription, StatusSource,
    SubscriptionStatus, ACTIVE_PAYLOAD_KEYS,
};
pub use subscription::{
    ActivityRule, SubscriptionEntry, SubscriptionIndex, SubscriptionLookup, SubscriptionRecord,
    ACTIVE_STATUSES, INACTIVE_STATUSES, SUBSCRIPTIONS_COLLECTION,
};
pub use ticket::{AccessReason, AccessTicket, RedirectDecision};
pub use user::{UserIndex, UserRecord, USERS_COLLECTION};
