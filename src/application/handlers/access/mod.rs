//! Access handlers.
//!
//! ## Queries
//! - Resolve an identifier into an access ticket
//! - Fetch a user's subscription status
//!
//! ## Commands
//! - Decide between the chat and payment destinations

mod decide_redirect;
mod fetch_subscription_status;
mod resolve_access;

#[cfg(test)]
pub(crate) mod test_support;

// Commands
pub use decide_redirect::{DecideRedirectCommand, DecideRedirectHandler};

// Queries
pub use fetch_subscription_status::{
    FetchSubscriptionStatusHandler, FetchSubscriptionStatusQuery, SubscriptionOverrides,
};
pub use resolve_access::{ResolveAccessHandler, ResolveAccessQuery};
