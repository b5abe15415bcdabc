//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod access;

pub use access::{
    DecideRedirectCommand, DecideRedirectHandler, FetchSubscriptionStatusHandler,
    FetchSubscriptionStatusQuery, ResolveAccessHandler, ResolveAccessQuery, SubscriptionOverrides,
};
