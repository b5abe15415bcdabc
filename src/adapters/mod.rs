//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the access rules to external systems:
//! - `flatfile` - JSON user and subscription stores on local disk
//! - `subscription_api` - Remote billing endpoint for subscription status
//! - `http` - Axum routes serving redirects and status lookups

pub mod flatfile;
pub mod http;
pub mod subscription_api;

pub use flatfile::{FlatFileSubscriptionStore, FlatFileUserStore, StoreError};
pub use http::{gateway_router, GatewayAppState, GatewayLinks};
pub use subscription_api::HttpSubscriptionStatusSource;
