//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the access rules and the stores or services that feed them. Adapters
//! implement these ports.
//!
//! ## Store Ports
//!
//! - `UserDirectory` - User records by primary or linked id
//! - `SubscriptionDirectory` - Subscription records with lookup fallbacks
//!
//! ## Remote Ports
//!
//! - `SubscriptionStatusSource` - External billing status API

mod subscription_directory;
mod subscription_status_source;
mod user_directory;

pub use subscription_directory::SubscriptionDirectory;
pub use subscription_status_source::{SubscriptionStatusError, SubscriptionStatusSource};
pub use user_directory::UserDirectory;
