//! Remote subscription status adapters.

mod http_status_source;

pub use http_status_source::{HttpSubscriptionStatusSource, REQUEST_TIMEOUT};
