//! Remote subscription status port.
//!
//! A status source answers "is this user subscribed?" from a system outside
//! the flat-file stores, typically a billing API.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::access::SubscriptionStatus;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors from the subscription status service and its sources.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubscriptionStatusError {
    /// The caller supplied a blank user id.
    #[error("User id is required to check subscription status")]
    MissingUserId,

    /// The remote source could not be reached or answered with a failure status.
    #[error("Failed to query subscription API: {0}")]
    Upstream(String),

    /// The remote source answered without a recognizable active flag.
    #[error("Subscription API response did not contain a recognizable active flag")]
    UnrecognizedPayload,
}

impl SubscriptionStatusError {
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    /// Returns true if the failure lies outside this service.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            SubscriptionStatusError::Upstream(_) | SubscriptionStatusError::UnrecognizedPayload
        )
    }
}

impl From<SubscriptionStatusError> for DomainError {
    fn from(err: SubscriptionStatusError) -> Self {
        let code = match &err {
            SubscriptionStatusError::MissingUserId => ErrorCode::MissingIdentifier,
            SubscriptionStatusError::Upstream(_) => ErrorCode::UpstreamUnavailable,
            SubscriptionStatusError::UnrecognizedPayload => ErrorCode::UnrecognizedPayload,
        };
        let domain = DomainError::new(code, err.to_string());
        match err {
            SubscriptionStatusError::MissingUserId => domain.with_detail("field", "user_id"),
            _ => domain,
        }
    }
}

/// Fetches a user's subscription status from an external system.
#[async_trait]
pub trait SubscriptionStatusSource: Send + Sync {
    /// Queries the source once for a trimmed, non-empty `user_id`.
    ///
    /// # Returns
    ///
    /// * `Ok(status)` - The source resolved an active flag
    /// * `Err(SubscriptionStatusError::Upstream)` - Transport failure or non-2xx answer
    /// * `Err(SubscriptionStatusError::UnrecognizedPayload)` - No active flag in the answer
    async fn fetch_status(&self, user_id: &str) -> Result<SubscriptionStatus, SubscriptionStatusError>;
}
