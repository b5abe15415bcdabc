//! HTTP subscription status source.
//!
//! Queries a billing endpoint with `GET <endpoint>?user_id=<id>` and reads
//! the active flag out of its JSON answer.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::domain::access::{SubscriptionStatus, USER_ID_PARAM};
use crate::ports::{SubscriptionStatusError, SubscriptionStatusSource};

/// Timeout applied to every status request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Status source calling a remote JSON endpoint.
pub struct HttpSubscriptionStatusSource {
    endpoint: Url,
    http_client: reqwest::Client,
}

impl HttpSubscriptionStatusSource {
    /// Creates a source for `endpoint`.
    ///
    /// Returns `None` (after logging a warning) when the endpoint is not an
    /// absolute http(s) URL or the HTTP client cannot be built.
    pub fn from_endpoint(endpoint: &str) -> Option<Self> {
        let endpoint = endpoint.trim();
        let parsed = match Url::parse(endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            Ok(url) => {
                tracing::warn!("Ignoring subscription status endpoint with scheme {}", url.scheme());
                return None;
            }
            Err(e) => {
                tracing::warn!("Ignoring invalid subscription status endpoint {:?}: {}", endpoint, e);
                return None;
            }
        };

        let http_client = match reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build() {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!("Failed to create subscription status HTTP client: {}", e);
                return None;
            }
        };

        Some(Self {
            endpoint: parsed,
            http_client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The request URL for `user_id`. An endpoint that already carries a
    /// `user_id` parameter is used unchanged.
    pub fn request_url(&self, user_id: &str) -> Url {
        let mut url = self.endpoint.clone();
        let has_user_id = url.query_pairs().any(|(key, _)| key == USER_ID_PARAM);
        if !has_user_id {
            url.query_pairs_mut().append_pair(USER_ID_PARAM, user_id);
        }
        url
    }
}

#[async_trait]
impl SubscriptionStatusSource for HttpSubscriptionStatusSource {
    async fn fetch_status(&self, user_id: &str) -> Result<SubscriptionStatus, SubscriptionStatusError> {
        let url = self.request_url(user_id);
        tracing::debug!("Fetching subscription status from {}", url);

        let response = self
            .http_client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Subscription status request failed: {}", e);
                SubscriptionStatusError::upstream(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Subscription status endpoint returned {}", status);
            return Err(SubscriptionStatusError::upstream(status.as_u16().to_string()));
        }

        let payload: Value = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse subscription status payload: {}", e);
            SubscriptionStatusError::upstream(format!("invalid JSON: {}", e))
        })?;

        SubscriptionStatus::from_payload(payload).ok_or(SubscriptionStatusError::UnrecognizedPayload)
    }
}
