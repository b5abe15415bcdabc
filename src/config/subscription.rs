//! Subscription status configuration

use serde::Deserialize;
use url::Url;

use super::error::ValidationError;
use crate::application::handlers::access::SubscriptionOverrides;

/// Remote status endpoint and configured subscribers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionConfig {
    /// Remote billing endpoint queried before the stores
    pub status_endpoint: Option<String>,

    /// Comma-separated ids that are always subscribed
    pub subscribed_user_ids: Option<String>,

    /// Plan name reported for configured subscribers
    pub subscribed_plan_name: Option<String>,

    /// Expiry reported for configured subscribers
    pub subscribed_expires_at: Option<String>,
}

impl SubscriptionConfig {
    /// The configured endpoint, ignoring blanks and the literal `undefined`.
    pub fn status_endpoint(&self) -> Option<&str> {
        self.status_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty() && *endpoint != "undefined")
    }

    /// Overrides for the status service.
    pub fn overrides(&self) -> SubscriptionOverrides {
        SubscriptionOverrides::from_list(self.subscribed_user_ids.as_deref().unwrap_or_default())
            .with_plan_name(self.subscribed_plan_name.clone())
            .with_expires_at(self.subscribed_expires_at.clone())
    }

    /// Validate subscription configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(endpoint) = self.status_endpoint() {
            let url = Url::parse(endpoint).map_err(|_| ValidationError::InvalidStatusEndpoint)?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ValidationError::InvalidStatusEndpoint);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_endpoint_variants() {
        for value in [None, Some(""), Some("  "), Some("undefined")] {
            let config = SubscriptionConfig {
                status_endpoint: value.map(str::to_string),
                ..Default::default()
            };
            assert_eq!(config.status_endpoint(), None);
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_endpoint_must_be_absolute_http() {
        for bad in ["/status", "billing.example/status", "ftp://billing.example/status"] {
            let config = SubscriptionConfig {
                status_endpoint: Some(bad.to_string()),
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidStatusEndpoint), "{bad}");
        }

        let config = SubscriptionConfig {
            status_endpoint: Some(" https://billing.example/status ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.status_endpoint(), Some("https://billing.example/status"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_from_list() {
        let config = SubscriptionConfig {
            subscribed_user_ids: Some("3001, 3002,,".to_string()),
            subscribed_plan_name: Some("staff".to_string()),
            ..Default::default()
        };
        let overrides = config.overrides();
        assert_eq!(overrides.user_ids, vec!["3001", "3002"]);
        assert_eq!(overrides.plan_name.as_deref(), Some("staff"));
        assert_eq!(overrides.expires_at, None);

        assert!(SubscriptionConfig::default().overrides().user_ids.is_empty());
    }
}
