//! Redirect destination configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::adapters::http::GatewayLinks;

/// Where callers are sent, and who they can contact
#[derive(Debug, Clone, Deserialize)]
pub struct RedirectConfig {
    /// Chat destination for callers with access, sent verbatim as `Location`
    #[serde(default = "default_chat_url")]
    pub chat_url: String,

    /// Payment page base for callers without access.
    /// May be absolute or relative; blank falls back to the default payment page.
    #[serde(default = "default_payment_url")]
    pub payment_url: String,

    /// Support contact shown on the status page
    #[serde(default = "default_support_email")]
    pub support_email: String,
}

impl RedirectConfig {
    /// Validate redirect configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.chat_url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("redirect.chat_url"));
        }
        if !is_header_safe(&self.chat_url) {
            return Err(ValidationError::InvalidChatUrl);
        }
        if !is_plausible_email(&self.support_email) {
            return Err(ValidationError::InvalidSupportEmail);
        }
        Ok(())
    }

    /// Links handed to the HTTP layer
    pub fn links(&self) -> GatewayLinks {
        GatewayLinks {
            chat_url: self.chat_url.clone(),
            payment_url: self.payment_url.clone(),
            support_email: self.support_email.trim().to_string(),
        }
    }
}

/// Printable ASCII without spaces; anything else cannot go out in a `Location` header.
fn is_header_safe(url: &str) -> bool {
    url.bytes().all(|b| b.is_ascii_graphic())
}

fn is_plausible_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    }
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            chat_url: default_chat_url(),
            payment_url: default_payment_url(),
            support_email: default_support_email(),
        }
    }
}

fn default_chat_url() -> String {
    "https://app.gtstor.com/chat/".to_string()
}

fn default_payment_url() -> String {
    crate::domain::access::DEFAULT_PAYMENT_URL.to_string()
}

fn default_support_email() -> String {
    "help@gtstor.com".to_string()
}
