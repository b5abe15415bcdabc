//! HTTP DTOs for the gateway endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::access::AccessTicket;

/// Shown when no identifier could be found on the request.
pub const MISSING_ACCOUNT_MESSAGE: &str =
    "We could not determine your account. Please return to the login page and try again.";

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Query parameters of `GET /api/subscription/status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionStatusParams {
    #[serde(default)]
    pub user_id: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Status payload of the auth pages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessStatusResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Why access was granted or denied, once an identifier was resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub chat_url: String,
    pub payment_url: String,
    pub support_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<AccessTicket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

/// Error body returned by JSON endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_response_omits_absent_fields() {
        let response = AccessStatusResponse {
            error: Some(MISSING_ACCOUNT_MESSAGE.to_string()),
            message: None,
            chat_url: "https://chat".to_string(),
            payment_url: "https://pay".to_string(),
            support_email: "help@example.com".to_string(),
            ticket: None,
            destination: None,
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "error": MISSING_ACCOUNT_MESSAGE,
                "chatUrl": "https://chat",
                "paymentUrl": "https://pay",
                "supportEmail": "help@example.com"
            })
        );
    }

    #[test]
    fn error_response_serializes_code_and_message() {
        let body = serde_json::to_value(ErrorResponse::new("MISSING_IDENTIFIER", "nope")).unwrap();
        assert_eq!(body, json!({"code": "MISSING_IDENTIFIER", "message": "nope"}));
    }

    #[test]
    fn status_params_tolerate_missing_user_id() {
        let params: SubscriptionStatusParams = serde_json::from_value(json!({})).unwrap();
        assert!(params.user_id.is_none());
    }
}
