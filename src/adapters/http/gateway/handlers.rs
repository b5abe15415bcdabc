//! HTTP handlers for the gateway endpoints.
//!
//! These handlers connect Axum routes to the access handlers of the
//! application layer.

use std::sync::Arc;

use axum::extract::{Path, Query, RawQuery, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::application::handlers::access::{
    DecideRedirectCommand, DecideRedirectHandler, FetchSubscriptionStatusHandler,
    FetchSubscriptionStatusQuery, ResolveAccessHandler, ResolveAccessQuery, SubscriptionOverrides,
};
use crate::domain::access::{RedirectDecision, DEFAULT_PAYMENT_URL};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{
    SubscriptionDirectory, SubscriptionStatusError, SubscriptionStatusSource, UserDirectory,
};

use super::dto::{AccessStatusResponse, ErrorResponse, SubscriptionStatusParams, MISSING_ACCOUNT_MESSAGE};
use super::identifier::extract_identifier;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Destinations and contact shown by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayLinks {
    pub chat_url: String,
    pub payment_url: String,
    pub support_email: String,
}

impl Default for GatewayLinks {
    fn default() -> Self {
        Self {
            chat_url: "https://app.gtstor.com/chat/".to_string(),
            payment_url: DEFAULT_PAYMENT_URL.to_string(),
            support_email: "help@gtstor.com".to_string(),
        }
    }
}

/// Shared application state containing all dependencies.
///
/// Cloned for each request; dependencies are Arc-wrapped.
#[derive(Clone)]
pub struct GatewayAppState {
    pub user_directory: Arc<dyn UserDirectory>,
    pub subscription_directory: Arc<dyn SubscriptionDirectory>,
    pub status_source: Option<Arc<dyn SubscriptionStatusSource>>,
    pub overrides: SubscriptionOverrides,
    pub links: GatewayLinks,
}

impl GatewayAppState {
    pub fn new(
        user_directory: Arc<dyn UserDirectory>,
        subscription_directory: Arc<dyn SubscriptionDirectory>,
        links: GatewayLinks,
    ) -> Self {
        Self {
            user_directory,
            subscription_directory,
            status_source: None,
            overrides: SubscriptionOverrides::default(),
            links,
        }
    }

    pub fn with_status_source(mut self, source: Arc<dyn SubscriptionStatusSource>) -> Self {
        self.status_source = Some(source);
        self
    }

    pub fn with_overrides(mut self, overrides: SubscriptionOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Create handlers on demand from the shared state.
    pub fn resolve_access_handler(&self) -> ResolveAccessHandler {
        ResolveAccessHandler::new(
            self.user_directory.clone(),
            self.subscription_directory.clone(),
        )
    }

    pub fn decide_redirect_handler(&self) -> DecideRedirectHandler {
        DecideRedirectHandler::new(Arc::new(self.resolve_access_handler()))
    }

    pub fn subscription_status_handler(&self) -> FetchSubscriptionStatusHandler {
        let handler = FetchSubscriptionStatusHandler::new(
            self.user_directory.clone(),
            self.subscription_directory.clone(),
        )
        .with_overrides(self.overrides.clone());

        match &self.status_source {
            Some(source) => handler.with_remote(source.clone()),
            None => handler,
        }
    }

    fn status_response(&self) -> AccessStatusResponse {
        AccessStatusResponse {
            error: None,
            message: None,
            chat_url: self.links.chat_url.clone(),
            payment_url: self.links.payment_url.clone(),
            support_email: self.links.support_email.clone(),
            ticket: None,
            destination: None,
        }
    }

    fn missing_account_response(&self) -> AccessStatusResponse {
        AccessStatusResponse {
            error: Some(MISSING_ACCOUNT_MESSAGE.to_string()),
            ..self.status_response()
        }
    }

    async fn decide(&self, lookup_id: String) -> RedirectDecision {
        let cmd = DecideRedirectCommand {
            lookup_id,
            chat_url: self.links.chat_url.clone(),
            payment_base_url: self.links.payment_url.clone(),
        };
        self.decide_redirect_handler().handle(cmd).await
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Page Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /auth - Redirect to chat or payment
pub async fn auth_redirect(
    State(state): State<GatewayAppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let Some(lookup_id) = extract_identifier(query.as_deref(), &headers) else {
        tracing::debug!("No identifier on auth request");
        return Json(state.missing_account_response()).into_response();
    };

    let decision = state.decide(lookup_id).await;
    temporary_redirect(&decision.destination)
}

/// 307 to `destination`. Destinations that cannot be sent as a header are a server error.
fn temporary_redirect(destination: &str) -> Response {
    match HeaderValue::from_str(destination) {
        Ok(location) => (StatusCode::TEMPORARY_REDIRECT, [(LOCATION, location)]).into_response(),
        Err(e) => {
            tracing::error!("Cannot redirect to {:?}: {}", destination, e);
            let body = ErrorResponse::new(
                ErrorCode::InternalError.to_string(),
                "Redirect destination is not a valid URL",
            );
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

/// GET /auth/status - The decision `/auth` would make, without redirecting
pub async fn auth_status(
    State(state): State<GatewayAppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Json<AccessStatusResponse> {
    let Some(lookup_id) = extract_identifier(query.as_deref(), &headers) else {
        return Json(state.missing_account_response());
    };

    let decision = state.decide(lookup_id).await;
    Json(AccessStatusResponse {
        message: Some(decision.ticket.reason.user_message().to_string()),
        ticket: Some(decision.ticket),
        destination: Some(decision.destination),
        ..state.status_response()
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// API Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/access/:lookup_id - Access ticket for an identifier
pub async fn get_access(
    State(state): State<GatewayAppState>,
    Path(lookup_id): Path<String>,
) -> impl IntoResponse {
    let ticket = state
        .resolve_access_handler()
        .handle(ResolveAccessQuery::new(lookup_id))
        .await;
    Json(ticket)
}

/// GET /api/subscription/status?user_id= - Subscription status for a user
pub async fn get_subscription_status(
    State(state): State<GatewayAppState>,
    Query(params): Query<SubscriptionStatusParams>,
) -> Result<impl IntoResponse, GatewayApiError> {
    let query = FetchSubscriptionStatusQuery {
        user_id: params.user_id.unwrap_or_default(),
    };
    let status = state.subscription_status_handler().handle(query).await?;
    Ok(Json(status))
}

/// GET /health - Liveness probe
pub async fn health() -> &'static str {
    "ok"
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts status errors to HTTP responses.
#[derive(Debug)]
pub struct GatewayApiError(SubscriptionStatusError);

impl From<SubscriptionStatusError> for GatewayApiError {
    fn from(err: SubscriptionStatusError) -> Self {
        Self(err)
    }
}

impl IntoResponse for GatewayApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_upstream() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::BAD_REQUEST
        };

        if status.is_server_error() {
            tracing::error!("Subscription status lookup failed: {}", self.0);
        }

        let err = DomainError::from(self.0);
        let body = ErrorResponse::new(err.code.to_string(), err.message);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::access::test_support::{
        InMemorySubscriptionDirectory, InMemoryUserDirectory,
    };
    use serde_json::json;

    fn test_state() -> GatewayAppState {
        GatewayAppState::new(
            Arc::new(InMemoryUserDirectory::from_document(json!([]))),
            Arc::new(InMemorySubscriptionDirectory::from_document(json!([]))),
            GatewayLinks::default(),
        )
    }

    #[test]
    fn default_links_match_production_pages() {
        let links = GatewayLinks::default();
        assert_eq!(links.chat_url, "https://app.gtstor.com/chat/");
        assert_eq!(links.payment_url, "https://pay.gtstor.com/payment.php");
        assert_eq!(links.support_email, "help@gtstor.com");
    }

    #[test]
    fn missing_account_response_carries_links_and_message() {
        let response = test_state().missing_account_response();
        assert_eq!(response.error.as_deref(), Some(MISSING_ACCOUNT_MESSAGE));
        assert_eq!(response.payment_url, DEFAULT_PAYMENT_URL);
        assert!(response.ticket.is_none());
    }

    #[test]
    fn redirect_sets_location() {
        let response = temporary_redirect("/billing/pay?user_id=a");
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[LOCATION], "/billing/pay?user_id=a");
    }

    #[test]
    fn unsendable_redirect_is_internal_error() {
        let response = temporary_redirect("https://chat.example/\nInjected: 1");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_user_id_maps_to_bad_request() {
        let response = GatewayApiError::from(SubscriptionStatusError::MissingUserId).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_failures_map_to_bad_gateway() {
        for err in [
            SubscriptionStatusError::upstream("503"),
            SubscriptionStatusError::UnrecognizedPayload,
        ] {
            let response = GatewayApiError::from(err).into_response();
            assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        }
    }

    #[tokio::test]
    async fn status_handler_uses_overrides_from_state() {
        let state = test_state().with_overrides(SubscriptionOverrides::from_list("vip"));
        let status = state
            .subscription_status_handler()
            .handle(FetchSubscriptionStatusQuery {
                user_id: "vip".to_string(),
            })
            .await
            .unwrap();
        assert!(status.active);
    }
}
