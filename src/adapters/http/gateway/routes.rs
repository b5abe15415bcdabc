//! Axum router configuration for the gateway endpoints.

use axum::{routing::get, Router};

use super::handlers::{
    auth_redirect, auth_status, get_access, get_subscription_status, health, GatewayAppState,
};

/// Create the gateway router.
///
/// # Routes
///
/// ## Pages
/// - `GET /auth` - Redirect to chat or payment, or explain a missing account
/// - `GET /auth/status` - Decision payload without redirecting
///
/// ## API
/// - `GET /api/access/:lookup_id` - Access ticket
/// - `GET /api/subscription/status` - Subscription status (`?user_id=`)
///
/// ## Operations
/// - `GET /health` - Liveness probe
pub fn gateway_routes() -> Router<GatewayAppState> {
    Router::new()
        // Pages
        .route("/auth", get(auth_redirect))
        .route("/auth/status", get(auth_status))
        // API
        .route("/api/access/:lookup_id", get(get_access))
        .route("/api/subscription/status", get(get_subscription_status))
        // Operations
        .route("/health", get(health))
}

/// The gateway routes with their state applied, ready to serve.
pub fn gateway_router(state: GatewayAppState) -> Router {
    gateway_routes().with_state(state)
}
