//! Gateway HTTP module.
//!
//! Provides the auth pages and JSON endpoints that route callers to the chat
//! or the payment page.
//!
//! # Module Structure
//!
//! - `dto` - Request/response DTOs
//! - `identifier` - Identifier extraction from query strings and cookies
//! - `handlers` - HTTP handlers and app state
//! - `routes` - Axum router configuration

pub mod dto;
pub mod handlers;
pub mod identifier;
pub mod routes;

pub use handlers::{GatewayApiError, GatewayAppState, GatewayLinks};
pub use routes::{gateway_router, gateway_routes};
