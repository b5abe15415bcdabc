//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ACCESS_GATEWAY` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment yields a runnable gateway.
//!
//! # Example
//!
//! ```no_run
//! use access_gateway::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod error;
mod redirect;
mod server;
mod storage;
mod subscription;

pub use error::{ConfigError, ValidationError};
pub use redirect::RedirectConfig;
pub use server::{LogFormat, ServerConfig};
pub use storage::StorageConfig;
pub use subscription::SubscriptionConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Listener, logging and request timeout
    #[serde(default)]
    pub server: ServerConfig,

    /// User and subscription store files
    #[serde(default)]
    pub storage: StorageConfig,

    /// Chat and payment destinations
    #[serde(default)]
    pub redirect: RedirectConfig,

    /// Remote status endpoint and configured subscribers
    #[serde(default)]
    pub subscription: SubscriptionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ACCESS_GATEWAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    /// 5. Validates every section
    ///
    /// # Environment Variable Format
    ///
    /// - `ACCESS_GATEWAY__SERVER__PORT=3000` -> `server.port = 3000`
    /// - `ACCESS_GATEWAY__REDIRECT__PAYMENT_URL=/billing/pay` -> `redirect.payment_url = ...`
    /// - `ACCESS_GATEWAY__SUBSCRIPTION__SUBSCRIBED_USER_IDS=3001,3002`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadError` if values cannot be parsed into
    /// expected types, `ConfigError::ValidationFailed` if they parse but are
    /// unusable.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config: Self = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ACCESS_GATEWAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.storage.validate()?;
        self.redirect.validate()?;
        self.subscription.validate()?;
        Ok(())
    }
}
