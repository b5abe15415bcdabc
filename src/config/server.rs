//! Listener, logging and request limits for the gateway process.

use std::net::{IpAddr, SocketAddr};

use serde::Deserialize;

use super::error::ValidationError;

/// Longest request timeout accepted, in seconds.
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// How the gateway listens and logs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// IP address to bind, e.g. `0.0.0.0` or `::1`
    pub host: String,
    pub port: u16,
    /// `tracing` filter directive, overridden by `RUST_LOG` when set
    pub log_level: String,
    pub log_format: LogFormat,
    /// Upper bound on a single request, redirects included
    pub request_timeout_secs: u64,
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines for local runs
    #[default]
    Pretty,
    /// One JSON object per event, for log shipping
    Json,
}

impl ServerConfig {
    /// The address the listener binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let ip: IpAddr = self
            .host
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidBindAddress(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn json_logs(&self) -> bool {
        self.log_format == LogFormat::Json
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        self.socket_addr().map(|_| ())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info,access_gateway=debug".to_string(),
            log_format: LogFormat::Pretty,
            request_timeout_secs: 30,
        }
    }
}
