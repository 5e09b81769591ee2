//! Configuration options for the content client

use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable holding the site base URL
pub const ENV_API_URL: &str = "WAMAN_API_URL";

/// Environment variable overriding the request timeout, in seconds
pub const ENV_REQUEST_TIMEOUT: &str = "WAMAN_REQUEST_TIMEOUT_SECS";

/// Configuration options for the content client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Upper bound on any single gateway call
    pub request_timeout: Duration,

    /// Path prefix of the admin CRUD endpoints
    pub admin_prefix: String,

    /// Value sent in the `X-Client-Info` header
    pub client_info: String,

    /// Buffered notifications per change-bus subscriber
    pub change_bus_capacity: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            admin_prefix: "api/admin".to_string(),
            client_info: concat!("waman-content/", env!("CARGO_PKG_VERSION")).to_string(),
            change_bus_capacity: 64,
        }
    }
}

impl ClientOptions {
    /// Build options from the environment, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();
        if let Ok(raw) = std::env::var(ENV_REQUEST_TIMEOUT) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::config(format!(
                    "{} must be a whole number of seconds, got {:?}",
                    ENV_REQUEST_TIMEOUT, raw
                ))
            })?;
            if secs == 0 {
                return Err(Error::config(format!(
                    "{} must be greater than zero",
                    ENV_REQUEST_TIMEOUT
                )));
            }
            options.request_timeout = Duration::from_secs(secs);
        }
        Ok(options)
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Duration) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the admin endpoint prefix
    pub fn with_admin_prefix(mut self, value: &str) -> Self {
        self.admin_prefix = value.trim_matches('/').to_string();
        self
    }

    /// Set the client info header value
    pub fn with_client_info(mut self, value: &str) -> Self {
        self.client_info = value.to_string();
        self
    }

    /// Set the change bus capacity
    pub fn with_change_bus_capacity(mut self, value: usize) -> Self {
        self.change_bus_capacity = value.max(1);
        self
    }
}
