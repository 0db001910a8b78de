//! HTTP server configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Grace period for in-flight requests on shutdown, in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Maximum request body size in bytes (default: 64KB)
    #[serde(default = "default_max_body")]
    pub max_body_bytes: usize,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

const fn default_shutdown_timeout() -> u64 {
    10
}

const fn default_max_body() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            max_body_bytes: default_max_body(),
        }
    }
}

impl ServerConfig {
    /// Shutdown grace period
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// Turn a Go-style `":8080"` (or bare `"8080"`) into a bindable address
#[must_use]
pub fn normalize_listen_addr(raw: &str) -> String {
    let raw = raw.trim();
    if let Some(port) = raw.strip_prefix(':') {
        return format!("0.0.0.0:{port}");
    }
    if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) {
        return format!("0.0.0.0:{raw}");
    }
    raw.to_string()
}
