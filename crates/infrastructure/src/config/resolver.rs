//! Peer resolver service configuration (used by the gateway).

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where and how the gateway reaches the resolver service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverClientConfig {
    /// Resolver base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds (default: 5)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://service-b:8081".to_string()
}

const fn default_timeout() -> u64 {
    10
}

const fn default_connect_timeout() -> u64 {
    5
}

impl Default for ResolverClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl ResolverClientConfig {
    /// Request timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connect timeout
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
