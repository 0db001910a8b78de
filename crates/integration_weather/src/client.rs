//! WeatherAPI client
//!
//! HTTP client for the WeatherAPI `current.json` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::HeaderMap};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{ApiResponse, CurrentConditions, ErrorEnvelope};

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP client could not be built
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request could not be sent or timed out
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from the provider
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Provider refused the API key (401/403)
    #[error("API key rejected: HTTP {0}")]
    Unauthorized(u16),

    /// Provider answered without a usable temperature
    #[error("Response contained no current temperature")]
    MissingReading,

    /// Provider rejected the request with an error payload
    #[error("{message}")]
    Rejected {
        /// HTTP status
        status: u16,
        /// Provider message
        message: String,
    },

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl WeatherError {
    /// Whether the failure means the caller's key is unusable
    ///
    /// An answer without a reading is treated the same way, since that is
    /// what the provider does for keys it does not accept.
    #[must_use]
    pub const fn is_credential_problem(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::MissingReading)
    }
}

/// Weather service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// WeatherAPI base URL (default: <http://api.weatherapi.com/v1>)
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
    "http://api.weatherapi.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    10
}

const fn default_connect_timeout() -> u64 {
    5
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

/// Weather client trait for fetching current conditions
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Get current conditions for a free-text location query
    ///
    /// `api_key` is sent as the `key` query parameter; `headers` are added
    /// to the request (trace propagation).
    async fn current(
        &self,
        query: &str,
        api_key: &str,
        headers: HeaderMap,
    ) -> Result<CurrentConditions, WeatherError>;
}

/// WeatherAPI HTTP client implementation
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    client: Client,
    config: WeatherConfig,
}

impl WeatherApiClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.without_url().to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, WeatherError> {
        Self::new(WeatherConfig::default())
    }

    fn current_url(&self) -> String {
        format!("{}/current.json", self.config.base_url.trim_end_matches('/'))
    }

    /// Classify a non-success status
    fn status_error(status: StatusCode, body: &[u8]) -> WeatherError {
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return WeatherError::Unauthorized(status.as_u16());
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return WeatherError::RateLimitExceeded;
        }
        if status.is_server_error() {
            return WeatherError::ServiceUnavailable(format!("HTTP {status}"));
        }
        serde_json::from_slice::<ErrorEnvelope>(body).map_or_else(
            |_| WeatherError::RequestFailed(format!("HTTP {status}")),
            |envelope| WeatherError::Rejected {
                status: status.as_u16(),
                message: envelope.error.message,
            },
        )
    }

    fn parse_current(body: &[u8]) -> Result<CurrentConditions, WeatherError> {
        let response: ApiResponse =
            serde_json::from_slice(body).map_err(|e| WeatherError::ParseError(e.to_string()))?;

        response
            .temp_c()
            .map(|temp_c| CurrentConditions { temp_c })
            .ok_or(WeatherError::MissingReading)
    }
}

#[async_trait]
impl WeatherClient for WeatherApiClient {
    #[instrument(skip(self, api_key, headers))]
    async fn current(
        &self,
        query: &str,
        api_key: &str,
        headers: HeaderMap,
    ) -> Result<CurrentConditions, WeatherError> {
        let url = self.current_url();
        debug!(url = %url, "Fetching current weather");

        // The request URL carries the key, so it is stripped from every error

        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("key", api_key)])
            .headers(headers)
            .send()
            .await
            .map_err(|e| WeatherError::RequestFailed(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| WeatherError::RequestFailed(e.without_url().to_string()))?;

        if !status.is_success() {
            return Err(Self::status_error(status, &body));
        }

        Self::parse_current(&body)
    }
}
