//! ViaCEP HTTP client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header::HeaderMap};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{error::ViaCepError, models::Address};

/// ViaCEP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViaCepConfig {
    /// Directory base URL (default: <http://viacep.com.br>)
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
    "http://viacep.com.br".to_string()
}

const fn default_timeout() -> u64 {
    10
}

const fn default_connect_timeout() -> u64 {
    5
}

impl Default for ViaCepConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

/// Postal code directory lookups
#[async_trait]
pub trait AddressClient: Send + Sync {
    /// Fetch the address record for an 8-digit postal code
    ///
    /// `headers` are sent along with the request (trace propagation).
    async fn lookup(&self, cep: &str, headers: HeaderMap) -> Result<Address, ViaCepError>;

    /// Fetch only the city, failing with `ViaCepError::NotFound` if it is empty
    async fn city(&self, cep: &str, headers: HeaderMap) -> Result<String, ViaCepError> {
        let address = self.lookup(cep, headers).await?;
        address
            .city()
            .map(str::to_owned)
            .ok_or(ViaCepError::NotFound)
    }
}

/// ViaCEP HTTP client implementation
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    client: Client,
    config: ViaCepConfig,
}

impl ViaCepClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: ViaCepConfig) -> Result<Self, ViaCepError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ViaCepError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, ViaCepError> {
        Self::new(ViaCepConfig::default())
    }

    fn lookup_url(&self, cep: &str) -> String {
        format!(
            "{}/ws/{cep}/json/",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl AddressClient for ViaCepClient {
    #[instrument(skip(self, headers))]
    async fn lookup(&self, cep: &str, headers: HeaderMap) -> Result<Address, ViaCepError> {
        let url = self.lookup_url(cep);
        debug!(url = %url, "Querying postal code directory");

        let response = self
            .client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| ViaCepError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ViaCepError::UnexpectedStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ViaCepError::RequestFailed(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| ViaCepError::ParseError(e.to_string()))
    }
}
