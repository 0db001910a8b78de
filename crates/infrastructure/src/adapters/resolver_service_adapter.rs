//! Resolver service adapter - Implements ResolverPort over HTTP
//!
//! Forwards a validated postal code to the peer resolver service and maps
//! its answer back into the error taxonomy. A transport failure always wins
//! over whatever the body would have said.

use std::sync::Arc;

use application::{ApplicationError, RequestContext, ResolverPort};
use async_trait::async_trait;
use domain::{Credential, PostalCode, TemperatureReport};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{
    config::ResolverClientConfig,
    http::{TracedClientConfig, TracedHttpClient},
    telemetry::TraceContextCarrier,
};

const SPAN_NAME: &str = "outgoing request to resolver";

/// Header carrying the caller's credential between services
pub const API_KEY_HEADER: &str = "api_key";

/// Error body returned by the resolver service
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    code: String,
}

/// Talks to the resolver service on behalf of the gateway
#[derive(Debug, Clone)]
pub struct ResolverServiceAdapter {
    client: TracedHttpClient,
    endpoint: String,
}

impl ResolverServiceAdapter {
    /// Create an adapter for the configured resolver
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(
        config: &ResolverClientConfig,
        carrier: Arc<TraceContextCarrier>,
    ) -> Result<Self, reqwest::Error> {
        let client_config = TracedClientConfig::default()
            .with_timeout(config.timeout())
            .with_connect_timeout(config.connect_timeout());
        let client = TracedHttpClient::with_config(carrier, &client_config)?;

        Ok(Self {
            client,
            endpoint: format!("{}/", config.base_url.trim_end_matches('/')),
        })
    }

    /// Rebuild the downstream error from a non-success answer
    fn map_error_response(status: StatusCode, body: &[u8]) -> ApplicationError {
        serde_json::from_slice::<ErrorBody>(body).map_or_else(
            |_| ApplicationError::DownstreamUnavailable(format!("resolver answered HTTP {status}")),
            |body| ApplicationError::from_code(&body.code, body.error),
        )
    }

    fn decode_report(body: &[u8]) -> Result<TemperatureReport, ApplicationError> {
        serde_json::from_slice(body).map_err(|e| {
            ApplicationError::DownstreamUnavailable(format!("undecodable resolver response: {e}"))
        })
    }
}

#[async_trait]
impl ResolverPort for ResolverServiceAdapter {
    #[instrument(skip(self, ctx, credential), fields(zip = %postal_code))]
    async fn lookup(
        &self,
        ctx: &RequestContext,
        postal_code: &PostalCode,
        credential: &Credential,
    ) -> Result<TemperatureReport, ApplicationError> {
        let response = self
            .client
            .get(&self.endpoint)
            .in_context(ctx)
            .span_name(SPAN_NAME)
            .query(&[("zip", postal_code.as_str())])
            .header(API_KEY_HEADER, credential.expose())
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Resolver unreachable");
                ApplicationError::DownstreamUnavailable(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApplicationError::DownstreamUnavailable(e.to_string()))?;

        if status.is_success() {
            let report = Self::decode_report(&body)?;
            debug!(city = %report.city, "Resolver answered");
            Ok(report)
        } else {
            let err = Self::map_error_response(status, &body);
            debug!(status = %status, code = err.code(), "Resolver rejected request");
            Err(err)
        }
    }
}
