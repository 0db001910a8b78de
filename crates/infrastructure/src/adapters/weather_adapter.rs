//! Weather adapter - Implements WeatherPort using integration_weather

use std::sync::Arc;

use application::{ApplicationError, RequestContext, WeatherPort};
use async_trait::async_trait;
use domain::{Credential, Location, WeatherReading};
use integration_weather::{WeatherApiClient, WeatherClient, WeatherConfig, WeatherError};
use tracing::{debug, instrument, warn};

use crate::telemetry::TraceContextCarrier;

const SPAN_NAME: &str = "outgoing request to weatherapi";

/// Fetches current temperatures from WeatherAPI
pub struct WeatherApiAdapter {
    client: Arc<dyn WeatherClient>,
    carrier: Arc<TraceContextCarrier>,
}

impl std::fmt::Debug for WeatherApiAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApiAdapter")
            .field("client", &"WeatherClient")
            .finish_non_exhaustive()
    }
}

impl WeatherApiAdapter {
    /// Create an adapter around any weather client
    #[must_use]
    pub fn new(client: Arc<dyn WeatherClient>, carrier: Arc<TraceContextCarrier>) -> Self {
        Self { client, carrier }
    }

    /// Create an adapter with a WeatherAPI HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn with_config(
        config: WeatherConfig,
        carrier: Arc<TraceContextCarrier>,
    ) -> Result<Self, WeatherError> {
        let client = WeatherApiClient::new(config)?;
        Ok(Self::new(Arc::new(client), carrier))
    }

    /// Map integration weather error to application error
    fn map_error(err: &WeatherError) -> ApplicationError {
        if err.is_credential_problem() {
            ApplicationError::InvalidCredential
        } else {
            ApplicationError::WeatherFailed(err.to_string())
        }
    }
}

#[async_trait]
impl WeatherPort for WeatherApiAdapter {
    #[instrument(skip(self, ctx, credential), fields(city = %location))]
    async fn current(
        &self,
        ctx: &RequestContext,
        location: &Location,
        credential: &Credential,
    ) -> Result<WeatherReading, ApplicationError> {
        let scope = self.carrier.start_client_span(ctx.trace(), SPAN_NAME);
        let headers = self.carrier.headers_for(&scope);

        let result = self
            .client
            .current(location.city(), credential.expose(), headers)
            .await
            .map(|conditions| WeatherReading::from_celsius(conditions.temp_c))
            .map_err(|e| Self::map_error(&e));

        match &result {
            Ok(reading) => debug!(celsius = reading.celsius(), "Retrieved current weather"),
            Err(e) => {
                scope.record_error(e);
                warn!(error = %e, "Failed to get current weather");
            },
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_key_is_invalid_credential() {
        assert_eq!(
            WeatherApiAdapter::map_error(&WeatherError::Unauthorized(401)),
            ApplicationError::InvalidCredential
        );
        assert_eq!(
            WeatherApiAdapter::map_error(&WeatherError::Unauthorized(403)),
            ApplicationError::InvalidCredential
        );
    }

    #[test]
    fn missing_reading_is_invalid_credential() {
        let err = WeatherApiAdapter::map_error(&WeatherError::MissingReading);
        assert_eq!(err.to_string(), "error getting weather, invalid API key");
    }

    #[test]
    fn other_failures_are_weather_failures() {
        let err = WeatherApiAdapter::map_error(&WeatherError::Rejected {
            status: 400,
            message: "No matching location found.".to_string(),
        });
        assert_eq!(
            err,
            ApplicationError::WeatherFailed("No matching location found.".to_string())
        );

        let err = WeatherApiAdapter::map_error(&WeatherError::RateLimitExceeded);
        assert_eq!(err.code(), "weather_failed");
        assert_ne!(err, ApplicationError::InvalidCredential);
    }
}
