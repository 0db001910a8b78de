//! Resolver orchestration
//!
//! Turns a postal code into a temperature report: resolve the city first,
//! then fetch the weather for it. The two lookups are strictly sequential and
//! a failure in either one terminates the request without a partial result.

use std::{fmt, sync::Arc};

use domain::{Credential, PostalCode, TemperatureReport};
use tracing::{debug, info, instrument, warn};

use super::stage::ResolverStage;
use crate::{
    error::ApplicationError,
    ports::{LocationPort, WeatherPort},
    request_context::RequestContext,
};

/// Composes location resolution and weather lookup into one report
#[derive(Clone)]
pub struct ResolverService {
    location: Arc<dyn LocationPort>,
    weather: Arc<dyn WeatherPort>,
}

impl fmt::Debug for ResolverService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverService")
            .field("location", &"<LocationPort>")
            .field("weather", &"<WeatherPort>")
            .finish()
    }
}

impl ResolverService {
    /// Create a new resolver service
    #[must_use]
    pub fn new(location: Arc<dyn LocationPort>, weather: Arc<dyn WeatherPort>) -> Self {
        Self { location, weather }
    }

    /// Handle one lookup request
    ///
    /// The credential is checked before any outbound call is made. The
    /// postal code has already been validated by the gateway but is parsed
    /// again; a malformed one is a resolution failure.
    #[instrument(skip(self, ctx, credential), fields(zip = %zip))]
    pub async fn temperature_for_zip(
        &self,
        ctx: &RequestContext,
        zip: &str,
        credential: Option<&str>,
    ) -> Result<TemperatureReport, ApplicationError> {
        let mut stage = ResolverStage::Received;
        let result = self.run(ctx, zip, credential, &mut stage).await;

        match &result {
            Ok(report) => info!(city = %report.city, temp_c = report.temp_c, "Temperature report assembled"),
            Err(e) if e.is_upstream_failure() => {
                warn!(stage = %stage, code = e.code(), error = %e, "Resolver request failed");
            },
            Err(e) => info!(stage = %stage, code = e.code(), error = %e, "Resolver request rejected"),
        }

        result
    }

    async fn run(
        &self,
        ctx: &RequestContext,
        zip: &str,
        credential: Option<&str>,
        stage: &mut ResolverStage,
    ) -> Result<TemperatureReport, ApplicationError> {
        let credential = Credential::from_header(credential)?;
        let postal_code = PostalCode::parse(zip)
            .map_err(|e| ApplicationError::ResolutionFailed(e.to_string()))?;

        advance(stage, ResolverStage::LocationResolving);
        let location = self.location.resolve(ctx, &postal_code).await?;

        advance(stage, ResolverStage::WeatherFetching);
        let reading = self.weather.current(ctx, &location, &credential).await?;

        advance(stage, ResolverStage::Aggregated);
        Ok(TemperatureReport::new(location, &reading))
    }
}

fn advance(stage: &mut ResolverStage, next: ResolverStage) {
    debug!(from = %stage, to = %next, "Resolver stage transition");
    *stage = next;
}
