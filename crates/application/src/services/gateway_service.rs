//! Gateway orchestration
//!
//! Validates the caller's postal code and credential, then forwards the
//! request to the resolver service. Nothing is forwarded unless both checks
//! pass.

use std::{fmt, sync::Arc};

use domain::{Credential, PostalCode, TemperatureReport};
use tracing::{debug, info, instrument, warn};

use super::stage::GatewayStage;
use crate::{error::ApplicationError, ports::ResolverPort, request_context::RequestContext};

/// Validates input and forwards it to the resolver service
#[derive(Clone)]
pub struct GatewayService {
    resolver: Arc<dyn ResolverPort>,
}

impl fmt::Debug for GatewayService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayService")
            .field("resolver", &"<ResolverPort>")
            .finish()
    }
}

impl GatewayService {
    /// Create a new gateway service
    #[must_use]
    pub fn new(resolver: Arc<dyn ResolverPort>) -> Self {
        Self { resolver }
    }

    /// Handle one decoded request
    ///
    /// `cep` is the raw value from the request body. The credential is
    /// required before validation runs; an invalid postal code yields
    /// `ApplicationError::InvalidPostalCode`.
    #[instrument(skip(self, ctx, credential), fields(cep = %cep))]
    pub async fn temperature_for_cep(
        &self,
        ctx: &RequestContext,
        cep: &str,
        credential: Option<&str>,
    ) -> Result<TemperatureReport, ApplicationError> {
        let mut stage = GatewayStage::Received;
        let result = self.run(ctx, cep, credential, &mut stage).await;

        match &result {
            Ok(report) => info!(city = %report.city, "Request completed by resolver"),
            Err(e) if e.is_upstream_failure() => {
                warn!(stage = %stage, code = e.code(), error = %e, "Gateway request failed");
            },
            Err(e) => info!(stage = %stage, code = e.code(), error = %e, "Gateway request rejected"),
        }

        result
    }

    async fn run(
        &self,
        ctx: &RequestContext,
        cep: &str,
        credential: Option<&str>,
        stage: &mut GatewayStage,
    ) -> Result<TemperatureReport, ApplicationError> {
        let credential = Credential::from_header(credential)?;
        let postal_code = PostalCode::parse(cep)?;

        advance(stage, GatewayStage::Validated);
        advance(stage, GatewayStage::Forwarding);
        let report = self.resolver.lookup(ctx, &postal_code, &credential).await?;

        advance(stage, GatewayStage::Completed);
        Ok(report)
    }
}

fn advance(stage: &mut GatewayStage, next: GatewayStage) {
    debug!(from = %stage, to = %next, "Gateway stage transition");
    *stage = next;
}
