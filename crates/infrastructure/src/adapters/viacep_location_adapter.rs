//! Location adapter - Implements LocationPort using integration_viacep

use std::sync::Arc;

use application::{ApplicationError, LocationPort, RequestContext};
use async_trait::async_trait;
use domain::{Location, PostalCode};
use integration_viacep::{AddressClient, ViaCepClient, ViaCepConfig, ViaCepError};
use tracing::{debug, info, instrument, warn};

use crate::telemetry::TraceContextCarrier;

const SPAN_NAME: &str = "outgoing request to viacep";

/// Resolves postal codes through ViaCEP
pub struct ViaCepLocationAdapter {
    client: Arc<dyn AddressClient>,
    carrier: Arc<TraceContextCarrier>,
}

impl std::fmt::Debug for ViaCepLocationAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViaCepLocationAdapter")
            .field("client", &"AddressClient")
            .finish_non_exhaustive()
    }
}

impl ViaCepLocationAdapter {
    /// Create an adapter around any directory client
    #[must_use]
    pub fn new(client: Arc<dyn AddressClient>, carrier: Arc<TraceContextCarrier>) -> Self {
        Self { client, carrier }
    }

    /// Create an adapter with a ViaCEP HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn with_config(
        config: ViaCepConfig,
        carrier: Arc<TraceContextCarrier>,
    ) -> Result<Self, ViaCepError> {
        let client = ViaCepClient::new(config)?;
        Ok(Self::new(Arc::new(client), carrier))
    }

    /// Every directory failure is a resolution failure
    fn map_error(err: &ViaCepError) -> ApplicationError {
        ApplicationError::ResolutionFailed(err.to_string())
    }
}

#[async_trait]
impl LocationPort for ViaCepLocationAdapter {
    #[instrument(skip(self, ctx), fields(cep = %postal_code))]
    async fn resolve(
        &self,
        ctx: &RequestContext,
        postal_code: &PostalCode,
    ) -> Result<Location, ApplicationError> {
        let scope = self.carrier.start_client_span(ctx.trace(), SPAN_NAME);
        let headers = self.carrier.headers_for(&scope);

        let city = match self.client.city(postal_code.as_str(), headers).await {
            Ok(city) => city,
            Err(e) => {
                scope.record_error(&e);
                if e.is_not_found() {
                    info!("Postal code unknown to the directory");
                } else {
                    warn!(error = %e, "Postal code resolution failed");
                }
                return Err(Self::map_error(&e));
            },
        };

        let result = Location::new(city).map_err(ApplicationError::from);
        match &result {
            Ok(location) => debug!(city = %location, "Postal code resolved"),
            Err(e) => {
                scope.record_error(e);
                info!("Directory returned no city");
            },
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use integration_viacep::Address;
    use mockall::mock;
    use opentelemetry::trace::Status;
    use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider};
    use reqwest::header::HeaderMap;

    use super::*;
    use crate::telemetry::TRACEPARENT;

    mock! {
        Directory {}

        #[async_trait]
        impl AddressClient for Directory {
            async fn lookup(&self, cep: &str, headers: HeaderMap) -> Result<Address, ViaCepError>;
        }
    }

    fn address(city: &str) -> Address {
        Address {
            cep: Some("01001-000".to_string()),
            localidade: Some(city.to_string()),
            ..Default::default()
        }
    }

    fn adapter(directory: MockDirectory) -> ViaCepLocationAdapter {
        let provider = SdkTracerProvider::builder().build();
        let carrier = TraceContextCarrier::from_provider(&provider, "test");
        ViaCepLocationAdapter::new(Arc::new(directory), Arc::new(carrier))
    }

    #[tokio::test]
    async fn forwards_code_and_trace_headers() {
        let mut directory = MockDirectory::new();
        directory
            .expect_lookup()
            .withf(|cep, headers| cep == "01001000" && headers.contains_key(TRACEPARENT))
            .times(1)
            .returning(|_, _| Ok(address("São Paulo")));

        let code = PostalCode::parse("01001-000").unwrap();
        let location = adapter(directory)
            .resolve(&RequestContext::detached(), &code)
            .await
            .unwrap();

        assert_eq!(location.city(), "São Paulo");
    }

    #[tokio::test]
    async fn blank_city_is_not_a_location() {
        let mut directory = MockDirectory::new();
        directory
            .expect_lookup()
            .times(1)
            .returning(|_, _| Ok(address("  ")));

        let code = PostalCode::parse("01001000").unwrap();
        let err = adapter(directory)
            .resolve(&RequestContext::detached(), &code)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ApplicationError::ResolutionFailed("can not find zipcode".to_string())
        );
    }

    #[tokio::test]
    async fn unknown_code_marks_the_client_span_failed() {
        let exporter = InMemorySpanExporter::default();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let carrier = TraceContextCarrier::from_provider(&provider, "test");
        let mut directory = MockDirectory::new();
        directory
            .expect_lookup()
            .times(1)
            .returning(|_, _| Err(ViaCepError::NotFound));
        let adapter = ViaCepLocationAdapter::new(Arc::new(directory), Arc::new(carrier));

        let code = PostalCode::parse("99999999").unwrap();
        let err = adapter
            .resolve(&RequestContext::detached(), &code)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ApplicationError::ResolutionFailed("can not find zipcode".to_string())
        );
        let spans = exporter.get_finished_spans().unwrap();
        assert_eq!(spans.len(), 1);
        assert!(matches!(spans[0].status, Status::Error { .. }));
    }

    #[test]
    fn not_found_keeps_user_facing_message() {
        let err = ViaCepLocationAdapter::map_error(&ViaCepError::NotFound);
        assert_eq!(
            err,
            ApplicationError::ResolutionFailed("can not find zipcode".to_string())
        );
    }

    #[test]
    fn transport_failure_is_resolution_failure() {
        let err =
            ViaCepLocationAdapter::map_error(&ViaCepError::RequestFailed("timeout".to_string()));
        assert_eq!(err.code(), "resolution_failed");
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn parse_failure_is_resolution_failure() {
        let err = ViaCepLocationAdapter::map_error(&ViaCepError::ParseError("eof".to_string()));
        assert_eq!(err.code(), "resolution_failed");
    }
}
