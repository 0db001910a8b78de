//! Trace context middleware
//!
//! Extracts the inbound W3C trace context, starts the server span of this
//! hop and hands handlers a `RequestContext` through request extensions.
//! The span is ended once the response head is ready; 4xx and 5xx responses
//! mark it as failed. Request counters are kept alongside.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Instant,
};

use application::RequestContext;
use axum::{body::Body, extract::Request, response::Response};
use infrastructure::TraceContextCarrier;
use tower::{Layer, Service};
use tracing::Instrument;

use crate::handlers::metrics::MetricsCollector;

/// Layer that opens a server span for every request
#[derive(Debug, Clone)]
pub struct TraceContextLayer {
    carrier: Arc<TraceContextCarrier>,
    span_name: &'static str,
    metrics: Arc<MetricsCollector>,
}

impl TraceContextLayer {
    /// Create a new trace context layer
    #[must_use]
    pub fn new(
        carrier: Arc<TraceContextCarrier>,
        span_name: &'static str,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            carrier,
            span_name,
            metrics,
        }
    }
}

impl<S> Layer<S> for TraceContextLayer {
    type Service = TraceContextService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TraceContextService {
            inner,
            carrier: Arc::clone(&self.carrier),
            span_name: self.span_name,
            metrics: Arc::clone(&self.metrics),
        }
    }
}

/// Service that runs each request under its own server span
#[derive(Debug, Clone)]
pub struct TraceContextService<S> {
    inner: S,
    carrier: Arc<TraceContextCarrier>,
    span_name: &'static str,
    metrics: Arc<MetricsCollector>,
}

impl<S> Service<Request<Body>> for TraceContextService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let scope = self
            .carrier
            .start_server_span(self.span_name, request.headers());
        scope.set_attribute("http.method", request.method().to_string());
        scope.set_attribute("http.target", request.uri().path().to_string());

        request
            .extensions_mut()
            .insert(RequestContext::new(scope.context().clone()));

        let span = tracing::info_span!(
            "http_request",
            service = self.span_name,
            trace_id = %scope.trace_id().unwrap_or_default(),
            method = %request.method(),
            uri = %request.uri().path(),
        );

        // Take the service that was driven to readiness
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let metrics = Arc::clone(&self.metrics);

        Box::pin(
            async move {
                metrics.request_start();
                let started = Instant::now();

                let result = inner.call(request).await;

                let status = result
                    .as_ref()
                    .map_or(500, |response| response.status().as_u16());
                scope.set_attribute("http.status_code", i64::from(status));
                if status >= 400 {
                    scope.record_error(&format!("HTTP {status}"));
                }

                let elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
                metrics.request_end(elapsed_us, status);
                tracing::debug!(status, elapsed_us, "Request finished");

                drop(scope);
                result
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        http::{HeaderName, HeaderValue, StatusCode},
        routing::get,
    };
    use axum_test::TestServer;
    use opentelemetry_sdk::trace::SdkTracerProvider;

    use super::*;

    const TRACEPARENT: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";

    async fn echo_trace_id(ctx: Option<axum::Extension<RequestContext>>) -> String {
        ctx.and_then(|axum::Extension(ctx)| ctx.trace_id())
            .unwrap_or_default()
    }

    async fn fail() -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn server(metrics: Arc<MetricsCollector>) -> TestServer {
        let provider = SdkTracerProvider::builder().build();
        let carrier = TraceContextCarrier::from_provider(&provider, "test");
        let layer = TraceContextLayer::new(Arc::new(carrier), "test", metrics);
        let app = Router::new()
            .route("/", get(echo_trace_id))
            .route("/fail", get(fail))
            .layer(layer);
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn inbound_trace_is_continued() {
        let server = server(Arc::new(MetricsCollector::new()));

        let response = server
            .get("/")
            .add_header(
                HeaderName::from_static("traceparent"),
                HeaderValue::from_static(TRACEPARENT),
            )
            .await;

        response.assert_status_ok();
        assert_eq!(response.text(), "4bf92f3577b34da6a3ce929d0e0e4736");
    }

    #[tokio::test]
    async fn request_without_trace_gets_new_root() {
        let server = server(Arc::new(MetricsCollector::new()));

        let response = server.get("/").await;

        assert_eq!(response.text().len(), 32);
        assert_ne!(response.text(), "4bf92f3577b34da6a3ce929d0e0e4736");
    }

    #[tokio::test]
    async fn requests_are_counted() {
        let metrics = Arc::new(MetricsCollector::new());
        let server = server(Arc::clone(&metrics));

        server.get("/").await;
        server.get("/fail").await;

        let counts = metrics.request_metrics();
        assert_eq!(counts.total_requests, 2);
        assert_eq!(counts.success_count, 1);
        assert_eq!(counts.client_error_count, 1);
        assert_eq!(counts.active_requests, 0);
    }
}
