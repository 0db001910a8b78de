//! HTTP client that opens a client span per request
//!
//! Wraps `reqwest::Client`. Each request built from it is sent under a child
//! span of the caller's `RequestContext`, with that span injected into the
//! request headers.
//!
//! # Examples
//!
//! ```ignore
//! use infrastructure::http::TracedHttpClient;
//!
//! let client = TracedHttpClient::new(carrier)?;
//! let response = client
//!     .get("http://service-b:8081/")
//!     .in_context(&ctx)
//!     .span_name("outgoing request to resolver")
//!     .query(&[("zip", "01001000")])
//!     .send()
//!     .await?;
//! ```

use std::{borrow::Cow, sync::Arc, time::Duration};

use application::RequestContext;
use opentelemetry::Context;
use reqwest::{
    Client, RequestBuilder, Response,
    header::{HeaderName, HeaderValue},
};
use tracing::{debug, instrument};

use crate::telemetry::TraceContextCarrier;

/// Configuration for the traced HTTP client
#[derive(Debug, Clone)]
pub struct TracedClientConfig {
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for TracedClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(10),
            user_agent: format!("cep-weather/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl TracedClientConfig {
    /// Set the request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// HTTP client whose requests are traced and propagate trace context
#[derive(Debug, Clone)]
pub struct TracedHttpClient {
    inner: Client,
    carrier: Arc<TraceContextCarrier>,
}

impl TracedHttpClient {
    /// Create a new client with custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client cannot be built.
    pub fn with_config(
        carrier: Arc<TraceContextCarrier>,
        config: &TracedClientConfig,
    ) -> Result<Self, reqwest::Error> {
        let inner = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { inner, carrier })
    }

    /// Start a GET request
    pub fn get(&self, url: impl AsRef<str>) -> TracedRequestBuilder {
        TracedRequestBuilder {
            inner: self.inner.get(url.as_ref()),
            carrier: Arc::clone(&self.carrier),
            parent: Context::new(),
            span_name: Cow::Borrowed("outgoing request"),
        }
    }
}

/// A request builder that sends under a client span
pub struct TracedRequestBuilder {
    inner: RequestBuilder,
    carrier: Arc<TraceContextCarrier>,
    parent: Context,
    span_name: Cow<'static, str>,
}

impl std::fmt::Debug for TracedRequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TracedRequestBuilder")
            .field("span_name", &self.span_name)
            // RequestBuilder doesn't implement Debug, so we skip it
            .finish_non_exhaustive()
    }
}

impl TracedRequestBuilder {
    /// Parent the client span under the request's trace context
    #[must_use]
    pub fn in_context(mut self, ctx: &RequestContext) -> Self {
        self.parent = ctx.trace().clone();
        self
    }

    /// Name of the client span
    #[must_use]
    pub fn span_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.span_name = name.into();
        self
    }

    /// Add a header to the request
    ///
    /// Invalid names or values are skipped.
    #[must_use]
    pub fn header(
        mut self,
        name: impl TryInto<HeaderName>,
        value: impl TryInto<HeaderValue>,
    ) -> Self {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.inner = self.inner.header(name, value);
        }
        self
    }

    /// Set a query string
    #[must_use]
    pub fn query<T: serde::Serialize + ?Sized>(mut self, query: &T) -> Self {
        self.inner = self.inner.query(query);
        self
    }

    /// Send the request
    ///
    /// The client span ends once the response head has arrived or the
    /// request failed; transport errors and non-success statuses mark it as
    /// failed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(span_name = %self.span_name))]
    pub async fn send(self) -> Result<Response, reqwest::Error> {
        let scope = self.carrier.start_client_span(&self.parent, self.span_name);
        let headers = self.carrier.headers_for(&scope);
        debug!(trace_id = ?scope.trace_id(), "Sending traced HTTP request");

        let result = self.inner.headers(headers).send().await;

        match &result {
            Ok(response) => {
                scope.set_attribute("http.status_code", i64::from(response.status().as_u16()));
                if !response.status().is_success() {
                    scope.record_error(&response.status());
                }
            },
            Err(e) => scope.record_error(e),
        }

        result
    }
}
