//! HTTP client with trace context propagation
//!
//! Outgoing requests to the peer service are wrapped in a client span and
//! carry the W3C `traceparent`/`tracestate` headers of that span.

mod traced_client;

pub use traced_client::{TracedClientConfig, TracedHttpClient, TracedRequestBuilder};
