//! HTTP request handlers

pub mod gateway;
pub mod health;
pub mod metrics;
pub mod resolver;

use application::RequestContext;
use axum::{Extension, http::HeaderMap};
pub use infrastructure::API_KEY_HEADER;

/// Credential header value, if present and valid UTF-8
fn credential(headers: &HeaderMap) -> Option<&str> {
    headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok())
}

/// Request context installed by the trace context middleware
///
/// Handlers mounted without the middleware run detached.
fn request_context(extension: Option<Extension<RequestContext>>) -> RequestContext {
    extension.map(|Extension(ctx)| ctx).unwrap_or_default()
}
