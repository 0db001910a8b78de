//! Request context carrying the active trace context
//!
//! A `RequestContext` is created by the HTTP middleware once the inbound
//! trace context has been extracted and the server span started. It is passed
//! by reference through the orchestrators into every port call, so adapters
//! can open child spans and inject the context into outbound requests.
//!
//! # Examples
//!
//! ```
//! use application::RequestContext;
//!
//! // Outside of a traced request (e.g. in tests) a detached context is used
//! let ctx = RequestContext::detached();
//! assert!(ctx.trace_id().is_none());
//! ```

use opentelemetry::{Context, trace::TraceContextExt};

/// Per-request context, never shared between requests
#[derive(Debug, Clone)]
pub struct RequestContext {
    trace: Context,
}

impl RequestContext {
    /// Wrap the trace context of the current unit of work
    #[must_use]
    pub const fn new(trace: Context) -> Self {
        Self { trace }
    }

    /// Context with no active span
    #[must_use]
    pub fn detached() -> Self {
        Self::new(Context::new())
    }

    /// The trace context to use as parent for child spans
    #[must_use]
    pub const fn trace(&self) -> &Context {
        &self.trace
    }

    /// Hex trace id of the active span, if one is recording
    #[must_use]
    pub fn trace_id(&self) -> Option<String> {
        let span = self.trace.span();
        let span_context = span.span_context();
        span_context
            .is_valid()
            .then(|| span_context.trace_id().to_string())
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::detached()
    }
}
