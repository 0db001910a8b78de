//! W3C trace context propagation over HTTP headers
//!
//! `TraceContextCarrier` is an explicit handle owning the propagator and the
//! tracer. It is built once per process from the telemetry guard and shared
//! in an `Arc`; nothing here touches OpenTelemetry's global state.
//!
//! Spans are held by `TraceScope`, which ends its span exactly once on drop.
//! Scopes are created and dropped in call-depth order, so a child span always
//! ends before its parent.

use std::{borrow::Cow, fmt};

use opentelemetry::{
    Context, KeyValue, Value,
    propagation::{Extractor, Injector, TextMapPropagator},
    trace::{SpanKind, Status, TraceContextExt, Tracer, TracerProvider as _},
};
use opentelemetry_sdk::{
    propagation::TraceContextPropagator,
    trace::{SdkTracer, SdkTracerProvider},
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// W3C Trace Context header name
pub const TRACEPARENT: &str = "traceparent";

struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}

struct HeaderInjector<'a>(&'a mut HeaderMap);

impl Injector for HeaderInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            self.0.insert(name, value);
        }
    }
}

/// Extracts, starts and injects trace context for one service
pub struct TraceContextCarrier {
    propagator: TraceContextPropagator,
    tracer: SdkTracer,
}

impl fmt::Debug for TraceContextCarrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceContextCarrier")
            .field("propagator", &"W3C TraceContext")
            .finish_non_exhaustive()
    }
}

impl TraceContextCarrier {
    /// Build a carrier whose spans are recorded by `provider`
    #[must_use]
    pub fn from_provider(
        provider: &SdkTracerProvider,
        tracer_name: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            propagator: TraceContextPropagator::new(),
            tracer: provider.tracer(tracer_name),
        }
    }

    /// Read `traceparent`/`tracestate` from inbound headers
    ///
    /// Absent or malformed headers yield an empty context, so the next span
    /// becomes a new root.
    #[must_use]
    pub fn extract(&self, headers: &HeaderMap) -> Context {
        self.propagator
            .extract_with_context(&Context::new(), &HeaderExtractor(headers))
    }

    /// Extract the inbound context and start the server span of this hop
    #[must_use]
    pub fn start_server_span(
        &self,
        name: impl Into<Cow<'static, str>>,
        headers: &HeaderMap,
    ) -> TraceScope {
        let parent = self.extract(headers);
        self.start_span(&parent, name.into(), SpanKind::Server)
    }

    /// Start a child span for an outbound call
    #[must_use]
    pub fn start_client_span(
        &self,
        parent: &Context,
        name: impl Into<Cow<'static, str>>,
    ) -> TraceScope {
        self.start_span(parent, name.into(), SpanKind::Client)
    }

    fn start_span(&self, parent: &Context, name: Cow<'static, str>, kind: SpanKind) -> TraceScope {
        let span = self
            .tracer
            .span_builder(name)
            .with_kind(kind)
            .start_with_context(&self.tracer, parent);

        TraceScope {
            cx: parent.with_span(span),
        }
    }

    /// Write the context's span into outbound headers
    ///
    /// A context without a valid span writes nothing.
    pub fn inject(&self, cx: &Context, headers: &mut HeaderMap) {
        self.propagator
            .inject_context(cx, &mut HeaderInjector(headers));
    }

    /// Fresh header map carrying the scope's span
    #[must_use]
    pub fn headers_for(&self, scope: &TraceScope) -> HeaderMap {
        let mut headers = HeaderMap::new();
        self.inject(scope.context(), &mut headers);
        headers
    }
}

/// A started span together with the context it belongs to
pub struct TraceScope {
    cx: Context,
}

impl fmt::Debug for TraceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceScope")
            .field("trace_id", &self.trace_id())
            .field("span_id", &self.span_id())
            .finish()
    }
}

impl TraceScope {
    /// Context to use as parent for child spans and for injection
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.cx
    }

    /// Mark the span as failed
    pub fn record_error(&self, err: &dyn fmt::Display) {
        self.cx.span().set_status(Status::error(err.to_string()));
    }

    /// Attach an attribute to the span
    pub fn set_attribute(&self, key: &'static str, value: impl Into<Value>) {
        self.cx.span().set_attribute(KeyValue::new(key, value));
    }

    /// Hex trace id, if the span is valid
    #[must_use]
    pub fn trace_id(&self) -> Option<String> {
        let span = self.cx.span();
        let span_context = span.span_context();
        span_context
            .is_valid()
            .then(|| span_context.trace_id().to_string())
    }

    /// Hex span id, if the span is valid
    #[must_use]
    pub fn span_id(&self) -> Option<String> {
        let span = self.cx.span();
        let span_context = span.span_context();
        span_context
            .is_valid()
            .then(|| span_context.span_id().to_string())
    }
}

impl Drop for TraceScope {
    fn drop(&mut self) {
        self.cx.span().end();
    }
}

#[cfg(test)]
mod tests {
    use opentelemetry::trace::{SpanId, TraceId};
    use opentelemetry_sdk::trace::InMemorySpanExporter;

    use super::*;

    const INCOMING: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";

    fn recording_carrier() -> (TraceContextCarrier, InMemorySpanExporter) {
        let exporter = InMemorySpanExporter::default();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        (TraceContextCarrier::from_provider(&provider, "test"), exporter)
    }

    fn incoming_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(TRACEPARENT, HeaderValue::from_static(INCOMING));
        headers
    }

    #[test]
    fn extract_reads_remote_span_context() {
        let (carrier, _) = recording_carrier();
        let cx = carrier.extract(&incoming_headers());
        let span = cx.span();
        let span_context = span.span_context();

        assert!(span_context.is_remote());
        assert_eq!(
            span_context.trace_id(),
            TraceId::from_hex("4bf92f3577b34da6a3ce929d0e0e4736").unwrap()
        );
        assert_eq!(
            span_context.span_id(),
            SpanId::from_hex("00f067aa0ba902b7").unwrap()
        );
    }

    #[test]
    fn missing_or_malformed_header_extracts_nothing() {
        let (carrier, _) = recording_carrier();
        assert!(!carrier.extract(&HeaderMap::new()).has_active_span());

        let mut headers = HeaderMap::new();
        headers.insert(TRACEPARENT, HeaderValue::from_static("garbage"));
        assert!(!carrier.extract(&headers).has_active_span());
    }

    #[test]
    fn server_span_continues_incoming_trace() {
        let (carrier, exporter) = recording_carrier();

        let scope = carrier.start_server_span("resolver", &incoming_headers());
        assert_eq!(
            scope.trace_id().as_deref(),
            Some("4bf92f3577b34da6a3ce929d0e0e4736")
        );
        drop(scope);

        let spans = exporter.get_finished_spans().unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].name, "resolver");
        assert_eq!(spans[0].span_kind, SpanKind::Server);
        assert_eq!(
            spans[0].parent_span_id,
            SpanId::from_hex("00f067aa0ba902b7").unwrap()
        );
    }

    #[test]
    fn server_span_without_headers_is_a_new_root() {
        let (carrier, exporter) = recording_carrier();

        let scope = carrier.start_server_span("gateway", &HeaderMap::new());
        assert!(scope.trace_id().is_some());
        drop(scope);

        let spans = exporter.get_finished_spans().unwrap();
        assert_eq!(spans[0].parent_span_id, SpanId::INVALID);
    }

    #[test]
    fn injected_context_round_trips_through_headers() {
        let (carrier, _) = recording_carrier();

        let server = carrier.start_server_span("gateway", &HeaderMap::new());
        let client = carrier.start_client_span(server.context(), "outgoing request to resolver");
        let headers = carrier.headers_for(&client);

        let extracted = carrier.extract(&headers);
        let remote = extracted.span();
        let remote = remote.span_context();

        assert_eq!(Some(remote.trace_id().to_string()), server.trace_id());
        assert_eq!(Some(remote.span_id().to_string()), client.span_id());
        assert_ne!(client.span_id(), server.span_id());
    }

    #[test]
    fn children_end_before_parents() {
        let (carrier, exporter) = recording_carrier();

        {
            let server = carrier.start_server_span("resolver", &incoming_headers());
            let first = carrier.start_client_span(server.context(), "outgoing request to viacep");
            drop(first);
            let second =
                carrier.start_client_span(server.context(), "outgoing request to weatherapi");
            drop(second);
        }

        let spans = exporter.get_finished_spans().unwrap();
        let names: Vec<&str> = spans.iter().map(|s| s.name.as_ref()).collect();
        assert_eq!(
            names,
            [
                "outgoing request to viacep",
                "outgoing request to weatherapi",
                "resolver"
            ]
        );
        let server_id = spans[2].span_context.span_id();
        assert_eq!(spans[0].parent_span_id, server_id);
        assert_eq!(spans[1].parent_span_id, server_id);
        assert_eq!(spans[0].span_kind, SpanKind::Client);
    }

    #[test]
    fn recorded_error_sets_span_status() {
        let (carrier, exporter) = recording_carrier();

        let scope = carrier.start_client_span(&Context::new(), "outgoing request to viacep");
        scope.record_error(&"can not find zipcode");
        drop(scope);

        let spans = exporter.get_finished_spans().unwrap();
        assert!(matches!(spans[0].status, Status::Error { .. }));
    }

    #[test]
    fn span_is_exported_once() {
        let (carrier, exporter) = recording_carrier();

        let scope = carrier.start_server_span("gateway", &HeaderMap::new());
        scope.set_attribute("http.method", "POST");
        drop(scope);

        assert_eq!(exporter.get_finished_spans().unwrap().len(), 1);
    }

    #[test]
    fn empty_context_injects_nothing() {
        let (carrier, _) = recording_carrier();
        let mut headers = HeaderMap::new();
        carrier.inject(&Context::new(), &mut headers);
        assert!(headers.get(TRACEPARENT).is_none());
    }
}
