//! Telemetry and distributed tracing infrastructure
//!
//! `otel` bootstraps logging and the OpenTelemetry tracer provider,
//! `propagation` carries W3C trace context across HTTP hops.

mod otel;
mod propagation;

pub use otel::{LogFormat, TelemetryConfig, TelemetryError, TelemetryGuard, init_telemetry};
pub use propagation::{TRACEPARENT, TraceContextCarrier, TraceScope};
