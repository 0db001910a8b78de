//! Infrastructure layer - Adapters for external systems
//!
//! Implements the ports defined in the application layer on top of the
//! ViaCEP and WeatherAPI clients and the peer resolver service. Also owns
//! configuration loading and the OpenTelemetry pipeline, including the
//! explicit trace context carrier used on every hop.

pub mod adapters;
pub mod config;
pub mod http;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, ResolverClientConfig, ServerConfig};
pub use http::{TracedClientConfig, TracedHttpClient, TracedRequestBuilder};
pub use telemetry::{
    LogFormat, TRACEPARENT, TelemetryConfig, TelemetryError, TelemetryGuard, TraceContextCarrier,
    TraceScope, init_telemetry,
};
