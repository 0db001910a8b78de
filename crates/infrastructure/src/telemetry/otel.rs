//! OpenTelemetry initialization and configuration
//!
//! Installs the `tracing` subscriber and builds the tracer provider that
//! backs the trace context carrier. Spans are exported over OTLP/gRPC when a
//! collector endpoint is configured. Without one (or when the exporter cannot
//! be built and graceful fallback is on) the provider still creates valid
//! spans, so trace context keeps flowing between services.

use std::time::Duration;

use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    trace::{Sampler, SdkTracerProvider, TracerProviderBuilder},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use super::propagation::TraceContextCarrier;

/// Console log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Configuration for logging and trace export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Whether spans are exported to a collector
    #[serde(default)]
    pub enabled: bool,

    /// OTLP gRPC endpoint (e.g. "otel-collector:4317" or "http://localhost:4317")
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Service name reported on the resource; each binary supplies its own
    /// when this is unset
    #[serde(default)]
    pub service_name: Option<String>,

    /// Export timeout in seconds
    #[serde(default = "default_export_timeout")]
    pub export_timeout_secs: u64,

    /// Log level filter, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Console log output format
    #[serde(default)]
    pub log_format: LogFormat,

    /// Whether to continue without export if the exporter cannot be built
    ///
    /// When `false`, startup fails instead.
    #[serde(default = "default_graceful_fallback")]
    pub graceful_fallback: bool,
}

fn default_endpoint() -> String {
    "http://localhost:4317".to_string()
}

const fn default_export_timeout() -> u64 {
    1
}

fn default_log_filter() -> String {
    "info,tower_http=info".to_string()
}

const fn default_graceful_fallback() -> bool {
    true
}

const FALLBACK_SERVICE_NAME: &str = "cep-weather";

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_endpoint(),
            service_name: None,
            export_timeout_secs: default_export_timeout(),
            log_filter: default_log_filter(),
            log_format: LogFormat::default(),
            graceful_fallback: default_graceful_fallback(),
        }
    }
}

impl TelemetryConfig {
    /// Use `name` as service name unless one was configured
    #[must_use]
    pub fn with_default_service_name(mut self, name: &str) -> Self {
        self.service_name.get_or_insert_with(|| name.to_string());
        self
    }

    /// Effective service name
    #[must_use]
    pub fn service_name(&self) -> &str {
        self.service_name.as_deref().unwrap_or(FALLBACK_SERVICE_NAME)
    }

    /// Collector endpoint with a scheme, as tonic requires one
    #[must_use]
    pub fn collector_endpoint(&self) -> String {
        if self.endpoint.contains("://") {
            self.endpoint.clone()
        } else {
            format!("http://{}", self.endpoint)
        }
    }
}

/// Owns the tracer provider; flushes and shuts it down when dropped
pub struct TelemetryGuard {
    provider: SdkTracerProvider,
    service_name: String,
    exporting: bool,
}

impl std::fmt::Debug for TelemetryGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryGuard")
            .field("service_name", &self.service_name)
            .field("exporting", &self.exporting)
            .finish_non_exhaustive()
    }
}

impl TelemetryGuard {
    /// Provider without exporter and without touching the global subscriber
    ///
    /// Spans are created and propagated but never leave the process.
    #[must_use]
    pub fn local(service_name: &str) -> Self {
        Self {
            provider: provider_builder(service_name).build(),
            service_name: service_name.to_string(),
            exporting: false,
        }
    }

    /// Trace context carrier backed by this provider
    #[must_use]
    pub fn carrier(&self) -> TraceContextCarrier {
        TraceContextCarrier::from_provider(&self.provider, self.service_name.clone())
    }

    /// Whether spans are exported to a collector
    #[must_use]
    pub const fn is_exporting(&self) -> bool {
        self.exporting
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Err(e) = self.provider.shutdown() {
            tracing::error!("Failed to shutdown tracer provider: {:?}", e);
        }
    }
}

fn provider_builder(service_name: &str) -> TracerProviderBuilder {
    let resource = Resource::builder()
        .with_service_name(service_name.to_string())
        .build();

    SdkTracerProvider::builder()
        .with_sampler(Sampler::AlwaysOn)
        .with_resource(resource)
}

fn install_subscriber(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let (text_layer, json_layer) = match config.log_format {
        LogFormat::Text => (
            Some(tracing_subscriber::fmt::layer().with_target(true)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(text_layer)
        .with(json_layer)
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))
}

/// Initialize logging and the tracer provider
///
/// Returns a guard that must be kept alive for the duration of the
/// application. When the guard is dropped, pending spans are flushed.
///
/// # Example
///
/// ```ignore
/// use infrastructure::telemetry::{TelemetryConfig, init_telemetry};
///
/// let config = TelemetryConfig {
///     enabled: true,
///     endpoint: "otel-collector:4317".to_string(),
///     ..Default::default()
/// }
/// .with_default_service_name("gateway");
///
/// let guard = init_telemetry(&config)?;
/// let carrier = guard.carrier();
/// ```
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    install_subscriber(config)?;

    let service_name = config.service_name().to_string();

    if !config.enabled {
        info!(service = %service_name, "Telemetry initialized (OTLP disabled, propagation only)");
        return Ok(TelemetryGuard::local(&service_name));
    }

    let endpoint = config.collector_endpoint();
    let exporter_result = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint.clone())
        .with_timeout(Duration::from_secs(config.export_timeout_secs))
        .build();

    match exporter_result {
        Ok(exporter) => {
            let provider = provider_builder(&service_name)
                .with_batch_exporter(exporter)
                .build();

            info!(
                endpoint = %endpoint,
                service = %service_name,
                "Telemetry initialized with OTLP export"
            );

            Ok(TelemetryGuard {
                provider,
                service_name,
                exporting: true,
            })
        },
        Err(e) if config.graceful_fallback => {
            warn!(
                endpoint = %endpoint,
                error = %e,
                "OTLP exporter unavailable, continuing without span export"
            );
            Ok(TelemetryGuard::local(&service_name))
        },
        Err(e) => Err(TelemetryError::Exporter(e.to_string())),
    }
}

/// Error type for telemetry initialization
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to initialize tracing subscriber
    #[error("Failed to initialize tracing: {0}")]
    Init(String),

    /// Failed to create OTLP exporter
    #[error("Failed to create OTLP exporter: {0}")]
    Exporter(String),
}
