//! Metrics handler
//!
//! Request counters kept by the trace context middleware plus lookup
//! outcomes recorded by the lookup handlers, exposed in Prometheus text
//! format.

use std::{
    fmt::Write,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Instant,
};

use application::ApplicationError;
use axum::{extract::State, http::header, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::state::ServiceInfo;

/// Every taxonomy code a lookup can fail with
const FAILURE_CODES: [&str; 6] = [
    "malformed_input",
    "invalid_zipcode",
    "missing_credential",
    "resolution_failed",
    "weather_failed",
    "downstream_unavailable",
];

/// Request statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMetrics {
    /// Total requests received
    pub total_requests: u64,
    /// Successful requests (2xx)
    pub success_count: u64,
    /// Client errors (4xx)
    pub client_error_count: u64,
    /// Server errors (5xx)
    pub server_error_count: u64,
    /// Average response time in milliseconds
    pub avg_response_time_ms: f64,
    /// Current active requests
    pub active_requests: u64,
}

/// Atomic counters for request metrics
#[derive(Debug)]
pub struct MetricsCollector {
    /// Server start time
    start_time: Instant,
    /// Total requests
    total_requests: AtomicU64,
    /// Successful requests
    success_count: AtomicU64,
    /// Client errors
    client_error_count: AtomicU64,
    /// Server errors
    server_error_count: AtomicU64,
    /// Active requests
    active_requests: AtomicU64,
    /// Total response time in microseconds
    total_response_time_us: AtomicU64,
    /// Lookups that produced a report
    lookups_succeeded: AtomicU64,
    /// Failed lookups, indexed like `FAILURE_CODES`
    lookup_failures: [AtomicU64; FAILURE_CODES.len()],
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    /// Create a new metrics collector
    #[must_use]
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            total_requests: AtomicU64::new(0),
            success_count: AtomicU64::new(0),
            client_error_count: AtomicU64::new(0),
            server_error_count: AtomicU64::new(0),
            active_requests: AtomicU64::new(0),
            total_response_time_us: AtomicU64::new(0),
            lookups_succeeded: AtomicU64::new(0),
            lookup_failures: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    /// Record start of a request
    pub fn request_start(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.active_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Record end of a request
    pub fn request_end(&self, response_time_us: u64, status_code: u16) {
        self.active_requests.fetch_sub(1, Ordering::Relaxed);
        self.total_response_time_us
            .fetch_add(response_time_us, Ordering::Relaxed);

        match status_code {
            200..=299 => {
                self.success_count.fetch_add(1, Ordering::Relaxed);
            },
            400..=499 => {
                self.client_error_count.fetch_add(1, Ordering::Relaxed);
            },
            500..=599 => {
                self.server_error_count.fetch_add(1, Ordering::Relaxed);
            },
            _ => {},
        }
    }

    /// Record the outcome of one lookup
    pub fn record_lookup<T>(&self, result: &Result<T, ApplicationError>) {
        match result {
            Ok(_) => {
                self.lookups_succeeded.fetch_add(1, Ordering::Relaxed);
            },
            Err(e) => {
                if let Some(index) = FAILURE_CODES.iter().position(|code| *code == e.code()) {
                    self.lookup_failures[index].fetch_add(1, Ordering::Relaxed);
                }
            },
        }
    }

    /// Get uptime in seconds
    #[must_use]
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Get request metrics
    #[must_use]
    pub fn request_metrics(&self) -> RequestMetrics {
        let total = self.total_requests.load(Ordering::Relaxed);
        let total_time = self.total_response_time_us.load(Ordering::Relaxed);

        RequestMetrics {
            total_requests: total,
            success_count: self.success_count.load(Ordering::Relaxed),
            client_error_count: self.client_error_count.load(Ordering::Relaxed),
            server_error_count: self.server_error_count.load(Ordering::Relaxed),
            #[allow(clippy::cast_precision_loss)]
            avg_response_time_ms: if total > 0 {
                (total_time as f64) / (total as f64) / 1000.0
            } else {
                0.0
            },
            active_requests: self.active_requests.load(Ordering::Relaxed),
        }
    }

    /// Successful lookups so far
    #[must_use]
    pub fn lookups_succeeded(&self) -> u64 {
        self.lookups_succeeded.load(Ordering::Relaxed)
    }

    /// Failed lookups so far for one taxonomy code
    #[must_use]
    pub fn lookup_failures(&self, code: &str) -> u64 {
        FAILURE_CODES
            .iter()
            .position(|known| *known == code)
            .map_or(0, |index| self.lookup_failures[index].load(Ordering::Relaxed))
    }

    /// Render all counters in Prometheus text format
    #[must_use]
    pub fn render_prometheus(&self, service: &str) -> String {
        let requests = self.request_metrics();
        let mut output = String::new();

        let series: [(&str, &str, &str, String); 8] = [
            (
                "app_uptime_seconds",
                "counter",
                "Application uptime in seconds",
                self.uptime_seconds().to_string(),
            ),
            (
                "http_requests_total",
                "counter",
                "Total HTTP requests",
                requests.total_requests.to_string(),
            ),
            (
                "http_requests_success_total",
                "counter",
                "Successful HTTP requests",
                requests.success_count.to_string(),
            ),
            (
                "http_requests_client_error_total",
                "counter",
                "Client error HTTP requests",
                requests.client_error_count.to_string(),
            ),
            (
                "http_requests_server_error_total",
                "counter",
                "Server error HTTP requests",
                requests.server_error_count.to_string(),
            ),
            (
                "http_requests_active",
                "gauge",
                "Current active HTTP requests",
                requests.active_requests.to_string(),
            ),
            (
                "http_response_time_avg_ms",
                "gauge",
                "Average response time in milliseconds",
                format!("{:.2}", requests.avg_response_time_ms),
            ),
            (
                "lookups_success_total",
                "counter",
                "Lookups that produced a temperature report",
                self.lookups_succeeded().to_string(),
            ),
        ];

        for (name, kind, help, value) in series {
            let _ = write!(
                output,
                "# HELP {name} {help}\n# TYPE {name} {kind}\n{name}{{service=\"{service}\"}} {value}\n\n"
            );
        }

        let _ = writeln!(
            output,
            "# HELP lookup_failures_total Failed lookups by error code\n# TYPE lookup_failures_total counter"
        );
        for (index, code) in FAILURE_CODES.iter().enumerate() {
            let _ = writeln!(
                output,
                "lookup_failures_total{{service=\"{service}\",code=\"{code}\"}} {}",
                self.lookup_failures[index].load(Ordering::Relaxed)
            );
        }

        output
    }
}

/// Prometheus-style metrics endpoint
pub async fn get_metrics(
    State(metrics): State<Arc<MetricsCollector>>,
    State(info): State<ServiceInfo>,
) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics.render_prometheus(info.name),
    )
}
