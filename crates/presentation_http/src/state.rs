//! Application state shared across handlers

use std::sync::Arc;

use application::{GatewayService, ResolverService};
use axum::extract::FromRef;

use crate::handlers::metrics::MetricsCollector;

/// Identity of the running service, reported by `/health` and `/metrics`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceInfo {
    /// Service name, also used for the server span
    pub name: &'static str,
}

impl ServiceInfo {
    /// The public entry point
    pub const GATEWAY: Self = Self { name: "gateway" };
    /// The postal code resolver
    pub const RESOLVER: Self = Self { name: "resolver" };
}

/// State of the gateway service
#[derive(Debug, Clone)]
pub struct GatewayState {
    /// Validates and forwards requests
    pub service: Arc<GatewayService>,
    /// Request and lookup counters
    pub metrics: Arc<MetricsCollector>,
}

impl GatewayState {
    /// Wrap a gateway service with fresh metrics
    #[must_use]
    pub fn new(service: GatewayService) -> Self {
        Self {
            service: Arc::new(service),
            metrics: Arc::new(MetricsCollector::new()),
        }
    }
}

/// State of the resolver service
#[derive(Debug, Clone)]
pub struct ResolverState {
    /// Resolves postal codes and fetches weather
    pub service: Arc<ResolverService>,
    /// Request and lookup counters
    pub metrics: Arc<MetricsCollector>,
}

impl ResolverState {
    /// Wrap a resolver service with fresh metrics
    #[must_use]
    pub fn new(service: ResolverService) -> Self {
        Self {
            service: Arc::new(service),
            metrics: Arc::new(MetricsCollector::new()),
        }
    }
}

impl FromRef<GatewayState> for ServiceInfo {
    fn from_ref(_: &GatewayState) -> Self {
        Self::GATEWAY
    }
}

impl FromRef<ResolverState> for ServiceInfo {
    fn from_ref(_: &ResolverState) -> Self {
        Self::RESOLVER
    }
}

impl FromRef<GatewayState> for Arc<MetricsCollector> {
    fn from_ref(state: &GatewayState) -> Self {
        Arc::clone(&state.metrics)
    }
}

impl FromRef<ResolverState> for Arc<MetricsCollector> {
    fn from_ref(state: &ResolverState) -> Self {
        Arc::clone(&state.metrics)
    }
}
