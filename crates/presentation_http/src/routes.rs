//! Route definitions
//!
//! Each service mounts its lookup route under the trace context layer and
//! the shared `/health` and `/metrics` routes outside of it.

use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use infrastructure::{ServerConfig, TraceContextCarrier};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::{
    handlers::{self, metrics::MetricsCollector},
    middleware::TraceContextLayer,
    state::{GatewayState, ResolverState, ServiceInfo},
};

/// Router of the gateway service
///
/// `POST /` only; other methods on `/` answer 405.
pub fn gateway_router(state: GatewayState, carrier: Arc<TraceContextCarrier>) -> Router {
    let tracing = TraceContextLayer::new(
        carrier,
        ServiceInfo::GATEWAY.name,
        Arc::clone(&state.metrics),
    );

    Router::new()
        .route("/", post(handlers::gateway::lookup))
        .route_layer(tracing)
        .merge(operational_routes())
        .with_state(state)
}

/// Router of the resolver service
///
/// `GET /` only; other methods on `/` answer 405.
pub fn resolver_router(state: ResolverState, carrier: Arc<TraceContextCarrier>) -> Router {
    let tracing = TraceContextLayer::new(
        carrier,
        ServiceInfo::RESOLVER.name,
        Arc::clone(&state.metrics),
    );

    Router::new()
        .route("/", get(handlers::resolver::lookup))
        .route_layer(tracing)
        .merge(operational_routes())
        .with_state(state)
}

/// Health and metrics routes shared by both services
fn operational_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    ServiceInfo: FromRef<S>,
    Arc<MetricsCollector>: FromRef<S>,
{
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::get_metrics))
}

/// Add the layers every listener gets (order matters: last added = outermost)
pub fn with_http_layers(router: Router, config: &ServerConfig) -> Router {
    router
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
}
