//! Gateway HTTP server
//!
//! Public entry point: validates the postal code and forwards it to the
//! resolver service.

use std::sync::Arc;

use application::GatewayService;
use infrastructure::{AppConfig, ResolverServiceAdapter, init_telemetry};
use presentation_http::{
    GatewayState, ServiceInfo, gateway_router, serve_until_cancelled, spawn_shutdown_waiter,
    with_http_layers,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load(DEFAULT_LISTEN_ADDR)?;
    let telemetry = config
        .telemetry
        .clone()
        .with_default_service_name(ServiceInfo::GATEWAY.name);
    let guard = init_telemetry(&telemetry)?;
    let carrier = Arc::new(guard.carrier());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        resolver = %config.resolver.base_url,
        exporting = guard.is_exporting(),
        "Gateway starting"
    );

    let resolver = ResolverServiceAdapter::new(&config.resolver, Arc::clone(&carrier))
        .map_err(|e| anyhow::anyhow!("Failed to initialize resolver client: {e}"))?;
    let state = GatewayState::new(GatewayService::new(Arc::new(resolver)));
    let app = with_http_layers(gateway_router(state, carrier), &config.server);

    let listener = TcpListener::bind(&config.server.listen_addr).await?;
    info!("Gateway listening on http://{}", listener.local_addr()?);

    let token = CancellationToken::new();
    let waiter = spawn_shutdown_waiter(token.clone());
    serve_until_cancelled(listener, app, token, config.server.shutdown_timeout()).await?;
    waiter.abort();

    info!("Gateway shutdown complete");
    drop(guard);
    Ok(())
}
