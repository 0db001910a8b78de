//! Resolver HTTP server
//!
//! Resolves postal codes through ViaCEP and fetches the current temperature
//! for the city from WeatherAPI.

use std::sync::Arc;

use application::ResolverService;
use infrastructure::{AppConfig, ViaCepLocationAdapter, WeatherApiAdapter, init_telemetry};
use presentation_http::{
    ResolverState, ServiceInfo, resolver_router, serve_until_cancelled, spawn_shutdown_waiter,
    with_http_layers,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8081";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load(DEFAULT_LISTEN_ADDR)?;
    let telemetry = config
        .telemetry
        .clone()
        .with_default_service_name(ServiceInfo::RESOLVER.name);
    let guard = init_telemetry(&telemetry)?;
    let carrier = Arc::new(guard.carrier());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        viacep = %config.viacep.base_url,
        weather = %config.weather.base_url,
        exporting = guard.is_exporting(),
        "Resolver starting"
    );

    let location = ViaCepLocationAdapter::with_config(config.viacep.clone(), Arc::clone(&carrier))
        .map_err(|e| anyhow::anyhow!("Failed to initialize ViaCEP client: {e}"))?;
    let weather = WeatherApiAdapter::with_config(config.weather.clone(), Arc::clone(&carrier))
        .map_err(|e| anyhow::anyhow!("Failed to initialize WeatherAPI client: {e}"))?;
    let state = ResolverState::new(ResolverService::new(
        Arc::new(location),
        Arc::new(weather),
    ));
    let app = with_http_layers(resolver_router(state, carrier), &config.server);

    let listener = TcpListener::bind(&config.server.listen_addr).await?;
    info!("Resolver listening on http://{}", listener.local_addr()?);

    let token = CancellationToken::new();
    let waiter = spawn_shutdown_waiter(token.clone());
    serve_until_cancelled(listener, app, token, config.server.shutdown_timeout()).await?;
    waiter.abort();

    info!("Resolver shutdown complete");
    drop(guard);
    Ok(())
}
