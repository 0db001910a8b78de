//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: listener and shutdown settings
//! - `resolver`: how the gateway reaches the resolver service
//!
//! The ViaCEP, WeatherAPI and telemetry sections reuse the configuration
//! types of their own crates and modules.
//!
//! Sources, lowest precedence first: defaults, optional `config.toml`,
//! `CEPWEATHER_SECTION__KEY` environment variables, then the two well-known
//! variables `HTTP_PORT` and `OTEL_EXPORTER_OTLP_ENDPOINT`.

mod resolver;
mod server;

use integration_viacep::ViaCepConfig;
use integration_weather::WeatherConfig;
use serde::{Deserialize, Serialize};

pub use resolver::ResolverClientConfig;
pub use server::{ServerConfig, normalize_listen_addr};

use crate::telemetry::TelemetryConfig;

/// Environment prefix for structured overrides
pub const ENV_PREFIX: &str = "CEPWEATHER";

/// Listen address override, e.g. `":8080"`
pub const HTTP_PORT_VAR: &str = "HTTP_PORT";

/// Collector address; setting it enables span export
pub const OTLP_ENDPOINT_VAR: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

/// Main application configuration, shared by both binaries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging and trace export
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Peer resolver service (gateway only)
    #[serde(default)]
    pub resolver: ResolverClientConfig,

    /// ViaCEP directory (resolver only)
    #[serde(default)]
    pub viacep: ViaCepConfig,

    /// WeatherAPI provider (resolver only)
    #[serde(default)]
    pub weather: WeatherConfig,
}

impl AppConfig {
    /// Load configuration from the process environment and `config.toml`
    ///
    /// `default_listen_addr` differs per binary.
    pub fn load(default_listen_addr: &str) -> Result<Self, config::ConfigError> {
        Self::from_sources(
            default_listen_addr,
            config::File::with_name("config").required(false),
            std::env::vars().collect(),
        )
    }

    /// Build configuration from an explicit file source and variable set
    pub fn from_sources<S>(
        default_listen_addr: &str,
        file: S,
        vars: config::Map<String, String>,
    ) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let listen_override = vars
            .get(HTTP_PORT_VAR)
            .filter(|value| !value.trim().is_empty())
            .map(|value| normalize_listen_addr(value));
        let endpoint_override = vars
            .get(OTLP_ENDPOINT_VAR)
            .filter(|value| !value.trim().is_empty())
            .cloned();
        let export_override = endpoint_override.as_ref().map(|_| true);

        let builder = config::Config::builder()
            .set_default("server.listen_addr", default_listen_addr)?
            .add_source(file)
            // e.g. CEPWEATHER_RESOLVER__BASE_URL=http://localhost:8081
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars)),
            )
            .set_override_option("server.listen_addr", listen_override)?
            .set_override_option("telemetry.endpoint", endpoint_override)?
            .set_override_option("telemetry.enabled", export_override)?;

        builder.build()?.try_deserialize()
    }
}
