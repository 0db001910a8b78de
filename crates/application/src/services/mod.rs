//! Application services
//!
//! The two request orchestrators. Each runs one request through its stages
//! and either returns a `TemperatureReport` or one classified error.

mod gateway_service;
mod resolver_service;
mod stage;

pub use gateway_service::GatewayService;
pub use resolver_service::ResolverService;
pub use stage::{GatewayStage, ResolverStage};
