//! CEP Weather HTTP presentation layer
//!
//! Routers, handlers and middleware of the two services: the gateway that
//! validates postal codes and the resolver that turns them into temperature
//! reports. Both binaries share the serving and shutdown logic in here.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod shutdown;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use middleware::TraceContextLayer;
pub use routes::{gateway_router, resolver_router, with_http_layers};
pub use shutdown::{serve_until_cancelled, spawn_shutdown_waiter};
pub use state::{GatewayState, ResolverState, ServiceInfo};
