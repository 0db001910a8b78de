//! Application layer - Use cases and orchestration
//!
//! Contains the two request orchestrators (gateway and resolver), the error
//! taxonomy shared by both services, and the port definitions implemented by
//! infrastructure adapters.

pub mod error;
pub mod ports;
pub mod request_context;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use request_context::RequestContext;
pub use services::*;
