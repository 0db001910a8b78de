//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations. Each one
//! wraps its outbound call in a client span and injects that span into the
//! request headers.

mod resolver_service_adapter;
mod viacep_location_adapter;
mod weather_adapter;

pub use resolver_service_adapter::{API_KEY_HEADER, ResolverServiceAdapter};
pub use viacep_location_adapter::ViaCepLocationAdapter;
pub use weather_adapter::WeatherApiAdapter;
