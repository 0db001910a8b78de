//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod location_port;
mod resolver_port;
mod weather_port;

pub use location_port::LocationPort;
#[cfg(test)]
pub use location_port::MockLocationPort;
pub use resolver_port::ResolverPort;
#[cfg(test)]
pub use resolver_port::MockResolverPort;
pub use weather_port::WeatherPort;
#[cfg(test)]
pub use weather_port::MockWeatherPort;
