//! WeatherAPI integration
//!
//! Client for the WeatherAPI current conditions endpoint
//! (<https://www.weatherapi.com>). Requires the caller's API key, which is
//! passed through unchanged.

pub mod client;
mod models;

pub use client::{WeatherApiClient, WeatherClient, WeatherConfig, WeatherError};
pub use models::{CurrentConditions, ProviderError};
