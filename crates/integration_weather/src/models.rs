//! WeatherAPI data models

use serde::{Deserialize, Serialize};

/// Current conditions extracted from a `current.json` answer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Temperature in Celsius as reported by the provider
    pub temp_c: f64,
}

/// Error payload the provider sends alongside non-success statuses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderError {
    /// Provider-specific error code (e.g. 1006 "No matching location found.")
    pub code: u32,
    /// Human readable message
    pub message: String,
}

/// Raw `current.json` document
///
/// Only the fields we use are modelled. `temp_c` is kept untyped so an
/// answer carrying a non-numeric value is still decodable and can be
/// classified instead of failing as a parse error.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    #[serde(default)]
    pub current: Option<CurrentData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentData {
    #[serde(default)]
    pub temp_c: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ProviderError,
}

impl ApiResponse {
    /// Numeric Celsius reading, if the provider sent one
    pub fn temp_c(&self) -> Option<f64> {
        self.current
            .as_ref()
            .and_then(|current| current.temp_c.as_ref())
            .and_then(serde_json::Value::as_f64)
    }
}
