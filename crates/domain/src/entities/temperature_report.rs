//! Aggregated temperature report
//!
//! The terminal artifact of a lookup: the resolved city plus the current
//! temperature in three scales. The JSON field names are part of the public
//! HTTP contract of both services.

use serde::{Deserialize, Serialize};

use super::WeatherReading;
use crate::value_objects::Location;

/// City and current temperature in Celsius, Fahrenheit and Kelvin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReport {
    /// Resolved city name
    pub city: String,
    /// Temperature in Celsius
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    /// Temperature in Fahrenheit
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    /// Temperature in Kelvin
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

impl TemperatureReport {
    /// Aggregate a resolved location and a reading
    #[must_use]
    pub fn new(location: Location, reading: &WeatherReading) -> Self {
        Self {
            city: location.into_city(),
            temp_c: reading.celsius(),
            temp_f: reading.fahrenheit(),
            temp_k: reading.kelvin(),
        }
    }
}
