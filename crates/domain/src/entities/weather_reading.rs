//! Weather reading returned by the provider
//!
//! Only Celsius is fetched. Fahrenheit and Kelvin are always derived so the
//! three scales can never disagree.

use serde::{Deserialize, Serialize};

/// Offset between Celsius and Kelvin as used by the public API (integer offset)
pub const KELVIN_OFFSET: f64 = 273.0;

/// Current temperature at a location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    celsius: f64,
}

impl WeatherReading {
    /// Create a reading from a Celsius temperature
    #[must_use]
    pub const fn from_celsius(celsius: f64) -> Self {
        Self { celsius }
    }

    /// Temperature in Celsius
    #[must_use]
    pub const fn celsius(&self) -> f64 {
        self.celsius
    }

    /// Temperature in Fahrenheit (`C * 9 / 5 + 32`)
    #[must_use]
    pub fn fahrenheit(&self) -> f64 {
        self.celsius * 9.0 / 5.0 + 32.0
    }

    /// Temperature in Kelvin (`C + 273`)
    #[must_use]
    pub fn kelvin(&self) -> f64 {
        self.celsius + KELVIN_OFFSET
    }
}
