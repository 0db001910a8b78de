//! Resolved location (city name)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// City name resolved from a postal code, never empty
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Location(String);

impl Location {
    /// Create a location from a city name
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyLocation` for an empty or blank name.
    pub fn new(city: impl Into<String>) -> Result<Self, DomainError> {
        let city = city.into();
        if city.trim().is_empty() {
            return Err(DomainError::EmptyLocation);
        }
        Ok(Self(city))
    }

    /// City name
    #[must_use]
    pub fn city(&self) -> &str {
        &self.0
    }

    /// Consume into the owned city name
    #[must_use]
    pub fn into_city(self) -> String {
        self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Location {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        location.0
    }
}
