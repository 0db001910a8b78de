//! Request lifecycle stages
//!
//! Stages are reported in logs so a failed request shows where it stopped.

use std::fmt;

/// Stages of a request handled by the resolver service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverStage {
    /// Request accepted, nothing checked yet
    Received,
    /// Waiting on the postal code directory
    LocationResolving,
    /// Waiting on the weather provider
    WeatherFetching,
    /// Report assembled
    Aggregated,
}

impl ResolverStage {
    /// Stage name used in log fields
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::LocationResolving => "location_resolving",
            Self::WeatherFetching => "weather_fetching",
            Self::Aggregated => "aggregated",
        }
    }
}

impl fmt::Display for ResolverStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stages of a request handled by the gateway service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayStage {
    /// Request accepted, nothing checked yet
    Received,
    /// Credential present and postal code well formed
    Validated,
    /// Waiting on the resolver service
    Forwarding,
    /// Report received from the resolver
    Completed,
}

impl GatewayStage {
    /// Stage name used in log fields
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Validated => "validated",
            Self::Forwarding => "forwarding",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for GatewayStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
