//! Application-level errors
//!
//! The error taxonomy shared by the gateway and resolver services. Each
//! component maps its internal failure to the nearest kind; the HTTP layer
//! maps kinds to status codes. The stable `code` of each kind is also what
//! travels between the two services in error bodies.

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplicationError {
    /// Request body or parameters could not be decoded
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Postal code failed shape validation
    #[error(transparent)]
    InvalidPostalCode(DomainError),

    /// The `api_key` header was absent or empty
    #[error("api_key is required")]
    MissingCredential,

    /// Postal code could not be resolved to a city
    #[error("{0}")]
    ResolutionFailed(String),

    /// Weather lookup failed
    #[error("{0}")]
    WeatherFailed(String),

    /// Weather provider rejected the credential or returned no reading
    #[error("error getting weather, invalid API key")]
    InvalidCredential,

    /// The peer service could not be reached or answered unintelligibly
    #[error("Downstream service unavailable: {0}")]
    DownstreamUnavailable(String),
}

impl ApplicationError {
    /// Stable machine-readable code for this kind
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MalformedInput(_) => "malformed_input",
            Self::InvalidPostalCode(_) => "invalid_zipcode",
            Self::MissingCredential => "missing_credential",
            Self::ResolutionFailed(_) => "resolution_failed",
            Self::WeatherFailed(_) | Self::InvalidCredential => "weather_failed",
            Self::DownstreamUnavailable(_) => "downstream_unavailable",
        }
    }

    /// Rebuild a taxonomy kind from a peer service's error code and message
    ///
    /// Unknown codes are treated as the peer being unavailable.
    #[must_use]
    pub fn from_code(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            "missing_credential" => Self::MissingCredential,
            "resolution_failed" => Self::ResolutionFailed(message),
            "weather_failed" => Self::WeatherFailed(message),
            "malformed_input" => Self::MalformedInput(message),
            _ => Self::DownstreamUnavailable(message),
        }
    }

    /// Whether the failure came from something other than the caller's input
    #[must_use]
    pub const fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            Self::ResolutionFailed(_)
                | Self::WeatherFailed(_)
                | Self::InvalidCredential
                | Self::DownstreamUnavailable(_)
        )
    }
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidPostalCode { .. } => Self::InvalidPostalCode(err),
            DomainError::EmptyCredential => Self::MissingCredential,
            DomainError::EmptyLocation => Self::ResolutionFailed(err.to_string()),
        }
    }
}
