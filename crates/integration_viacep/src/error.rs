//! ViaCEP error types

use thiserror::Error;

/// Errors that can occur while querying ViaCEP
#[derive(Debug, Error)]
pub enum ViaCepError {
    /// HTTP client could not be built
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request could not be sent or timed out
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Non-success status from the directory
    #[error("Unexpected status: HTTP {0}")]
    UnexpectedStatus(u16),

    /// Body was not the expected JSON document
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The directory has no city for this postal code
    #[error("can not find zipcode")]
    NotFound,
}

impl ViaCepError {
    /// Whether the directory answered but had nothing for the code
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
