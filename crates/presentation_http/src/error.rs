//! API error handling
//!
//! Maps the application error taxonomy onto HTTP status codes. Every error
//! body has the same shape, `{"error": "<message>", "code": "<code>"}`, so
//! the gateway can rebuild the resolver's classification from it.

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected input or a failed lookup (400)
    #[error("{message}")]
    BadRequest {
        /// Taxonomy code
        code: &'static str,
        /// Human-readable message
        message: String,
    },

    /// Postal code of the wrong shape (422)
    #[error("{message}")]
    UnprocessableEntity {
        /// Taxonomy code
        code: &'static str,
        /// Human-readable message
        message: String,
    },
}

impl ApiError {
    /// HTTP status for this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::UnprocessableEntity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Taxonomy code carried in the body
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest { code, .. } | Self::UnprocessableEntity { code, .. } => code,
        }
    }
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            code: self.code().to_string(),
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        let code = err.code();
        let message = err.to_string();

        match err {
            ApplicationError::InvalidPostalCode(_) => Self::UnprocessableEntity { code, message },
            ApplicationError::MalformedInput(_)
            | ApplicationError::MissingCredential
            | ApplicationError::ResolutionFailed(_)
            | ApplicationError::WeatherFailed(_)
            | ApplicationError::InvalidCredential
            | ApplicationError::DownstreamUnavailable(_) => Self::BadRequest { code, message },
        }
    }
}
