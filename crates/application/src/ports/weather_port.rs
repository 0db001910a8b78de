//! Weather service port
//!
//! Defines the interface for current weather retrieval.

use async_trait::async_trait;
use domain::{Credential, Location, WeatherReading};
#[cfg(test)]
use mockall::automock;

use crate::{error::ApplicationError, request_context::RequestContext};

/// Port for weather provider lookups
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherPort: Send + Sync {
    /// Get the current temperature for a resolved location
    ///
    /// The credential is forwarded unchanged to the provider. A rejected
    /// credential is reported as `ApplicationError::InvalidCredential`, any
    /// other failure as `ApplicationError::WeatherFailed`.
    async fn current(
        &self,
        ctx: &RequestContext,
        location: &Location,
        credential: &Credential,
    ) -> Result<WeatherReading, ApplicationError>;
}
