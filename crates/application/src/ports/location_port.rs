//! Location resolution port
//!
//! Maps a postal code to a city name through an external directory.

use async_trait::async_trait;
use domain::{Location, PostalCode};
#[cfg(test)]
use mockall::automock;

use crate::{error::ApplicationError, request_context::RequestContext};

/// Port for postal code directory lookups
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LocationPort: Send + Sync {
    /// Resolve a postal code to a city
    ///
    /// Any failure, including an empty city, is reported as
    /// `ApplicationError::ResolutionFailed`. Implementations must not retry.
    async fn resolve(
        &self,
        ctx: &RequestContext,
        postal_code: &PostalCode,
    ) -> Result<Location, ApplicationError>;
}
