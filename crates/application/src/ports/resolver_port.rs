//! Resolver service port
//!
//! The gateway's view of the downstream resolver service.

use async_trait::async_trait;
use domain::{Credential, PostalCode, TemperatureReport};
#[cfg(test)]
use mockall::automock;

use crate::{error::ApplicationError, request_context::RequestContext};

/// Port for forwarding a validated postal code to the resolver service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ResolverPort: Send + Sync {
    /// Ask the resolver for the temperature report of a postal code
    ///
    /// Error responses of the resolver are mapped back into the taxonomy;
    /// transport failures are `ApplicationError::DownstreamUnavailable`.
    async fn lookup(
        &self,
        ctx: &RequestContext,
        postal_code: &PostalCode,
        credential: &Credential,
    ) -> Result<TemperatureReport, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn ResolverPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn ResolverPort>();
    }
}
