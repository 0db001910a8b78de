//! Value Objects - Immutable, identity-less domain primitives

mod credential;
mod location;
mod postal_code;

pub use credential::Credential;
pub use location::Location;
pub use postal_code::PostalCode;
