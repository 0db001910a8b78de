//! Domain layer for CEP Weather
//!
//! Contains the postal code validator, the values that flow through a single
//! lookup (credential, location, weather reading) and the aggregated
//! temperature report returned to callers. No I/O happens here.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
