//! ViaCEP integration
//!
//! Client for the ViaCEP postal code directory (<https://viacep.com.br>).
//! Resolves a Brazilian CEP to its address record; only the city
//! (`localidade`) is used downstream.

pub mod client;
mod error;
mod models;

pub use client::{AddressClient, ViaCepClient, ViaCepConfig};
pub use error::ViaCepError;
pub use models::Address;
