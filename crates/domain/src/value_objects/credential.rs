//! Caller-supplied credential
//!
//! The `api_key` header is opaque to this system. It is only checked for
//! presence and forwarded unchanged to the weather provider and to the
//! resolver service.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::errors::DomainError;

/// Opaque API key supplied by the caller
#[derive(Clone)]
pub struct Credential(SecretString);

impl Credential {
    /// Wrap a caller-supplied key
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyCredential` if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, DomainError> {
        let key = key.into();
        if key.is_empty() {
            return Err(DomainError::EmptyCredential);
        }
        Ok(Self(SecretString::from(key)))
    }

    /// Build a credential from an optional header value
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyCredential` when the header is absent or empty.
    pub fn from_header(value: Option<&str>) -> Result<Self, DomainError> {
        value.map_or(Err(DomainError::EmptyCredential), Self::new)
    }

    /// Reveal the key for forwarding
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for Credential {}
