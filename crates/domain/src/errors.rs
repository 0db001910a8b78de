//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Postal code does not contain exactly eight digits
    #[error("invalid zipcode")]
    InvalidPostalCode {
        /// Number of digits found after normalization
        digits: usize,
    },

    /// Credential was supplied but empty
    #[error("api_key is required")]
    EmptyCredential,

    /// Location lookup produced no city name
    #[error("can not find zipcode")]
    EmptyLocation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_postal_code_message() {
        let err = DomainError::InvalidPostalCode { digits: 3 };
        assert_eq!(err.to_string(), "invalid zipcode");
    }

    #[test]
    fn empty_credential_message() {
        assert_eq!(
            DomainError::EmptyCredential.to_string(),
            "api_key is required"
        );
    }

    #[test]
    fn empty_location_message() {
        assert_eq!(
            DomainError::EmptyLocation.to_string(),
            "can not find zipcode"
        );
    }

    #[test]
    fn errors_compare_by_value() {
        assert_eq!(
            DomainError::InvalidPostalCode { digits: 4 },
            DomainError::InvalidPostalCode { digits: 4 }
        );
        assert_ne!(
            DomainError::InvalidPostalCode { digits: 4 },
            DomainError::InvalidPostalCode { digits: 9 }
        );
    }
}
