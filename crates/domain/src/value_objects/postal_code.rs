//! Postal code (CEP) value object
//!
//! A CEP is accepted when, after discarding every character that is not an
//! ASCII digit, exactly eight digits remain.
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::PostalCode;
//!
//! let cep = PostalCode::parse("01001-000").expect("valid cep");
//! assert_eq!(cep.as_str(), "01001000");
//!
//! assert!(PostalCode::parse("1234").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A validated eight-digit Brazilian postal code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    /// Number of digits in a valid postal code
    pub const LENGTH: usize = 8;

    /// Strip every non-digit character and concatenate the remaining digits
    ///
    /// ```
    /// use domain::value_objects::PostalCode;
    ///
    /// assert_eq!(PostalCode::normalize("12345-678x"), "12345678");
    /// assert_eq!(PostalCode::normalize("abc"), "");
    /// ```
    #[must_use]
    pub fn normalize(raw: &str) -> String {
        raw.chars().filter(char::is_ascii_digit).collect()
    }

    /// Normalize and validate raw client input
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPostalCode` unless exactly eight digits
    /// remain after normalization.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let digits = Self::normalize(raw);
        if digits.len() != Self::LENGTH {
            return Err(DomainError::InvalidPostalCode {
                digits: digits.len(),
            });
        }
        Ok(Self(digits))
    }

    /// The eight digits as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PostalCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for PostalCode {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PostalCode> for String {
    fn from(code: PostalCode) -> Self {
        code.0
    }
}
