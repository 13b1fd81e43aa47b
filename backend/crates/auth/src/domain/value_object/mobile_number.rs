//! Mobile Number Value Object
//!
//! The primary login identifier. Indian mobile numbers only:
//! exactly 10 digits, first digit 6-9. Stored without the country prefix;
//! the SMS layer prepends the dial code.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Mobile number value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MobileNumber(String);

impl MobileNumber {
    /// Create a new mobile number with validation
    pub fn new(number: impl Into<String>) -> AppResult<Self> {
        let number = number.into().trim().to_string();

        if number.len() != 10 || !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::bad_request(
                "Enter a valid 10 digit mobile number",
            ));
        }

        if !matches!(number.as_bytes()[0], b'6'..=b'9') {
            return Err(AppError::bad_request(
                "Mobile number must start with 6, 7, 8 or 9",
            ));
        }

        Ok(Self(number))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Get the number as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to string for database storage
    pub fn into_db(self) -> String {
        self.0
    }
}

impl FromStr for MobileNumber {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        MobileNumber::new(s)
    }
}

impl std::fmt::Display for MobileNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for MobileNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
