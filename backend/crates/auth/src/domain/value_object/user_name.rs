//! User Name Value Object
//!
//! 表示名。ログイン識別子ではない（ログインは携帯番号）。
//! 自由入力を許可し、前後の空白除去と長さ制限のみ行う。

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum display name length in characters
const NAME_MAX_LENGTH: usize = 100;

/// Display name value object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserName(String);

impl UserName {
    /// Create a new display name with validation
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        let name = name.into().trim().to_string();

        if name.is_empty() {
            return Err(AppError::bad_request("Name cannot be empty"));
        }

        if name.chars().count() > NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name must be at most {} characters",
                NAME_MAX_LENGTH
            )));
        }

        if name.chars().any(|c| c.is_control()) {
            return Err(AppError::bad_request("Name contains invalid characters"));
        }

        Ok(Self(name))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to string for database storage
    pub fn into_db(self) -> String {
        self.0
    }
}

impl FromStr for UserName {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        UserName::new(s)
    }
}

impl std::fmt::Display for UserName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_valid() {
        assert!(UserName::new("Asha Verma").is_ok());
        assert!(UserName::new("राहुल").is_ok());
        assert_eq!(UserName::new("  Asha  ").unwrap().as_str(), "Asha");
    }

    #[test]
    fn test_name_invalid() {
        assert!(UserName::new("").is_err());
        assert!(UserName::new("   ").is_err());
        assert!(UserName::new("a\u{0000}b").is_err());
        assert!(UserName::new("x".repeat(101)).is_err());
    }

    #[test]
    fn test_name_max_length_boundary() {
        assert!(UserName::new("x".repeat(100)).is_ok());
    }
}
