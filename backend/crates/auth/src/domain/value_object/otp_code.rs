//! One-Time Code Value Object
//!
//! Six-digit numeric code delivered over SMS. Treated as a short-lived
//! secret: comparison is constant time and Debug output is redacted.

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;

/// Code length in digits
const CODE_LENGTH: usize = 6;

/// One-time code value object
#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    /// Generate a fresh random code (uniform over 100000-999999)
    pub fn generate() -> Self {
        use rand::Rng;
        let n: u32 = rand::rng().random_range(100_000..=999_999);
        Self(n.to_string())
    }

    /// Create from a submitted string with format validation
    pub fn new(code: impl Into<String>) -> AppResult<Self> {
        let code = code.into().trim().to_string();

        if code.len() != CODE_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::bad_request(
                "Enter the 6 digit verification code",
            ));
        }

        Ok(Self(code))
    }

    /// Get the code digits (for delivery)
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Constant-time comparison against a submitted code
    pub fn matches(&self, submitted: &OtpCode) -> bool {
        platform::crypto::constant_time_eq(self.0.as_bytes(), submitted.0.as_bytes())
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OtpCode").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_in_range() {
        for _ in 0..64 {
            let code = OtpCode::generate();
            assert_eq!(code.as_str().len(), 6);
            let n: u32 = code.as_str().parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[test]
    fn test_new_valid() {
        assert!(OtpCode::new("123456").is_ok());
        assert!(OtpCode::new(" 654321 ").is_ok());
    }

    #[test]
    fn test_new_invalid() {
        assert!(OtpCode::new("").is_err());
        assert!(OtpCode::new("12345").is_err());
        assert!(OtpCode::new("1234567").is_err());
        assert!(OtpCode::new("12345a").is_err());
    }

    #[test]
    fn test_matches() {
        let code = OtpCode::new("123456").unwrap();
        assert!(code.matches(&OtpCode::new("123456").unwrap()));
        assert!(!code.matches(&OtpCode::new("123457").unwrap()));
    }

    #[test]
    fn test_debug_redacted() {
        let code = OtpCode::new("123456").unwrap();
        let debug = format!("{:?}", code);
        assert!(!debug.contains("123456"));
        assert!(debug.contains("REDACTED"));
    }
}
