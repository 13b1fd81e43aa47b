//! OTP Session Entity
//!
//! Volatile record binding a delivery key (a mobile number, or a
//! purpose-qualified key like "profile:{number}") to a one-time code.
//! Lives only in the in-process store, never in the database; loss on
//! restart is accepted and the client simply requests a new code.

use chrono::Utc;

use crate::domain::value_object::otp_code::OtpCode;

/// OTP session entity
#[derive(Debug, Clone)]
pub struct OtpSession {
    /// The secret code
    pub code: OtpCode,
    /// Expiry (Unix timestamp ms)
    pub expires_at_ms: i64,
}

impl OtpSession {
    /// Create a new session expiring `ttl_ms` from now
    pub fn new(code: OtpCode, ttl_ms: i64) -> Self {
        Self {
            code,
            expires_at_ms: Utc::now().timestamp_millis() + ttl_ms,
        }
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_not_expired() {
        let session = OtpSession::new(OtpCode::generate(), 600_000);
        assert!(!session.is_expired());
    }

    #[test]
    fn test_expired_session() {
        let session = OtpSession::new(OtpCode::generate(), -1);
        assert!(session.is_expired());
    }
}
