//! Verification Code Flow
//!
//! Shared request/validate steps used by the registration, login and
//! mobile change use cases. Codes are single use: a successful match
//! removes the session, and probing an expired session removes it too.
//! A mismatch leaves the session in place so the client can retry
//! until expiry.

use crate::application::config::AuthConfig;
use crate::domain::entity::otp_session::OtpSession;
use crate::domain::repository::{OtpDelivery, OtpStore};
use crate::domain::value_object::{mobile_number::MobileNumber, otp_code::OtpCode};
use crate::error::{AuthError, AuthResult};

/// Store key for login/registration codes
pub(crate) fn login_key(mobile_number: &MobileNumber) -> String {
    mobile_number.as_str().to_string()
}

/// Store key for mobile change codes, kept separate from login codes
pub(crate) fn profile_key(mobile_number: &MobileNumber) -> String {
    format!("profile:{}", mobile_number.as_str())
}

/// Generate a code, store it under `key` and deliver it
///
/// Storing replaces any previous code for the key. If delivery fails the
/// stored session is discarded so a stale code cannot be validated later.
pub(crate) async fn request_code<S, D>(
    store: &S,
    delivery: &D,
    config: &AuthConfig,
    key: &str,
    mobile_number: &MobileNumber,
) -> AuthResult<()>
where
    S: OtpStore,
    D: OtpDelivery,
{
    let code = OtpCode::generate();
    store
        .put(key, OtpSession::new(code.clone(), config.otp_ttl_ms()))
        .await?;

    if let Err(e) = delivery.deliver(mobile_number, &code).await {
        if let Err(remove_err) = store.remove(key).await {
            tracing::error!(error = %remove_err, "Failed to discard undelivered code");
        }
        return Err(e);
    }

    Ok(())
}

/// Validate a submitted code against the session stored under `key`
pub(crate) async fn validate_code<S>(store: &S, key: &str, submitted: &str) -> AuthResult<()>
where
    S: OtpStore,
{
    let submitted = OtpCode::new(submitted)?;

    let session = store.get(key).await?.ok_or(AuthError::CodeNotFound)?;

    if session.is_expired() {
        store.remove(key).await?;
        return Err(AuthError::CodeExpired);
    }

    if !session.code.matches(&submitted) {
        return Err(AuthError::CodeMismatch);
    }

    store.remove(key).await?;
    Ok(())
}
