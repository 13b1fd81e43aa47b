//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::conversions::{db_app_error, db_error_kind};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed input (mobile number, name, code format)
    #[error("{0}")]
    Validation(String),

    /// User not found
    #[error("User not found. Please register first")]
    UserNotFound,

    /// Mobile number already registered
    #[error("An account with this mobile number already exists")]
    MobileNumberTaken,

    /// No code was requested for this key, or it was already used
    #[error("Verification code not requested or already used")]
    CodeNotFound,

    /// Code exists but its validity window has passed
    #[error("Verification code expired")]
    CodeExpired,

    /// Submitted code does not match
    #[error("Invalid verification code")]
    CodeMismatch,

    /// Token missing, malformed, tampered, expired, or revoked
    #[error("Invalid or expired token")]
    TokenInvalid,

    /// SMS provider failure
    #[error("SMS provider unavailable: {0}")]
    Provider(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::UserNotFound | AuthError::CodeNotFound => StatusCode::NOT_FOUND,
            AuthError::MobileNumberTaken => StatusCode::CONFLICT,
            AuthError::CodeExpired => StatusCode::GONE,
            AuthError::CodeMismatch | AuthError::TokenInvalid => StatusCode::UNAUTHORIZED,
            AuthError::Provider(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Database(e) => StatusCode::from_u16(db_error_kind(e).status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::UserNotFound | AuthError::CodeNotFound => ErrorKind::NotFound,
            AuthError::MobileNumberTaken => ErrorKind::Conflict,
            AuthError::CodeExpired => ErrorKind::Gone,
            AuthError::CodeMismatch | AuthError::TokenInvalid => ErrorKind::Unauthorized,
            AuthError::Provider(_) => ErrorKind::ServiceUnavailable,
            AuthError::Database(e) => db_error_kind(e),
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Database errors get a generic message; driver text stays in logs.
    pub fn to_app_error(&self) -> AppError {
        let err = match self {
            AuthError::Database(e) => db_app_error(e),
            _ => AppError::new(self.kind(), self.to_string()),
        };
        match self {
            AuthError::CodeExpired => err.with_action("Request a new code"),
            AuthError::Provider(_) => err.with_action("Try again in a few minutes"),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Provider(msg) => {
                tracing::error!(message = %msg, "SMS provider failure");
            }
            AuthError::CodeMismatch => {
                tracing::warn!("Invalid verification code attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity => {
                AuthError::Validation(err.to_string())
            }
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<platform::sms::SmsError> for AuthError {
    fn from(err: platform::sms::SmsError) -> Self {
        AuthError::Provider(err.to_string())
    }
}
