//! Commerce Error Types
//!
//! This module provides commerce-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::conversions::{db_app_error, db_error_kind};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Commerce-specific result type alias
pub type CommerceResult<T> = Result<T, CommerceError>;

/// Commerce-specific error variants
#[derive(Debug, Error)]
pub enum CommerceError {
    /// Malformed input (item kind, missing item id, bad asset payload)
    #[error("{0}")]
    Validation(String),

    /// Purchasable item missing or inactive
    #[error("Item not found")]
    ItemNotFound,

    /// E-book missing or inactive
    #[error("E-book not found")]
    EbookNotFound,

    /// Caller lacks an active library subscription
    #[error("An active digital library subscription is required")]
    SubscriptionRequired,

    /// Caller is not an admin
    #[error("Admin access required")]
    AdminOnly,

    /// Payment gateway failure or unusable gateway response
    #[error("Payment gateway error: {0}")]
    Gateway(String),

    /// Asset storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CommerceError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CommerceError::Validation(_) => StatusCode::BAD_REQUEST,
            CommerceError::ItemNotFound | CommerceError::EbookNotFound => StatusCode::NOT_FOUND,
            CommerceError::SubscriptionRequired | CommerceError::AdminOnly => StatusCode::FORBIDDEN,
            CommerceError::Gateway(_) => StatusCode::SERVICE_UNAVAILABLE,
            CommerceError::Database(e) => StatusCode::from_u16(db_error_kind(e).status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            CommerceError::Storage(_) | CommerceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommerceError::Validation(_) => ErrorKind::BadRequest,
            CommerceError::ItemNotFound | CommerceError::EbookNotFound => ErrorKind::NotFound,
            CommerceError::SubscriptionRequired | CommerceError::AdminOnly => ErrorKind::Forbidden,
            CommerceError::Gateway(_) => ErrorKind::ServiceUnavailable,
            CommerceError::Database(e) => db_error_kind(e),
            CommerceError::Storage(_) | CommerceError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    ///
    /// Database errors get a generic message; driver text stays in logs.
    pub fn to_app_error(&self) -> AppError {
        let err = match self {
            CommerceError::Database(e) => db_app_error(e),
            _ => AppError::new(self.kind(), self.to_string()),
        };
        match self {
            CommerceError::Gateway(_) => err.with_action("Try again in a few minutes"),
            CommerceError::SubscriptionRequired => {
                err.with_action("Subscribe to the digital library to download e-books")
            }
            _ => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            CommerceError::Database(e) => {
                tracing::error!(error = %e, "Commerce database error");
            }
            CommerceError::Internal(msg) => {
                tracing::error!(message = %msg, "Commerce internal error");
            }
            CommerceError::Gateway(msg) => {
                tracing::error!(message = %msg, "Payment gateway failure");
            }
            CommerceError::Storage(msg) => {
                tracing::error!(message = %msg, "Asset storage failure");
            }
            CommerceError::AdminOnly => {
                tracing::warn!("Admin endpoint hit without admin rights");
            }
            _ => {
                tracing::debug!(error = %self, "Commerce error");
            }
        }
    }
}

impl IntoResponse for CommerceError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<platform::payment::GatewayError> for CommerceError {
    fn from(err: platform::payment::GatewayError) -> Self {
        CommerceError::Gateway(err.to_string())
    }
}

impl From<platform::storage::StorageError> for CommerceError {
    fn from(err: platform::storage::StorageError) -> Self {
        CommerceError::Storage(err.to_string())
    }
}
