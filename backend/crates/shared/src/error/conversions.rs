//! Error Conversions
//!
//! Classifies driver-level failures into [`AppError`] and renders
//! [`AppError`] as an HTTP response. Client-facing messages stay
//! generic; the original error is kept on `source` for logs.

use super::app_error::AppError;
use super::kind::ErrorKind;

// ============================================================================
// SQLx classification (feature-gated)
// ============================================================================

/// データベースエラーを [`ErrorKind`] に分類
///
/// 一時的な障害（プール枯渇や管理者による停止）は 503、一意制約違反は
/// 409 に落とし、それ以外は 500 として扱う。分類は PostgreSQL の
/// エラークラスに従う。
///
/// <https://www.postgresql.org/docs/current/errcodes-appendix.html>
#[cfg(feature = "sqlx")]
pub fn db_error_kind(err: &sqlx::Error) -> ErrorKind {
    match err {
        sqlx::Error::RowNotFound => ErrorKind::NotFound,
        sqlx::Error::PoolTimedOut => ErrorKind::ServiceUnavailable,
        sqlx::Error::Io(_) => ErrorKind::ServiceUnavailable,
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            // Class 23: integrity constraint violation
            Some("23505") => ErrorKind::Conflict,
            Some("23000") | Some("23001") | Some("23503") => ErrorKind::Conflict,
            Some("23502") | Some("23514") => ErrorKind::BadRequest,
            // Class 42: access rule violation
            Some("42501") => ErrorKind::Forbidden,
            // Class 53: insufficient resources / class 57: operator intervention
            Some(code) if code.starts_with("53") || code.starts_with("57") => {
                ErrorKind::ServiceUnavailable
            }
            _ => ErrorKind::InternalServerError,
        },
        _ => ErrorKind::InternalServerError,
    }
}

/// データベースエラーを一般向けメッセージの [`AppError`] に変換
///
/// SQL やドライバの文言はレスポンスに出さない。
#[cfg(feature = "sqlx")]
pub fn db_app_error(err: &sqlx::Error) -> AppError {
    match db_error_kind(err) {
        ErrorKind::NotFound => AppError::not_found("Record not found"),
        ErrorKind::Conflict => AppError::conflict("Duplicate or conflicting record"),
        ErrorKind::BadRequest => AppError::bad_request("Invalid data for this operation"),
        ErrorKind::Forbidden => AppError::forbidden("Insufficient database privilege"),
        ErrorKind::ServiceUnavailable => AppError::service_unavailable("Database unavailable"),
        _ => AppError::internal("Database error"),
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        db_app_error(&err).with_source(err)
    }
}

// ============================================================================
// Axum response rendering (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 problem details
        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.message(),
            "action": self.action(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(all(test, feature = "sqlx"))]
mod sqlx_tests {
    use super::*;

    #[test]
    fn test_row_not_found_classifies_as_not_found() {
        assert_eq!(db_error_kind(&sqlx::Error::RowNotFound), ErrorKind::NotFound);

        let app_err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(app_err.status_code(), 404);
        assert_eq!(app_err.message(), "Record not found");
    }

    #[test]
    fn test_pool_exhaustion_classifies_as_unavailable() {
        assert_eq!(
            db_error_kind(&sqlx::Error::PoolTimedOut),
            ErrorKind::ServiceUnavailable
        );

        let app_err: AppError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(app_err.status_code(), 503);
    }

    #[test]
    fn test_unknown_errors_stay_internal() {
        let err = sqlx::Error::ColumnNotFound("missing".to_string());
        assert_eq!(db_error_kind(&err), ErrorKind::InternalServerError);
    }
}

#[cfg(all(test, feature = "axum"))]
mod response_tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_response_status_follows_kind() {
        let resp = AppError::new(ErrorKind::Gone, "Verification code expired").into_response();
        assert_eq!(resp.status().as_u16(), 410);

        let resp = AppError::bad_request("Invalid mobile number").into_response();
        assert_eq!(resp.status().as_u16(), 400);
    }
}
