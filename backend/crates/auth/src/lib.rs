//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations and provider adapters
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Registration/login with OTP over SMS (no passwords)
//! - Signed bearer tokens: 24 h access + 7 day refresh
//! - Session-version revocation: a credential change retires all tokens
//! - Profile read/update and OTP-confirmed mobile number change
//!
//! ## Security Model
//! - Codes are 6 digits, 10 minute expiry, single use, constant-time compare
//! - Tokens are HMAC-SHA256 signed, URL-safe base64, kind-bound
//! - Every token validation checks the live session version

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::memory::InMemoryOtpStore;
pub use infra::postgres::PgUserRepository;
pub use infra::sms::SmsOtpDelivery;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
