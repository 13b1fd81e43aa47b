//! Application Layer
//!
//! Use cases and application services.

pub mod check_session;
pub mod config;
pub mod login;
pub mod mobile_change;
pub mod otp;
pub mod profile;
pub mod refresh;
pub mod register;
pub mod resend_otp;
pub mod token;
pub mod verify_otp;

// Re-exports
pub use check_session::{AuthenticatedUser, CheckSessionUseCase};
pub use config::AuthConfig;
pub use login::{LoginInput, LoginUseCase};
pub use mobile_change::{MobileChangeOutput, MobileChangeUseCase};
pub use profile::{ProfileUseCase, UpdateProfileInput};
pub use refresh::{RefreshInput, RefreshSessionUseCase};
pub use register::{RegisterInput, RegisterUseCase};
pub use resend_otp::{ResendOtpInput, ResendOtpUseCase};
pub use token::{SessionClaims, TokenKind, TokenPair};
pub use verify_otp::{VerifyOtpInput, VerifyOtpOutput, VerifyOtpUseCase};
