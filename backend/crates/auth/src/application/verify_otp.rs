//! Verify OTP Use Case
//!
//! Validates a code, marks the user verified and issues a token pair.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::otp::{login_key, validate_code};
use crate::application::register::sweep_stale_unverified;
use crate::application::token::{TokenPair, issue_pair};
use crate::domain::entity::user::User;
use crate::domain::repository::{OtpStore, UserRepository};
use crate::domain::value_object::mobile_number::MobileNumber;
use crate::error::{AuthError, AuthResult};

/// Verify OTP input
pub struct VerifyOtpInput {
    pub mobile_number: String,
    pub code: String,
}

/// Verify OTP output
pub struct VerifyOtpOutput {
    pub token_pair: TokenPair,
    pub user: User,
}

/// Verify OTP use case
pub struct VerifyOtpUseCase<U, S>
where
    U: UserRepository + Send + Sync + 'static,
    S: OtpStore,
{
    user_repo: Arc<U>,
    otp_store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> VerifyOtpUseCase<U, S>
where
    U: UserRepository + Send + Sync + 'static,
    S: OtpStore,
{
    pub fn new(user_repo: Arc<U>, otp_store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            otp_store,
            config,
        }
    }

    pub async fn execute(&self, input: VerifyOtpInput) -> AuthResult<VerifyOtpOutput> {
        let mobile_number = MobileNumber::new(input.mobile_number)?;

        // Opportunistic cleanup, off the request path
        let repo = self.user_repo.clone();
        let config = self.config.clone();
        tokio::spawn(async move {
            if let Err(e) = sweep_stale_unverified(repo.as_ref(), &config).await {
                tracing::warn!(error = %e, "Failed to sweep stale unverified users");
            }
        });

        validate_code(
            self.otp_store.as_ref(),
            &login_key(&mobile_number),
            &input.code,
        )
        .await?;

        let mut user = self
            .user_repo
            .find_by_mobile(&mobile_number)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_verified {
            self.user_repo.mark_verified(user.user_id).await?;
            user.is_verified = true;
        }

        let token_pair = issue_pair(user.user_id, user.session_version, &self.config)?;

        tracing::info!(user_id = %user.user_id, "User verified and signed in");

        Ok(VerifyOtpOutput { token_pair, user })
    }
}
