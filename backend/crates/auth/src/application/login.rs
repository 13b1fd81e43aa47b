//! Login Use Case
//!
//! Sends a verification code to an existing user.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::otp::{login_key, request_code};
use crate::domain::repository::{OtpDelivery, OtpStore, UserRepository};
use crate::domain::value_object::mobile_number::MobileNumber;
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub mobile_number: String,
}

/// Login use case
pub struct LoginUseCase<U, S, D>
where
    U: UserRepository,
    S: OtpStore,
    D: OtpDelivery,
{
    user_repo: Arc<U>,
    otp_store: Arc<S>,
    otp_delivery: Arc<D>,
    config: Arc<AuthConfig>,
}

impl<U, S, D> LoginUseCase<U, S, D>
where
    U: UserRepository,
    S: OtpStore,
    D: OtpDelivery,
{
    pub fn new(
        user_repo: Arc<U>,
        otp_store: Arc<S>,
        otp_delivery: Arc<D>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            otp_store,
            otp_delivery,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<()> {
        let mobile_number = MobileNumber::new(input.mobile_number)?;

        if !self.user_repo.exists_by_mobile(&mobile_number).await? {
            return Err(AuthError::UserNotFound);
        }

        request_code(
            self.otp_store.as_ref(),
            self.otp_delivery.as_ref(),
            &self.config,
            &login_key(&mobile_number),
            &mobile_number,
        )
        .await?;

        tracing::info!(mobile_number = %mobile_number, "Login code sent");

        Ok(())
    }
}
