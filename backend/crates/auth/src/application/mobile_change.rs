//! Mobile Change Use Case
//!
//! Two-step, OTP-confirmed move of an account to a new mobile number.
//! Confirmation bumps the session version, so tokens issued before the
//! change stop authenticating.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::AuthConfig;
use crate::application::otp::{profile_key, request_code, validate_code};
use crate::application::token::{TokenPair, issue_pair};
use crate::domain::entity::user::User;
use crate::domain::repository::{OtpDelivery, OtpStore, UserRepository};
use crate::domain::value_object::mobile_number::MobileNumber;
use crate::error::{AuthError, AuthResult};

/// Mobile change confirmation output
pub struct MobileChangeOutput {
    pub user: User,
    pub token_pair: TokenPair,
}

/// Mobile change use case
pub struct MobileChangeUseCase<U, S, D>
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

impl<U, S, D> MobileChangeUseCase<U, S, D>
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

    /// Send a confirmation code to the new number
    pub async fn request(&self, user_id: UserId, new_mobile_number: String) -> AuthResult<()> {
        let new_mobile = MobileNumber::new(new_mobile_number)?;

        self.ensure_available(user_id, &new_mobile).await?;

        request_code(
            self.otp_store.as_ref(),
            self.otp_delivery.as_ref(),
            &self.config,
            &profile_key(&new_mobile),
            &new_mobile,
        )
        .await?;

        tracing::info!(user_id = %user_id, "Mobile change code sent");

        Ok(())
    }

    /// Validate the code and move the account to the new number
    pub async fn confirm(
        &self,
        user_id: UserId,
        new_mobile_number: String,
        code: String,
    ) -> AuthResult<MobileChangeOutput> {
        let new_mobile = MobileNumber::new(new_mobile_number)?;

        validate_code(self.otp_store.as_ref(), &profile_key(&new_mobile), &code).await?;

        // Uniqueness may have changed while the code was in flight
        self.ensure_available(user_id, &new_mobile).await?;

        let user = self.user_repo.change_mobile(user_id, &new_mobile).await?;
        let token_pair = issue_pair(user.user_id, user.session_version, &self.config)?;

        tracing::info!(user_id = %user.user_id, "Mobile number changed");

        Ok(MobileChangeOutput { user, token_pair })
    }

    /// Fail if the number belongs to a different account
    async fn ensure_available(&self, user_id: UserId, mobile: &MobileNumber) -> AuthResult<()> {
        match self.user_repo.find_by_mobile(mobile).await? {
            Some(User {
                user_id: owner, ..
            }) if owner != user_id => Err(AuthError::MobileNumberTaken),
            _ => Ok(()),
        }
    }
}
