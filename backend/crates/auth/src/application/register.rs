//! Register Use Case
//!
//! Creates an unverified user and sends a verification code.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::application::otp::{login_key, request_code};
use crate::domain::entity::user::User;
use crate::domain::repository::{OtpDelivery, OtpStore, UserRepository};
use crate::domain::value_object::{mobile_number::MobileNumber, user_name::UserName};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub name: String,
    pub mobile_number: String,
}

/// Register use case
pub struct RegisterUseCase<U, S, D>
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

impl<U, S, D> RegisterUseCase<U, S, D>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<()> {
        // Validate inputs
        let name = UserName::new(input.name)?;
        let mobile_number = MobileNumber::new(input.mobile_number)?;

        // Recycle abandoned registrations before the uniqueness check
        sweep_stale_unverified(self.user_repo.as_ref(), &self.config).await?;

        if self.user_repo.exists_by_mobile(&mobile_number).await? {
            return Err(AuthError::MobileNumberTaken);
        }

        let user = User::new(name, mobile_number.clone());
        self.user_repo.create(&user).await?;

        request_code(
            self.otp_store.as_ref(),
            self.otp_delivery.as_ref(),
            &self.config,
            &login_key(&mobile_number),
            &mobile_number,
        )
        .await?;

        tracing::info!(
            user_id = %user.user_id,
            "User registered, verification pending"
        );

        Ok(())
    }
}

/// Remove unverified users whose grace window has lapsed
pub(crate) async fn sweep_stale_unverified<U>(user_repo: &U, config: &AuthConfig) -> AuthResult<u64>
where
    U: UserRepository,
{
    let cutoff =
        Utc::now() - chrono::Duration::milliseconds(config.unverified_grace.as_millis() as i64);
    let removed = user_repo.delete_stale_unverified(cutoff).await?;
    if removed > 0 {
        tracing::info!(removed = removed, "Removed stale unverified users");
    }
    Ok(removed)
}
