//! Profile Use Case
//!
//! Reads and updates the caller's own account.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::{AuthError, AuthResult};

/// Update profile input
pub struct UpdateProfileInput {
    pub name: String,
    /// Left unchanged when absent
    pub email: Option<String>,
}

/// Profile use case
pub struct ProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn get(&self, user_id: UserId) -> AuthResult<User> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn update(&self, user_id: UserId, input: UpdateProfileInput) -> AuthResult<User> {
        let name = UserName::new(input.name)?;
        let email = input.email.map(Email::new).transpose()?;

        let user = self
            .user_repo
            .update_profile(user_id, &name, email.as_ref())
            .await?;

        tracing::info!(user_id = %user.user_id, "Profile updated");

        Ok(user)
    }
}
