//! Check Session Use Case
//!
//! Verifies a bearer token and resolves the caller's identity.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::AuthConfig;
use crate::application::token::{TokenKind, verify_token};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, mobile_number::MobileNumber, user_name::UserName,
};
use crate::error::{AuthError, AuthResult};

/// Identity resolved from a valid access token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub name: UserName,
    pub mobile_number: MobileNumber,
    pub email: Option<Email>,
    pub is_admin: bool,
}

/// Check session use case
pub struct CheckSessionUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> CheckSessionUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Authenticate a request by its access token
    ///
    /// Signature, expiry, kind and session version must all hold. Every
    /// failure maps to the same opaque error.
    pub async fn execute(&self, token: &str) -> AuthResult<AuthenticatedUser> {
        let claims = verify_token(token, &self.config.token_secret, TokenKind::Access)?;

        let user = self
            .user_repo
            .find_by_id(claims.user_id())
            .await?
            .ok_or(AuthError::TokenInvalid)?;

        if user.session_version != claims.ver {
            return Err(AuthError::TokenInvalid);
        }

        Ok(AuthenticatedUser {
            user_id: user.user_id,
            name: user.name,
            mobile_number: user.mobile_number,
            email: user.email,
            is_admin: user.is_admin,
        })
    }
}
