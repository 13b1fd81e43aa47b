//! Refresh Session Use Case
//!
//! Exchanges a valid refresh token for a fresh token pair.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::{TokenKind, TokenPair, issue_pair, verify_token};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Refresh input
pub struct RefreshInput {
    pub refresh_token: String,
}

/// Refresh session use case
pub struct RefreshSessionUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> RefreshSessionUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: RefreshInput) -> AuthResult<TokenPair> {
        let claims = verify_token(
            &input.refresh_token,
            &self.config.token_secret,
            TokenKind::Refresh,
        )?;

        let user = self
            .user_repo
            .find_by_id(claims.user_id())
            .await?
            .ok_or(AuthError::TokenInvalid)?;

        // A bumped session version retires every outstanding token
        if user.session_version != claims.ver {
            return Err(AuthError::TokenInvalid);
        }

        let pair = issue_pair(user.user_id, user.session_version, &self.config)?;

        tracing::debug!(user_id = %user.user_id, "Session refreshed");

        Ok(pair)
    }
}
