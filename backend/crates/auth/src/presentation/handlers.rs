//! HTTP Handlers

use axum::Json;
use axum::extract::{Extension, State};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    AuthenticatedUser, LoginInput, LoginUseCase, MobileChangeUseCase, ProfileUseCase,
    RefreshInput, RefreshSessionUseCase, RegisterInput, RegisterUseCase, ResendOtpInput,
    ResendOtpUseCase, UpdateProfileInput, VerifyOtpInput, VerifyOtpUseCase,
};
use crate::domain::repository::{OtpDelivery, OtpStore, UserRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    AuthTokenResponse, LoginRequest, MessageResponse, MobileChangeConfirmRequest,
    MobileChangeRequest, RefreshRequest, RegisterRequest, ResendOtpRequest, TokenPairResponse,
    UpdateProfileRequest, UserResponse, VerifyOtpRequest,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<U, S, D>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: OtpStore + Clone + Send + Sync + 'static,
    D: OtpDelivery + Clone + Send + Sync + 'static,
{
    pub user_repo: Arc<U>,
    pub otp_store: Arc<S>,
    pub otp_delivery: Arc<D>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Registration & Login
// ============================================================================

/// POST /auth/register
pub async fn register<U, S, D>(
    State(state): State<AuthAppState<U, S, D>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: OtpStore + Clone + Send + Sync + 'static,
    D: OtpDelivery + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.user_repo.clone(),
        state.otp_store.clone(),
        state.otp_delivery.clone(),
        state.config.clone(),
    );

    use_case
        .execute(RegisterInput {
            name: req.name,
            mobile_number: req.mobile_number,
        })
        .await?;

    Ok(Json(MessageResponse {
        message: "Verification code sent".to_string(),
    }))
}

/// POST /auth/login
pub async fn login<U, S, D>(
    State(state): State<AuthAppState<U, S, D>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: OtpStore + Clone + Send + Sync + 'static,
    D: OtpDelivery + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.user_repo.clone(),
        state.otp_store.clone(),
        state.otp_delivery.clone(),
        state.config.clone(),
    );

    use_case
        .execute(LoginInput {
            mobile_number: req.mobile_number,
        })
        .await?;

    Ok(Json(MessageResponse {
        message: "Verification code sent".to_string(),
    }))
}

/// POST /auth/verify-otp
pub async fn verify_otp<U, S, D>(
    State(state): State<AuthAppState<U, S, D>>,
    Json(req): Json<VerifyOtpRequest>,
) -> AuthResult<Json<AuthTokenResponse>>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: OtpStore + Clone + Send + Sync + 'static,
    D: OtpDelivery + Clone + Send + Sync + 'static,
{
    let use_case = VerifyOtpUseCase::new(
        state.user_repo.clone(),
        state.otp_store.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(VerifyOtpInput {
            mobile_number: req.mobile_number,
            code: req.code,
        })
        .await?;

    Ok(Json(AuthTokenResponse {
        token: output.token_pair.access_token,
        refresh_token: output.token_pair.refresh_token,
        user: UserResponse::from_user(&output.user),
    }))
}

/// POST /auth/resend-otp
pub async fn resend_otp<U, S, D>(
    State(state): State<AuthAppState<U, S, D>>,
    Json(req): Json<ResendOtpRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: OtpStore + Clone + Send + Sync + 'static,
    D: OtpDelivery + Clone + Send + Sync + 'static,
{
    let use_case = ResendOtpUseCase::new(
        state.user_repo.clone(),
        state.otp_store.clone(),
        state.otp_delivery.clone(),
        state.config.clone(),
    );

    use_case
        .execute(ResendOtpInput {
            mobile_number: req.mobile_number,
        })
        .await?;

    Ok(Json(MessageResponse {
        message: "Verification code resent".to_string(),
    }))
}

// ============================================================================
// Tokens
// ============================================================================

/// POST /auth/refresh
pub async fn refresh<U, S, D>(
    State(state): State<AuthAppState<U, S, D>>,
    Json(req): Json<RefreshRequest>,
) -> AuthResult<Json<TokenPairResponse>>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: OtpStore + Clone + Send + Sync + 'static,
    D: OtpDelivery + Clone + Send + Sync + 'static,
{
    let use_case = RefreshSessionUseCase::new(state.user_repo.clone(), state.config.clone());

    let pair = use_case
        .execute(RefreshInput {
            refresh_token: req.refresh_token,
        })
        .await?;

    Ok(Json(TokenPairResponse {
        token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

// ============================================================================
// Profile
// ============================================================================

/// GET /auth/profile
pub async fn get_profile<U, S, D>(
    State(state): State<AuthAppState<U, S, D>>,
    Extension(current): Extension<AuthenticatedUser>,
) -> AuthResult<Json<UserResponse>>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: OtpStore + Clone + Send + Sync + 'static,
    D: OtpDelivery + Clone + Send + Sync + 'static,
{
    let use_case = ProfileUseCase::new(state.user_repo.clone());

    let user = use_case.get(current.user_id).await?;

    Ok(Json(UserResponse::from_user(&user)))
}

/// PUT /auth/profile
pub async fn update_profile<U, S, D>(
    State(state): State<AuthAppState<U, S, D>>,
    Extension(current): Extension<AuthenticatedUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> AuthResult<Json<UserResponse>>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: OtpStore + Clone + Send + Sync + 'static,
    D: OtpDelivery + Clone + Send + Sync + 'static,
{
    let use_case = ProfileUseCase::new(state.user_repo.clone());

    let user = use_case
        .update(
            current.user_id,
            UpdateProfileInput {
                name: req.name,
                email: req.email,
            },
        )
        .await?;

    Ok(Json(UserResponse::from_user(&user)))
}

/// POST /auth/profile/mobile/request
pub async fn request_mobile_change<U, S, D>(
    State(state): State<AuthAppState<U, S, D>>,
    Extension(current): Extension<AuthenticatedUser>,
    Json(req): Json<MobileChangeRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: OtpStore + Clone + Send + Sync + 'static,
    D: OtpDelivery + Clone + Send + Sync + 'static,
{
    let use_case = MobileChangeUseCase::new(
        state.user_repo.clone(),
        state.otp_store.clone(),
        state.otp_delivery.clone(),
        state.config.clone(),
    );

    use_case
        .request(current.user_id, req.new_mobile_number)
        .await?;

    Ok(Json(MessageResponse {
        message: "Verification code sent to new number".to_string(),
    }))
}

/// POST /auth/profile/mobile/confirm
pub async fn confirm_mobile_change<U, S, D>(
    State(state): State<AuthAppState<U, S, D>>,
    Extension(current): Extension<AuthenticatedUser>,
    Json(req): Json<MobileChangeConfirmRequest>,
) -> AuthResult<Json<AuthTokenResponse>>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: OtpStore + Clone + Send + Sync + 'static,
    D: OtpDelivery + Clone + Send + Sync + 'static,
{
    let use_case = MobileChangeUseCase::new(
        state.user_repo.clone(),
        state.otp_store.clone(),
        state.otp_delivery.clone(),
        state.config.clone(),
    );

    let output = use_case
        .confirm(current.user_id, req.new_mobile_number, req.code)
        .await?;

    Ok(Json(AuthTokenResponse {
        token: output.token_pair.access_token,
        refresh_token: output.token_pair.refresh_token,
        user: UserResponse::from_user(&output.user),
    }))
}
