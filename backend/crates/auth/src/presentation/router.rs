//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{OtpDelivery, OtpStore, UserRepository};
use crate::infra::memory::InMemoryOtpStore;
use crate::infra::postgres::PgUserRepository;
use crate::infra::sms::SmsOtpDelivery;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, require_auth};

/// Create the auth router with production implementations
pub fn auth_router(
    user_repo: PgUserRepository,
    otp_store: InMemoryOtpStore,
    otp_delivery: SmsOtpDelivery,
    config: AuthConfig,
) -> Router {
    auth_router_generic(user_repo, otp_store, otp_delivery, config)
}

/// Create a generic auth router for any implementations
pub fn auth_router_generic<U, S, D>(
    user_repo: U,
    otp_store: S,
    otp_delivery: D,
    config: AuthConfig,
) -> Router
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: OtpStore + Clone + Send + Sync + 'static,
    D: OtpDelivery + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        user_repo: Arc::new(user_repo),
        otp_store: Arc::new(otp_store),
        otp_delivery: Arc::new(otp_delivery),
        config: Arc::new(config),
    };

    let mw_state = AuthMiddlewareState {
        user_repo: state.user_repo.clone(),
        config: state.config.clone(),
    };

    let public = Router::new()
        .route("/register", post(handlers::register::<U, S, D>))
        .route("/login", post(handlers::login::<U, S, D>))
        .route("/verify-otp", post(handlers::verify_otp::<U, S, D>))
        .route("/resend-otp", post(handlers::resend_otp::<U, S, D>))
        .route("/refresh", post(handlers::refresh::<U, S, D>));

    let protected = Router::new()
        .route(
            "/profile",
            get(handlers::get_profile::<U, S, D>).put(handlers::update_profile::<U, S, D>),
        )
        .route(
            "/profile/mobile/request",
            post(handlers::request_mobile_change::<U, S, D>),
        )
        .route(
            "/profile/mobile/confirm",
            post(handlers::confirm_mobile_change::<U, S, D>),
        )
        .route_layer(axum::middleware::from_fn(move |req, next| {
            let state = mw_state.clone();
            async move { require_auth(state, req, next).await }
        }));

    public.merge(protected).with_state(state)
}
