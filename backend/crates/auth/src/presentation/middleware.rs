//! Auth Middleware
//!
//! Middleware for requiring a bearer token on protected routes.

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::client::extract_client_ip;
use std::sync::Arc;

use crate::application::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<U>
where
    U: UserRepository + Clone + Send + Sync + 'static,
{
    pub user_repo: Arc<U>,
    pub config: Arc<AuthConfig>,
}

/// Middleware that requires a valid access token
///
/// On success the resolved identity is stored in request extensions for
/// downstream handlers.
pub async fn require_auth<U>(
    state: AuthMiddlewareState<U>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let headers = req.headers();

    let client_ip = req
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip());
    let client_ip = extract_client_ip(headers, client_ip);

    let token = match bearer_token(headers) {
        Some(token) => token.to_string(),
        None => {
            tracing::debug!(client_ip = ?client_ip, "Missing bearer token");
            return Err(unauthorized());
        }
    };

    let use_case = CheckSessionUseCase::new(state.user_repo.clone(), state.config.clone());

    let user = match use_case.execute(&token).await {
        Ok(user) => user,
        Err(e) if e.status_code() == StatusCode::UNAUTHORIZED => {
            tracing::debug!(client_ip = ?client_ip, "Rejected bearer token");
            return Err(unauthorized());
        }
        Err(e) => return Err(e.into_response()),
    };

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Extract the token from an Authorization: Bearer header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, [("X-Auth-Required", "true")]).into_response()
}
