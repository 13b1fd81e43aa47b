//! Commerce Router

use axum::handler::Handler;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use auth::domain::repository::UserRepository;
use auth::infra::postgres::PgUserRepository;
use auth::presentation::middleware::{AuthMiddlewareState, require_auth};
use platform::storage::{AnyFileStore, FileStore};

use crate::application::config::CommerceConfig;
use crate::domain::repository::{
    CatalogRepository, EbookRepository, EntitlementRepository, PaymentGateway,
};
use crate::infra::gateway::HttpPaymentGateway;
use crate::infra::postgres::PgCommerceRepository;
use crate::presentation::handlers::{self, CommerceAppState};

/// Create the commerce router with production implementations
pub fn commerce_router(
    repo: PgCommerceRepository,
    gateway: HttpPaymentGateway,
    file_store: AnyFileStore,
    auth: AuthMiddlewareState<PgUserRepository>,
    config: CommerceConfig,
) -> Router {
    commerce_router_generic(repo, gateway, file_store, auth, config)
}

/// Create a generic commerce router for any implementations
pub fn commerce_router_generic<R, G, F, U>(
    repo: R,
    gateway: G,
    file_store: F,
    auth: AuthMiddlewareState<U>,
    config: CommerceConfig,
) -> Router
where
    R: CatalogRepository
        + EntitlementRepository
        + EbookRepository
        + Clone
        + Send
        + Sync
        + 'static,
    G: PaymentGateway + Clone + Send + Sync + 'static,
    F: FileStore + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let state = CommerceAppState {
        repo: Arc::new(repo),
        gateway: Arc::new(gateway),
        file_store: Arc::new(file_store),
        config: Arc::new(config),
    };

    let auth_layer = axum::middleware::from_fn(move |req, next| {
        let state = auth.clone();
        async move { require_auth(state, req, next).await }
    });

    let public = Router::new()
        .route("/catalog/courses", get(handlers::list_courses::<R, G, F>))
        .route(
            "/catalog/courses/{id}",
            get(handlers::get_course::<R, G, F>),
        )
        .route(
            "/catalog/test-series",
            get(handlers::list_test_series::<R, G, F>),
        )
        .route(
            "/catalog/test-series/{id}",
            get(handlers::get_test_series::<R, G, F>),
        );

    let protected = Router::new()
        .route(
            "/payments/create-session",
            post(handlers::create_session::<R, G, F>),
        )
        .route("/payments/verify", post(handlers::verify::<R, G, F>))
        .route(
            "/payments/entitlements",
            get(handlers::list_entitlements::<R, G, F>),
        )
        .route(
            "/library/subscription",
            get(handlers::subscription_status::<R, G, F>),
        )
        .route(
            "/library/ebooks/{id}/download",
            get(handlers::download_ebook::<R, G, F>),
        )
        .route_layer(auth_layer.clone());

    // Listing and detail stay public while the write methods on the same
    // paths require a signed-in caller, so the auth layer wraps only the
    // write handlers.
    let library = Router::new()
        .route(
            "/library/ebooks",
            get(handlers::list_ebooks::<R, G, F>)
                .post(handlers::add_ebook::<R, G, F>.layer(auth_layer.clone())),
        )
        .route(
            "/library/ebooks/{id}",
            get(handlers::get_ebook::<R, G, F>)
                .delete(handlers::remove_ebook::<R, G, F>.layer(auth_layer)),
        );

    public.merge(protected).merge(library).with_state(state)
}
