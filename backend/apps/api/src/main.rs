//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use auth::domain::repository::UserRepository;
use auth::middleware::AuthMiddlewareState;
use auth::{AuthConfig, InMemoryOtpStore, PgUserRepository, SmsOtpDelivery, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use chrono::Utc;
use commerce::{CommerceConfig, HttpPaymentGateway, PgCommerceRepository, commerce_router};
use platform::payment::{GatewayClient, GatewayConfig};
use platform::sms::{SmsClient, SmsConfig};
use platform::storage::{AnyFileStore, DiskStore, HttpBucketStore};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,commerce=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Auth configuration
    let auth_config = if cfg!(debug_assertions) {
        AuthConfig::with_random_secret()
    } else {
        // In production, load secret from environment
        let secret_b64 =
            env::var("TOKEN_SECRET").expect("TOKEN_SECRET must be set in production");
        let secret_bytes = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&secret_bytes);
        AuthConfig {
            token_secret: secret,
            ..AuthConfig::default()
        }
    };

    // Startup cleanup: reclaim unverified accounts past the grace period
    // Errors here should not prevent server startup
    let user_repo = PgUserRepository::new(pool.clone());
    let cutoff = Utc::now() - chrono::Duration::from_std(auth_config.unverified_grace)?;
    match user_repo.delete_stale_unverified(cutoff).await {
        Ok(deleted) => {
            tracing::info!(
                users_deleted = deleted,
                "Unverified account cleanup completed"
            );
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Unverified account cleanup failed, continuing anyway"
            );
        }
    }

    // SMS provider
    let sms_api_key = env::var("SMS_API_KEY").unwrap_or_else(|_| {
        tracing::warn!("SMS_API_KEY not set, verification SMS will fail");
        String::new()
    });
    let otp_delivery = SmsOtpDelivery::new(SmsClient::new(SmsConfig::new(sms_api_key))?);

    // Payment gateway
    let gateway_client_id = env::var("PAYMENT_CLIENT_ID").unwrap_or_else(|_| {
        tracing::warn!("PAYMENT_CLIENT_ID not set, gateway orders will fail");
        String::new()
    });
    let gateway_client_secret = env::var("PAYMENT_CLIENT_SECRET").unwrap_or_default();
    let gateway_config = if cfg!(debug_assertions) {
        GatewayConfig::sandbox(gateway_client_id, gateway_client_secret)
    } else {
        GatewayConfig::production(gateway_client_id, gateway_client_secret)
    };
    let gateway = HttpPaymentGateway::new(GatewayClient::new(gateway_config)?);

    // Asset storage
    let file_store = match env::var("FILE_STORE").as_deref() {
        Ok("bucket") => {
            let base_url = env::var("BUCKET_URL").expect("BUCKET_URL must be set for bucket store");
            let api_key = env::var("BUCKET_API_KEY")
                .expect("BUCKET_API_KEY must be set for bucket store");
            AnyFileStore::Bucket(HttpBucketStore::new(
                base_url,
                api_key,
                "ebooks",
                Duration::from_secs(30),
            )?)
        }
        _ => {
            let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string());
            let public_base = env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:31113/uploads".to_string());
            AnyFileStore::Disk(DiskStore::new(upload_dir, public_base, "ebooks"))
        }
    };

    // Commerce configuration
    let mut commerce_config = CommerceConfig::default();
    if let Some(price) = env::var("LIBRARY_PLAN_PRICE")
        .ok()
        .and_then(|p| p.parse().ok())
    {
        commerce_config.library_plan_price = price;
    }

    let commerce_repo = PgCommerceRepository::new(pool.clone());
    let auth_middleware = AuthMiddlewareState {
        user_repo: Arc::new(user_repo.clone()),
        config: Arc::new(auth_config.clone()),
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest(
            "/api/auth",
            auth_router(
                user_repo,
                InMemoryOtpStore::new(),
                otp_delivery,
                auth_config,
            ),
        )
        .nest(
            "/api",
            commerce_router(
                commerce_repo,
                gateway,
                file_store,
                auth_middleware,
                commerce_config,
            ),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(31113);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
