//! Commerce Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases
//! - `infra/` - Database, gateway and storage adapters
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Payment Model
//! - Backend is the sole authority for prices and order amounts; clients only name items
//! - Settlement status comes from a gateway lookup, never from the client
//! - Entitlement grants are idempotent: at most one active row per user and item
//! - Catalog prices are major units; conversion to paise happens once, at order creation

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::CommerceConfig;
pub use error::{CommerceError, CommerceResult};
pub use infra::gateway::HttpPaymentGateway;
pub use infra::postgres::PgCommerceRepository;
pub use presentation::router::commerce_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgCommerceRepository as CommerceStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}
