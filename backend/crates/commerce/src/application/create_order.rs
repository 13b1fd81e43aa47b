//! Create Order Use Case
//!
//! Opens a gateway order and payment session for a purchasable item.
//! Nothing is persisted locally; entitlements are only written once the
//! gateway reports the order settled.

use std::sync::Arc;

use auth::application::check_session::AuthenticatedUser;
use chrono::Utc;
use kernel::id::{CourseId, TestSeriesId};
use uuid::Uuid;

use crate::application::config::CommerceConfig;
use crate::domain::repository::{CatalogRepository, PaymentGateway};
use crate::domain::services::build_order_id;
use crate::domain::value_objects::{CustomerProfile, ItemKind, OrderRequest};
use crate::error::{CommerceError, CommerceResult};

/// Gateway insists on an email; mobile-only accounts get a placeholder
const FALLBACK_EMAIL: &str = "test@example.com";

/// Create order input
#[derive(Debug, Clone)]
pub struct CreateOrderInput {
    pub kind: ItemKind,
    /// Required for course and test series, ignored for library
    pub item_id: Option<Uuid>,
}

/// Create order output
#[derive(Debug, Clone)]
pub struct CreateOrderOutput {
    pub order_id: String,
    /// Opaque handle that drives the hosted checkout on the client
    pub payment_session_id: String,
}

/// Create order use case
pub struct CreateOrderUseCase<C, G>
where
    C: CatalogRepository,
    G: PaymentGateway,
{
    catalog: Arc<C>,
    gateway: Arc<G>,
    config: Arc<CommerceConfig>,
}

impl<C, G> CreateOrderUseCase<C, G>
where
    C: CatalogRepository,
    G: PaymentGateway,
{
    pub fn new(catalog: Arc<C>, gateway: Arc<G>, config: Arc<CommerceConfig>) -> Self {
        Self {
            catalog,
            gateway,
            config,
        }
    }

    pub async fn execute(
        &self,
        buyer: &AuthenticatedUser,
        input: CreateOrderInput,
    ) -> CommerceResult<CreateOrderOutput> {
        // Price and title always come from the catalog or config, never
        // from the client. Conversion to minor units happens here only.
        let (item_ref, amount_minor, note) = match input.kind {
            ItemKind::Course => {
                let item_id = require_item_id(input.item_id)?;
                let course = self
                    .catalog
                    .find_course(CourseId::from_uuid(item_id))
                    .await?
                    .ok_or(CommerceError::ItemNotFound)?;
                (
                    item_id.to_string(),
                    course.price.to_minor(),
                    format!("Purchase of course: {}", course.title),
                )
            }
            ItemKind::TestSeries => {
                let item_id = require_item_id(input.item_id)?;
                let series = self
                    .catalog
                    .find_test_series(TestSeriesId::from_uuid(item_id))
                    .await?
                    .ok_or(CommerceError::ItemNotFound)?;
                (
                    item_id.to_string(),
                    series.price.to_minor(),
                    format!("Purchase of test series: {}", series.title),
                )
            }
            ItemKind::Library => (
                "LIFETIME".to_string(),
                self.config.library_plan_price_minor(),
                self.config.library_order_note.clone(),
            ),
        };

        let order_id = build_order_id(input.kind, &item_ref, Utc::now().timestamp_millis());

        let request = OrderRequest {
            order_id: order_id.clone(),
            amount_minor,
            currency: self.config.currency.clone(),
            customer: customer_profile(buyer),
            note: Some(note),
        };

        let order = self.gateway.open_order(&request).await?;
        let payment_session_id = order.payment_session_id.ok_or_else(|| {
            CommerceError::Gateway("gateway returned no payment session".to_string())
        })?;

        tracing::info!(
            order_id = %order_id,
            kind = %input.kind,
            amount_minor = amount_minor,
            "Gateway order opened"
        );

        Ok(CreateOrderOutput {
            order_id,
            payment_session_id,
        })
    }
}

fn require_item_id(item_id: Option<Uuid>) -> CommerceResult<Uuid> {
    item_id.ok_or_else(|| CommerceError::Validation("itemId is required".to_string()))
}

fn customer_profile(buyer: &AuthenticatedUser) -> CustomerProfile {
    CustomerProfile {
        customer_id: buyer.user_id.to_string(),
        name: buyer.name.as_str().to_string(),
        email: buyer
            .email
            .as_ref()
            .map(|e| e.as_str().to_string())
            .unwrap_or_else(|| FALLBACK_EMAIL.to_string()),
        phone: buyer.mobile_number.as_str().to_string(),
    }
}
