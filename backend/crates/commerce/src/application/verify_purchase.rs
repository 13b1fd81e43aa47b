//! Verify Purchase Use Case
//!
//! Confirms a gateway order against the gateway's own record and, when the
//! order has settled, grants the matching entitlement. Verification is
//! idempotent: repeating it for the same order leaves exactly one active
//! grant behind.

use std::sync::Arc;

use kernel::id::UserId;
use uuid::Uuid;

use crate::application::config::CommerceConfig;
use crate::domain::entities::{LibrarySubscription, Purchase};
use crate::domain::repository::{EntitlementRepository, PaymentGateway};
use crate::domain::value_objects::{GatewayOrderState, ItemKind};
use crate::error::{CommerceError, CommerceResult};

/// Verify purchase input
#[derive(Debug, Clone)]
pub struct VerifyPurchaseInput {
    pub order_id: String,
    pub kind: ItemKind,
    /// Required for course and test series, ignored for library
    pub item_id: Option<Uuid>,
}

/// Verify purchase output
#[derive(Debug, Clone)]
pub struct VerifyPurchaseOutput {
    /// Whether the caller holds the entitlement after this call
    pub enrolled: bool,
    /// Gateway's view of the order, echoed back to the client
    pub order: GatewayOrderState,
}

/// Verify purchase use case
pub struct VerifyPurchaseUseCase<E, G>
where
    E: EntitlementRepository,
    G: PaymentGateway,
{
    entitlements: Arc<E>,
    gateway: Arc<G>,
    config: Arc<CommerceConfig>,
}

impl<E, G> VerifyPurchaseUseCase<E, G>
where
    E: EntitlementRepository,
    G: PaymentGateway,
{
    pub fn new(entitlements: Arc<E>, gateway: Arc<G>, config: Arc<CommerceConfig>) -> Self {
        Self {
            entitlements,
            gateway,
            config,
        }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        input: VerifyPurchaseInput,
    ) -> CommerceResult<VerifyPurchaseOutput> {
        if input.order_id.trim().is_empty() {
            return Err(CommerceError::Validation("orderId is required".to_string()));
        }

        // The gateway is the source of truth for settlement. Client-supplied
        // status is never trusted.
        let order = self.gateway.lookup_order(&input.order_id).await?;

        if !order.is_paid() {
            tracing::info!(
                order_id = %order.order_id,
                status = %order.status,
                "Order not settled, no entitlement granted"
            );
            return Ok(VerifyPurchaseOutput {
                enrolled: false,
                order,
            });
        }

        let outcome = match input.kind {
            ItemKind::Course | ItemKind::TestSeries => {
                let item_id = input.item_id.ok_or_else(|| {
                    CommerceError::Validation("itemId is required".to_string())
                })?;
                let purchase =
                    Purchase::new(user_id, input.kind, item_id, order.order_id.clone());
                self.entitlements.grant_purchase(&purchase).await?
            }
            ItemKind::Library => {
                let subscription = LibrarySubscription::lifetime(
                    user_id,
                    self.config.library_plan_price_minor(),
                    order.order_id.clone(),
                );
                self.entitlements.grant_subscription(&subscription).await?
            }
        };

        if outcome.newly_granted() {
            tracing::info!(
                order_id = %order.order_id,
                kind = %input.kind,
                "Entitlement granted"
            );
        } else {
            tracing::debug!(
                order_id = %order.order_id,
                kind = %input.kind,
                "Entitlement already held, verification is a no-op"
            );
        }

        Ok(VerifyPurchaseOutput {
            enrolled: true,
            order,
        })
    }
}
