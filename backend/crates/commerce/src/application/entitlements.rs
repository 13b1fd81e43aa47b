//! List Entitlements Use Case
//!
//! Read surface over what a signed-in user already owns.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entities::{LibrarySubscription, Purchase};
use crate::domain::repository::EntitlementRepository;
use crate::error::CommerceResult;

/// Everything a user holds, in one shot
#[derive(Debug, Clone)]
pub struct EntitlementsOutput {
    pub purchases: Vec<Purchase>,
    pub subscription: Option<LibrarySubscription>,
}

/// List entitlements use case
pub struct ListEntitlementsUseCase<E>
where
    E: EntitlementRepository,
{
    entitlements: Arc<E>,
}

impl<E> ListEntitlementsUseCase<E>
where
    E: EntitlementRepository,
{
    pub fn new(entitlements: Arc<E>) -> Self {
        Self { entitlements }
    }

    pub async fn execute(&self, user_id: UserId) -> CommerceResult<EntitlementsOutput> {
        let purchases = self.entitlements.list_purchases(user_id).await?;
        let subscription = self.entitlements.find_subscription(user_id).await?;
        Ok(EntitlementsOutput {
            purchases,
            subscription,
        })
    }

    pub async fn subscription_status(
        &self,
        user_id: UserId,
    ) -> CommerceResult<Option<LibrarySubscription>> {
        self.entitlements.find_subscription(user_id).await
    }
}
