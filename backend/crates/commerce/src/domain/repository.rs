//! Repository Traits
//!
//! Interfaces for persistence and the outbound payment gateway.
//! Implementations live in the infrastructure layer.

use kernel::id::{CourseId, EBookId, TestSeriesId, UserId};

use crate::domain::entities::{Course, EBook, LibrarySubscription, Purchase, TestSeries};
use crate::domain::value_objects::{
    EbookFilter, GatewayOrderState, GrantOutcome, OrderRequest, Pagination,
};
use crate::error::CommerceResult;

/// Catalog repository trait
#[trait_variant::make(CatalogRepository: Send)]
pub trait LocalCatalogRepository {
    /// List active courses, newest first
    async fn list_courses(&self, page: Pagination) -> CommerceResult<Vec<Course>>;

    /// Find an active course
    async fn find_course(&self, course_id: CourseId) -> CommerceResult<Option<Course>>;

    /// List active test series, newest first
    async fn list_test_series(&self, page: Pagination) -> CommerceResult<Vec<TestSeries>>;

    /// Find an active test series
    async fn find_test_series(
        &self,
        test_series_id: TestSeriesId,
    ) -> CommerceResult<Option<TestSeries>>;
}

/// Entitlement repository trait
///
/// Grants rely on the store's partial unique indexes over active rows, so
/// concurrent duplicate grants collapse to one row.
#[trait_variant::make(EntitlementRepository: Send)]
pub trait LocalEntitlementRepository {
    /// Insert an active purchase row
    async fn grant_purchase(&self, purchase: &Purchase) -> CommerceResult<GrantOutcome>;

    /// Insert an active library subscription row
    async fn grant_subscription(
        &self,
        subscription: &LibrarySubscription,
    ) -> CommerceResult<GrantOutcome>;

    /// All active purchases for a user, newest first
    async fn list_purchases(&self, user_id: UserId) -> CommerceResult<Vec<Purchase>>;

    /// The user's active, unexpired library subscription, if any
    async fn find_subscription(
        &self,
        user_id: UserId,
    ) -> CommerceResult<Option<LibrarySubscription>>;
}

/// E-book repository trait
#[trait_variant::make(EbookRepository: Send)]
pub trait LocalEbookRepository {
    /// List active e-books matching the filter, newest first
    async fn list_ebooks(
        &self,
        filter: &EbookFilter,
        page: Pagination,
    ) -> CommerceResult<Vec<EBook>>;

    /// Count active e-books matching the filter
    async fn count_ebooks(&self, filter: &EbookFilter) -> CommerceResult<i64>;

    /// Find an active e-book
    async fn find_ebook(&self, ebook_id: EBookId) -> CommerceResult<Option<EBook>>;

    /// Create a new e-book row
    async fn create_ebook(&self, ebook: &EBook) -> CommerceResult<()>;

    /// Deactivate an e-book, returning the row for asset cleanup
    async fn deactivate_ebook(&self, ebook_id: EBookId) -> CommerceResult<Option<EBook>>;
}

/// Outbound payment gateway operations
#[trait_variant::make(PaymentGateway: Send)]
pub trait LocalPaymentGateway {
    /// Open an order and its hosted-checkout payment session
    async fn open_order(&self, request: &OrderRequest) -> CommerceResult<GatewayOrderState>;

    /// Look up an order's current settlement status
    async fn lookup_order(&self, order_id: &str) -> CommerceResult<GatewayOrderState>;
}
