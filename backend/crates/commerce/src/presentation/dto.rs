//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{Course, EBook, LibrarySubscription, Purchase, TestSeries};
use crate::domain::value_objects::{GatewayOrderState, Pagination};

// ============================================================================
// Payments
// ============================================================================

/// Create payment session request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    /// Item kind: "course", "testseries" or "library"
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub item_id: Option<Uuid>,
}

/// Create payment session response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub order_id: String,
    pub payment_session_id: String,
}

/// Verify payment request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub order_id: String,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub item_id: Option<Uuid>,
}

/// Gateway order as echoed back to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: String,
    pub order_status: String,
    pub order_amount: i64,
}

impl OrderResponse {
    pub fn from_state(state: &GatewayOrderState) -> Self {
        Self {
            order_id: state.order_id.clone(),
            order_status: state.status.clone(),
            order_amount: state.amount_minor,
        }
    }
}

/// Verify payment response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub success: bool,
    pub enrolled: bool,
    pub order: OrderResponse,
}

// ============================================================================
// Catalog
// ============================================================================

/// Page window query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit)
    }
}

/// Course as presented to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    /// Major currency units (rupees)
    pub price: i64,
    pub duration: Option<String>,
    pub features: Vec<String>,
    pub thumbnail_url: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl CourseResponse {
    pub fn from_course(course: &Course) -> Self {
        Self {
            id: course.course_id.into_uuid(),
            title: course.title.clone(),
            subtitle: course.subtitle.clone(),
            description: course.description.clone(),
            price: course.price.major(),
            duration: course.duration.clone(),
            features: course.features.clone(),
            thumbnail_url: course.thumbnail_url.clone(),
            is_active: course.is_active,
            created_at: course.created_at.to_rfc3339(),
        }
    }
}

/// Test series as presented to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSeriesResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Major currency units (rupees)
    pub price: i64,
    pub test_count: i32,
    pub features: Vec<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl TestSeriesResponse {
    pub fn from_test_series(series: &TestSeries) -> Self {
        Self {
            id: series.test_series_id.into_uuid(),
            title: series.title.clone(),
            description: series.description.clone(),
            price: series.price.major(),
            test_count: series.test_count,
            features: series.features.clone(),
            is_active: series.is_active,
            created_at: series.created_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Entitlements
// ============================================================================

/// Purchase as presented to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub item_type: String,
    pub item_id: Uuid,
    pub status: String,
    pub purchased_at: String,
}

impl PurchaseResponse {
    pub fn from_purchase(purchase: &Purchase) -> Self {
        Self {
            id: purchase.purchase_id.into_uuid(),
            item_type: purchase.item_kind.as_str().to_string(),
            item_id: purchase.item_id,
            status: purchase.status.as_str().to_string(),
            purchased_at: purchase.created_at.to_rfc3339(),
        }
    }
}

/// Library subscription as presented to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    #[serde(rename = "type")]
    pub plan: String,
    pub purchased_at: String,
    pub expires_at: Option<String>,
    pub status: String,
}

impl SubscriptionResponse {
    pub fn from_subscription(subscription: &LibrarySubscription) -> Self {
        Self {
            plan: subscription.plan.as_str().to_string(),
            purchased_at: subscription.purchased_at.to_rfc3339(),
            expires_at: subscription.expires_at.map(|e| e.to_rfc3339()),
            status: subscription.status.as_str().to_string(),
        }
    }
}

/// Response for GET /payments/entitlements
#[derive(Debug, Clone, Serialize)]
pub struct EntitlementsResponse {
    pub purchases: Vec<PurchaseResponse>,
    pub subscription: Option<SubscriptionResponse>,
}

/// Response for GET /library/subscription
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatusResponse {
    pub has_subscription: bool,
    pub subscription: Option<SubscriptionResponse>,
}

// ============================================================================
// Library
// ============================================================================

/// Library listing query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct EbookListQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// E-book as presented to clients
///
/// The document URL is deliberately absent; it is only handed out by the
/// download endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EbookResponse {
    pub id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub cover_image_url: String,
    pub file_size: String,
    pub pages: Option<i32>,
    pub language: String,
    pub created_at: String,
}

impl EbookResponse {
    pub fn from_ebook(ebook: &EBook) -> Self {
        Self {
            id: ebook.ebook_id.into_uuid(),
            title: ebook.title.clone(),
            subtitle: ebook.subtitle.clone(),
            author: ebook.author.clone(),
            description: ebook.description.clone(),
            category: ebook.category.clone(),
            cover_image_url: ebook.cover_image_url.clone(),
            file_size: ebook.file_size.clone(),
            pages: ebook.pages,
            language: ebook.language.clone(),
            created_at: ebook.created_at.to_rfc3339(),
        }
    }
}

/// Pagination envelope metadata
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl PaginationMeta {
    pub fn new(page: Pagination, total: i64) -> Self {
        let limit = page.limit();
        // i64::div_ceil is unstable (int_roundings); same computation on stable
        let (d, r) = (total / limit, total % limit);
        let pages = if (r > 0 && limit > 0) || (r < 0 && limit < 0) {
            d + 1
        } else {
            d
        };
        Self {
            page: page.page(),
            limit,
            total,
            pages,
        }
    }
}

/// Response for GET /library/ebooks
#[derive(Debug, Clone, Serialize)]
pub struct EbookListResponse {
    pub ebooks: Vec<EbookResponse>,
    pub pagination: PaginationMeta,
}

/// Response for GET /library/ebooks/{id}/download
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    pub download_url: String,
    pub title: String,
}

// ============================================================================
// Library administration
// ============================================================================

/// One base64-encoded file in an admin upload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetUploadDto {
    pub file_name: String,
    pub content_type: String,
    /// Base64 (standard alphabet) file content
    pub data: String,
}

/// Add e-book request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEbookRequest {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub pages: Option<i32>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub cover_image: Option<AssetUploadDto>,
    #[serde(default)]
    pub document: Option<AssetUploadDto>,
}

// ============================================================================
// Shared
// ============================================================================

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
