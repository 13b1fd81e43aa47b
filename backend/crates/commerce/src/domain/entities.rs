//! Domain Entities
//!
//! Core business entities for the commerce domain.

use chrono::{DateTime, Utc};
use kernel::id::{CourseId, EBookId, LibrarySubscriptionId, PurchaseId, TestSeriesId, UserId};
use uuid::Uuid;

use crate::domain::value_objects::{ItemKind, Price, PurchaseStatus, SubscriptionPlan};

/// Course catalog entry
#[derive(Debug, Clone)]
pub struct Course {
    pub course_id: CourseId,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    /// Major currency units (rupees)
    pub price: Price,
    /// Display label, e.g. "6 months"
    pub duration: Option<String>,
    pub features: Vec<String>,
    pub thumbnail_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Test series catalog entry
#[derive(Debug, Clone)]
pub struct TestSeries {
    pub test_series_id: TestSeriesId,
    pub title: String,
    pub description: Option<String>,
    /// Major currency units (rupees)
    pub price: Price,
    pub test_count: i32,
    pub features: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Digital library e-book
#[derive(Debug, Clone)]
pub struct EBook {
    pub ebook_id: EBookId,
    pub title: String,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub cover_image_url: String,
    /// Never exposed through catalog reads, only via the gated download
    pub document_url: String,
    /// Display label, e.g. "15.2 MB"
    pub file_size: String,
    pub pages: Option<i32>,
    pub language: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Metadata supplied when an e-book is added
#[derive(Debug, Clone)]
pub struct EbookDraft {
    pub title: String,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub pages: Option<i32>,
    pub language: Option<String>,
}

impl EBook {
    pub const DEFAULT_LANGUAGE: &'static str = "English";

    /// Create a new active e-book from uploaded assets
    pub fn new(
        draft: EbookDraft,
        cover_image_url: String,
        document_url: String,
        file_size: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            ebook_id: EBookId::new(),
            title: draft.title,
            subtitle: draft.subtitle,
            author: draft.author,
            description: draft.description,
            category: draft.category,
            cover_image_url,
            document_url,
            file_size,
            pages: draft.pages,
            language: draft
                .language
                .unwrap_or_else(|| Self::DEFAULT_LANGUAGE.to_string()),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Course or test series entitlement
///
/// Library access lives in its own table; `item_kind` here is only ever
/// `course` or `testseries`.
#[derive(Debug, Clone)]
pub struct Purchase {
    pub purchase_id: PurchaseId,
    pub user_id: UserId,
    pub item_kind: ItemKind,
    pub item_id: Uuid,
    pub status: PurchaseStatus,
    /// Gateway order id the grant settled under
    pub payment_ref: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Purchase {
    /// Create an active purchase from a settled gateway order
    pub fn new(user_id: UserId, item_kind: ItemKind, item_id: Uuid, payment_ref: String) -> Self {
        let now = Utc::now();
        Self {
            purchase_id: PurchaseId::new(),
            user_id,
            item_kind,
            item_id,
            status: PurchaseStatus::Active,
            payment_ref,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Digital library subscription
#[derive(Debug, Clone)]
pub struct LibrarySubscription {
    pub subscription_id: LibrarySubscriptionId,
    pub user_id: UserId,
    pub plan: SubscriptionPlan,
    /// Minor currency units (paise)
    pub amount_minor: i64,
    pub status: PurchaseStatus,
    pub payment_ref: String,
    pub purchased_at: DateTime<Utc>,
    /// None for lifetime plans
    pub expires_at: Option<DateTime<Utc>>,
}

impl LibrarySubscription {
    /// Create an active lifetime subscription from a settled gateway order
    pub fn lifetime(user_id: UserId, amount_minor: i64, payment_ref: String) -> Self {
        Self {
            subscription_id: LibrarySubscriptionId::new(),
            user_id,
            plan: SubscriptionPlan::Lifetime,
            amount_minor,
            status: PurchaseStatus::Active,
            payment_ref,
            purchased_at: Utc::now(),
            expires_at: None,
        }
    }

    /// Active and not past its expiry, if it has one
    pub fn is_active(&self) -> bool {
        self.status == PurchaseStatus::Active
            && self.expires_at.is_none_or(|e| e > Utc::now())
    }
}
