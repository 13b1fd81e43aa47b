//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{
    CourseId, EBookId, LibrarySubscriptionId, PurchaseId, TestSeriesId, UserId,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{Course, EBook, LibrarySubscription, Purchase, TestSeries};
use crate::domain::repository::{CatalogRepository, EbookRepository, EntitlementRepository};
use crate::domain::value_objects::{
    EbookFilter, GrantOutcome, ItemKind, Pagination, Price, PurchaseStatus, SubscriptionPlan,
};
use crate::error::{CommerceError, CommerceResult};

const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

/// PostgreSQL-backed commerce repository
#[derive(Clone)]
pub struct PgCommerceRepository {
    pool: PgPool,
}

impl PgCommerceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CatalogRepository for PgCommerceRepository {
    async fn list_courses(&self, page: Pagination) -> CommerceResult<Vec<Course>> {
        let rows = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT
                course_id,
                title,
                subtitle,
                description,
                price,
                duration,
                features,
                thumbnail_url,
                is_active,
                created_at,
                updated_at
            FROM courses
            WHERE is_active = TRUE
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CourseRow::into_course).collect()
    }

    async fn find_course(&self, course_id: CourseId) -> CommerceResult<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT
                course_id,
                title,
                subtitle,
                description,
                price,
                duration,
                features,
                thumbnail_url,
                is_active,
                created_at,
                updated_at
            FROM courses
            WHERE course_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(course_id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CourseRow::into_course).transpose()
    }

    async fn list_test_series(&self, page: Pagination) -> CommerceResult<Vec<TestSeries>> {
        let rows = sqlx::query_as::<_, TestSeriesRow>(
            r#"
            SELECT
                test_series_id,
                title,
                description,
                price,
                test_count,
                features,
                is_active,
                created_at,
                updated_at
            FROM test_series
            WHERE is_active = TRUE
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TestSeriesRow::into_test_series).collect()
    }

    async fn find_test_series(
        &self,
        series_id: TestSeriesId,
    ) -> CommerceResult<Option<TestSeries>> {
        let row = sqlx::query_as::<_, TestSeriesRow>(
            r#"
            SELECT
                test_series_id,
                title,
                description,
                price,
                test_count,
                features,
                is_active,
                created_at,
                updated_at
            FROM test_series
            WHERE test_series_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(series_id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TestSeriesRow::into_test_series).transpose()
    }
}

impl EntitlementRepository for PgCommerceRepository {
    async fn grant_purchase(&self, purchase: &Purchase) -> CommerceResult<GrantOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO purchases (
                purchase_id,
                user_id,
                item_kind,
                item_id,
                status,
                payment_ref,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(purchase.purchase_id.into_uuid())
        .bind(purchase.user_id.into_uuid())
        .bind(purchase.item_kind.as_str())
        .bind(purchase.item_id)
        .bind(purchase.status.as_str())
        .bind(&purchase.payment_ref)
        .bind(purchase.created_at)
        .bind(purchase.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                tracing::info!(
                    purchase_id = %purchase.purchase_id,
                    user_id = %purchase.user_id,
                    item_kind = %purchase.item_kind,
                    "Purchase granted"
                );
                Ok(GrantOutcome::Granted)
            }
            // The partial unique index over active rows already holds this
            // entitlement, so a duplicate insert collapses to a no-op.
            Err(e) if is_unique_violation(&e) => Ok(GrantOutcome::AlreadyGranted),
            Err(e) => Err(e.into()),
        }
    }

    async fn grant_subscription(
        &self,
        subscription: &LibrarySubscription,
    ) -> CommerceResult<GrantOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO library_subscriptions (
                subscription_id,
                user_id,
                plan,
                amount_minor,
                status,
                payment_ref,
                purchased_at,
                expires_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(subscription.subscription_id.into_uuid())
        .bind(subscription.user_id.into_uuid())
        .bind(subscription.plan.as_str())
        .bind(subscription.amount_minor)
        .bind(subscription.status.as_str())
        .bind(&subscription.payment_ref)
        .bind(subscription.purchased_at)
        .bind(subscription.expires_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                tracing::info!(
                    subscription_id = %subscription.subscription_id,
                    user_id = %subscription.user_id,
                    "Library subscription granted"
                );
                Ok(GrantOutcome::Granted)
            }
            Err(e) if is_unique_violation(&e) => Ok(GrantOutcome::AlreadyGranted),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_purchases(&self, user_id: UserId) -> CommerceResult<Vec<Purchase>> {
        let rows = sqlx::query_as::<_, PurchaseRow>(
            r#"
            SELECT
                purchase_id,
                user_id,
                item_kind,
                item_id,
                status,
                payment_ref,
                created_at,
                updated_at
            FROM purchases
            WHERE user_id = $1 AND status = 'active'
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.into_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PurchaseRow::into_purchase).collect()
    }

    async fn find_subscription(
        &self,
        user_id: UserId,
    ) -> CommerceResult<Option<LibrarySubscription>> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT
                subscription_id,
                user_id,
                plan,
                amount_minor,
                status,
                payment_ref,
                purchased_at,
                expires_at
            FROM library_subscriptions
            WHERE user_id = $1
              AND status = 'active'
              AND (expires_at IS NULL OR expires_at > NOW())
            ORDER BY purchased_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(SubscriptionRow::into_subscription).transpose()
    }
}

impl EbookRepository for PgCommerceRepository {
    async fn list_ebooks(
        &self,
        filter: &EbookFilter,
        page: Pagination,
    ) -> CommerceResult<Vec<EBook>> {
        let rows = sqlx::query_as::<_, EbookRow>(
            r#"
            SELECT
                ebook_id,
                title,
                subtitle,
                author,
                description,
                category,
                cover_image_url,
                document_url,
                file_size,
                pages,
                language,
                is_active,
                created_at,
                updated_at
            FROM ebooks
            WHERE is_active = TRUE
              AND ($1::TEXT IS NULL OR category = $1)
              AND ($2::TEXT IS NULL
                   OR title ILIKE '%' || $2 || '%'
                   OR subtitle ILIKE '%' || $2 || '%'
                   OR author ILIKE '%' || $2 || '%'
                   OR description ILIKE '%' || $2 || '%')
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filter.category.as_deref())
        .bind(filter.search.as_deref())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(EbookRow::into_ebook).collect())
    }

    async fn count_ebooks(&self, filter: &EbookFilter) -> CommerceResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM ebooks
            WHERE is_active = TRUE
              AND ($1::TEXT IS NULL OR category = $1)
              AND ($2::TEXT IS NULL
                   OR title ILIKE '%' || $2 || '%'
                   OR subtitle ILIKE '%' || $2 || '%'
                   OR author ILIKE '%' || $2 || '%'
                   OR description ILIKE '%' || $2 || '%')
            "#,
        )
        .bind(filter.category.as_deref())
        .bind(filter.search.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn find_ebook(&self, ebook_id: EBookId) -> CommerceResult<Option<EBook>> {
        let row = sqlx::query_as::<_, EbookRow>(
            r#"
            SELECT
                ebook_id,
                title,
                subtitle,
                author,
                description,
                category,
                cover_image_url,
                document_url,
                file_size,
                pages,
                language,
                is_active,
                created_at,
                updated_at
            FROM ebooks
            WHERE ebook_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(ebook_id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(EbookRow::into_ebook))
    }

    async fn create_ebook(&self, ebook: &EBook) -> CommerceResult<()> {
        sqlx::query(
            r#"
            INSERT INTO ebooks (
                ebook_id,
                title,
                subtitle,
                author,
                description,
                category,
                cover_image_url,
                document_url,
                file_size,
                pages,
                language,
                is_active,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(ebook.ebook_id.into_uuid())
        .bind(&ebook.title)
        .bind(&ebook.subtitle)
        .bind(&ebook.author)
        .bind(&ebook.description)
        .bind(&ebook.category)
        .bind(&ebook.cover_image_url)
        .bind(&ebook.document_url)
        .bind(&ebook.file_size)
        .bind(ebook.pages)
        .bind(&ebook.language)
        .bind(ebook.is_active)
        .bind(ebook.created_at)
        .bind(ebook.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(ebook_id = %ebook.ebook_id, "E-book created");

        Ok(())
    }

    async fn deactivate_ebook(&self, ebook_id: EBookId) -> CommerceResult<Option<EBook>> {
        let row = sqlx::query_as::<_, EbookRow>(
            r#"
            UPDATE ebooks
            SET is_active = FALSE,
                updated_at = NOW()
            WHERE ebook_id = $1 AND is_active = TRUE
            RETURNING
                ebook_id,
                title,
                subtitle,
                author,
                description,
                category,
                cover_image_url,
                document_url,
                file_size,
                pages,
                language,
                is_active,
                created_at,
                updated_at
            "#,
        )
        .bind(ebook_id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        if row.is_some() {
            tracing::info!(ebook_id = %ebook_id, "E-book deactivated");
        }

        Ok(row.map(EbookRow::into_ebook))
    }
}

// Internal row types for sqlx mapping
#[derive(sqlx::FromRow)]
struct CourseRow {
    course_id: Uuid,
    title: String,
    subtitle: Option<String>,
    description: Option<String>,
    price: i64,
    duration: Option<String>,
    features: Vec<String>,
    thumbnail_url: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CourseRow {
    fn into_course(self) -> CommerceResult<Course> {
        Ok(Course {
            course_id: CourseId::from_uuid(self.course_id),
            title: self.title,
            subtitle: self.subtitle,
            description: self.description,
            price: Price::new(self.price)
                .ok_or_else(|| CommerceError::Internal("negative price in course row".into()))?,
            duration: self.duration,
            features: self.features,
            thumbnail_url: self.thumbnail_url,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TestSeriesRow {
    test_series_id: Uuid,
    title: String,
    description: Option<String>,
    price: i64,
    test_count: i32,
    features: Vec<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TestSeriesRow {
    fn into_test_series(self) -> CommerceResult<TestSeries> {
        Ok(TestSeries {
            test_series_id: TestSeriesId::from_uuid(self.test_series_id),
            title: self.title,
            description: self.description,
            price: Price::new(self.price).ok_or_else(|| {
                CommerceError::Internal("negative price in test series row".into())
            })?,
            test_count: self.test_count,
            features: self.features,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct EbookRow {
    ebook_id: Uuid,
    title: String,
    subtitle: Option<String>,
    author: Option<String>,
    description: Option<String>,
    category: Option<String>,
    cover_image_url: String,
    document_url: String,
    file_size: String,
    pages: Option<i32>,
    language: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EbookRow {
    fn into_ebook(self) -> EBook {
        EBook {
            ebook_id: EBookId::from_uuid(self.ebook_id),
            title: self.title,
            subtitle: self.subtitle,
            author: self.author,
            description: self.description,
            category: self.category,
            cover_image_url: self.cover_image_url,
            document_url: self.document_url,
            file_size: self.file_size,
            pages: self.pages,
            language: self.language,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PurchaseRow {
    purchase_id: Uuid,
    user_id: Uuid,
    item_kind: String,
    item_id: Uuid,
    status: String,
    payment_ref: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PurchaseRow {
    fn into_purchase(self) -> CommerceResult<Purchase> {
        Ok(Purchase {
            purchase_id: PurchaseId::from_uuid(self.purchase_id),
            user_id: UserId::from_uuid(self.user_id),
            item_kind: ItemKind::parse(&self.item_kind).ok_or_else(|| {
                CommerceError::Internal(format!("unknown item kind: {}", self.item_kind))
            })?,
            item_id: self.item_id,
            status: PurchaseStatus::parse(&self.status).ok_or_else(|| {
                CommerceError::Internal(format!("unknown purchase status: {}", self.status))
            })?,
            payment_ref: self.payment_ref,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SubscriptionRow {
    subscription_id: Uuid,
    user_id: Uuid,
    plan: String,
    amount_minor: i64,
    status: String,
    payment_ref: String,
    purchased_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl SubscriptionRow {
    fn into_subscription(self) -> CommerceResult<LibrarySubscription> {
        Ok(LibrarySubscription {
            subscription_id: LibrarySubscriptionId::from_uuid(self.subscription_id),
            user_id: UserId::from_uuid(self.user_id),
            plan: SubscriptionPlan::parse(&self.plan).ok_or_else(|| {
                CommerceError::Internal(format!("unknown subscription plan: {}", self.plan))
            })?,
            amount_minor: self.amount_minor,
            status: PurchaseStatus::parse(&self.status).ok_or_else(|| {
                CommerceError::Internal(format!("unknown subscription status: {}", self.status))
            })?,
            payment_ref: self.payment_ref,
            purchased_at: self.purchased_at,
            expires_at: self.expires_at,
        })
    }
}
