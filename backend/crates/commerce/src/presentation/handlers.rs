//! HTTP Handlers

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::sync::Arc;
use uuid::Uuid;

use auth::application::check_session::AuthenticatedUser;
use kernel::id::{CourseId, EBookId, TestSeriesId};
use platform::storage::FileStore;

use crate::application::catalog::BrowseCatalogUseCase;
use crate::application::config::CommerceConfig;
use crate::application::create_order::{CreateOrderInput, CreateOrderUseCase};
use crate::application::entitlements::ListEntitlementsUseCase;
use crate::application::library::BrowseLibraryUseCase;
use crate::application::manage_library::{AddEbookInput, AssetUpload, ManageLibraryUseCase};
use crate::application::verify_purchase::{VerifyPurchaseInput, VerifyPurchaseUseCase};
use crate::domain::entities::EbookDraft;
use crate::domain::repository::{
    CatalogRepository, EbookRepository, EntitlementRepository, PaymentGateway,
};
use crate::domain::value_objects::{EbookFilter, ItemKind, Pagination};
use crate::error::{CommerceError, CommerceResult};
use crate::presentation::dto::{
    AddEbookRequest, AssetUploadDto, CourseResponse, CreateSessionRequest, CreateSessionResponse,
    DownloadResponse, EbookListQuery, EbookListResponse, EbookResponse, EntitlementsResponse,
    MessageResponse, OrderResponse, PageQuery, PaginationMeta, PurchaseResponse,
    SubscriptionResponse, SubscriptionStatusResponse, TestSeriesResponse, VerifyRequest,
    VerifyResponse,
};

/// Shared state for commerce handlers
#[derive(Clone)]
pub struct CommerceAppState<R, G, F>
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
{
    pub repo: Arc<R>,
    pub gateway: Arc<G>,
    pub file_store: Arc<F>,
    pub config: Arc<CommerceConfig>,
}

fn parse_item_kind(raw: &str) -> CommerceResult<ItemKind> {
    ItemKind::parse(raw)
        .ok_or_else(|| CommerceError::Validation(format!("unknown item type: {raw}")))
}

// ============================================================================
// Payments
// ============================================================================

/// POST /payments/create-session
pub async fn create_session<R, G, F>(
    State(state): State<CommerceAppState<R, G, F>>,
    Extension(current): Extension<AuthenticatedUser>,
    Json(req): Json<CreateSessionRequest>,
) -> CommerceResult<Json<CreateSessionResponse>>
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
{
    let kind = parse_item_kind(&req.item_type)?;

    let use_case = CreateOrderUseCase::new(
        state.repo.clone(),
        state.gateway.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(
            &current,
            CreateOrderInput {
                kind,
                item_id: req.item_id,
            },
        )
        .await?;

    Ok(Json(CreateSessionResponse {
        order_id: output.order_id,
        payment_session_id: output.payment_session_id,
    }))
}

/// POST /payments/verify
pub async fn verify<R, G, F>(
    State(state): State<CommerceAppState<R, G, F>>,
    Extension(current): Extension<AuthenticatedUser>,
    Json(req): Json<VerifyRequest>,
) -> CommerceResult<Json<VerifyResponse>>
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
{
    let kind = parse_item_kind(&req.item_type)?;

    let use_case = VerifyPurchaseUseCase::new(
        state.repo.clone(),
        state.gateway.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(
            current.user_id,
            VerifyPurchaseInput {
                order_id: req.order_id,
                kind,
                item_id: req.item_id,
            },
        )
        .await?;

    Ok(Json(VerifyResponse {
        success: output.enrolled,
        enrolled: output.enrolled,
        order: OrderResponse::from_state(&output.order),
    }))
}

/// GET /payments/entitlements
pub async fn list_entitlements<R, G, F>(
    State(state): State<CommerceAppState<R, G, F>>,
    Extension(current): Extension<AuthenticatedUser>,
) -> CommerceResult<Json<EntitlementsResponse>>
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
{
    let use_case = ListEntitlementsUseCase::new(state.repo.clone());

    let output = use_case.execute(current.user_id).await?;

    Ok(Json(EntitlementsResponse {
        purchases: output
            .purchases
            .iter()
            .map(PurchaseResponse::from_purchase)
            .collect(),
        subscription: output
            .subscription
            .as_ref()
            .map(SubscriptionResponse::from_subscription),
    }))
}

// ============================================================================
// Catalog
// ============================================================================

/// GET /catalog/courses
pub async fn list_courses<R, G, F>(
    State(state): State<CommerceAppState<R, G, F>>,
    Query(query): Query<PageQuery>,
) -> CommerceResult<Json<Vec<CourseResponse>>>
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
{
    let use_case = BrowseCatalogUseCase::new(state.repo.clone());

    let courses = use_case.list_courses(query.pagination()).await?;

    Ok(Json(
        courses.iter().map(CourseResponse::from_course).collect(),
    ))
}

/// GET /catalog/courses/{id}
pub async fn get_course<R, G, F>(
    State(state): State<CommerceAppState<R, G, F>>,
    Path(id): Path<Uuid>,
) -> CommerceResult<Json<CourseResponse>>
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
{
    let use_case = BrowseCatalogUseCase::new(state.repo.clone());

    let course = use_case.get_course(CourseId::from_uuid(id)).await?;

    Ok(Json(CourseResponse::from_course(&course)))
}

/// GET /catalog/test-series
pub async fn list_test_series<R, G, F>(
    State(state): State<CommerceAppState<R, G, F>>,
    Query(query): Query<PageQuery>,
) -> CommerceResult<Json<Vec<TestSeriesResponse>>>
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
{
    let use_case = BrowseCatalogUseCase::new(state.repo.clone());

    let series = use_case.list_test_series(query.pagination()).await?;

    Ok(Json(
        series
            .iter()
            .map(TestSeriesResponse::from_test_series)
            .collect(),
    ))
}

/// GET /catalog/test-series/{id}
pub async fn get_test_series<R, G, F>(
    State(state): State<CommerceAppState<R, G, F>>,
    Path(id): Path<Uuid>,
) -> CommerceResult<Json<TestSeriesResponse>>
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
{
    let use_case = BrowseCatalogUseCase::new(state.repo.clone());

    let series = use_case
        .get_test_series(TestSeriesId::from_uuid(id))
        .await?;

    Ok(Json(TestSeriesResponse::from_test_series(&series)))
}

// ============================================================================
// Library
// ============================================================================

/// GET /library/ebooks
pub async fn list_ebooks<R, G, F>(
    State(state): State<CommerceAppState<R, G, F>>,
    Query(query): Query<EbookListQuery>,
) -> CommerceResult<Json<EbookListResponse>>
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
{
    let use_case = BrowseLibraryUseCase::new(state.repo.clone(), state.repo.clone());

    let filter = EbookFilter::new(query.category, query.search);
    let page = Pagination::new(query.page, query.limit);

    let output = use_case.list(filter, page).await?;

    Ok(Json(EbookListResponse {
        ebooks: output.ebooks.iter().map(EbookResponse::from_ebook).collect(),
        pagination: PaginationMeta::new(page, output.total),
    }))
}

/// GET /library/ebooks/{id}
pub async fn get_ebook<R, G, F>(
    State(state): State<CommerceAppState<R, G, F>>,
    Path(id): Path<Uuid>,
) -> CommerceResult<Json<EbookResponse>>
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
{
    let use_case = BrowseLibraryUseCase::new(state.repo.clone(), state.repo.clone());

    let ebook = use_case.get(EBookId::from_uuid(id)).await?;

    Ok(Json(EbookResponse::from_ebook(&ebook)))
}

/// GET /library/ebooks/{id}/download
pub async fn download_ebook<R, G, F>(
    State(state): State<CommerceAppState<R, G, F>>,
    Extension(current): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> CommerceResult<Json<DownloadResponse>>
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
{
    let use_case = BrowseLibraryUseCase::new(state.repo.clone(), state.repo.clone());

    let download = use_case
        .download(current.user_id, EBookId::from_uuid(id))
        .await?;

    Ok(Json(DownloadResponse {
        download_url: download.download_url,
        title: download.title,
    }))
}

/// GET /library/subscription
pub async fn subscription_status<R, G, F>(
    State(state): State<CommerceAppState<R, G, F>>,
    Extension(current): Extension<AuthenticatedUser>,
) -> CommerceResult<Json<SubscriptionStatusResponse>>
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
{
    let use_case = ListEntitlementsUseCase::new(state.repo.clone());

    let subscription = use_case.subscription_status(current.user_id).await?;

    Ok(Json(SubscriptionStatusResponse {
        has_subscription: subscription.is_some(),
        subscription: subscription
            .as_ref()
            .map(SubscriptionResponse::from_subscription),
    }))
}

// ============================================================================
// Library administration
// ============================================================================

/// POST /library/ebooks
pub async fn add_ebook<R, G, F>(
    State(state): State<CommerceAppState<R, G, F>>,
    Extension(current): Extension<AuthenticatedUser>,
    Json(req): Json<AddEbookRequest>,
) -> CommerceResult<impl IntoResponse>
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
{
    let (cover, document) = match (req.cover_image, req.document) {
        (Some(cover), Some(document)) => (decode_asset(cover)?, decode_asset(document)?),
        _ => {
            return Err(CommerceError::Validation(
                "Cover image and document file are required".to_string(),
            ));
        }
    };

    let use_case = ManageLibraryUseCase::new(state.repo.clone(), state.file_store.clone());

    let ebook = use_case
        .add(
            &current,
            AddEbookInput {
                draft: EbookDraft {
                    title: req.title,
                    subtitle: req.subtitle,
                    author: req.author,
                    description: req.description,
                    category: req.category,
                    pages: req.pages,
                    language: req.language,
                },
                cover,
                document,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(EbookResponse::from_ebook(&ebook))))
}

/// DELETE /library/ebooks/{id}
pub async fn remove_ebook<R, G, F>(
    State(state): State<CommerceAppState<R, G, F>>,
    Extension(current): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> CommerceResult<Json<MessageResponse>>
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
{
    let use_case = ManageLibraryUseCase::new(state.repo.clone(), state.file_store.clone());

    use_case.remove(&current, EBookId::from_uuid(id)).await?;

    Ok(Json(MessageResponse {
        message: "E-book removed".to_string(),
    }))
}

fn decode_asset(dto: AssetUploadDto) -> CommerceResult<AssetUpload> {
    let bytes = platform::crypto::from_base64(&dto.data)
        .map_err(|_| CommerceError::Validation("invalid base64 file content".to_string()))?;

    Ok(AssetUpload {
        file_name: dto.file_name,
        content_type: dto.content_type,
        bytes,
    })
}
