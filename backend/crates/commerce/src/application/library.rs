//! Browse Library Use Case
//!
//! Read surface over the digital library. Listings and detail reads are
//! public and never leak document URLs; downloads are gated on an active
//! subscription.

use std::sync::Arc;

use kernel::id::{EBookId, UserId};

use crate::domain::entities::EBook;
use crate::domain::repository::{EbookRepository, EntitlementRepository};
use crate::domain::value_objects::{EbookFilter, Pagination};
use crate::error::{CommerceError, CommerceResult};

/// One page of the library listing plus the unpaged total
#[derive(Debug, Clone)]
pub struct EbookPageOutput {
    pub ebooks: Vec<EBook>,
    pub total: i64,
}

/// Download grant for a single e-book
#[derive(Debug, Clone)]
pub struct EbookDownload {
    pub title: String,
    pub download_url: String,
}

/// Browse library use case
pub struct BrowseLibraryUseCase<B, E>
where
    B: EbookRepository,
    E: EntitlementRepository,
{
    ebooks: Arc<B>,
    entitlements: Arc<E>,
}

impl<B, E> BrowseLibraryUseCase<B, E>
where
    B: EbookRepository,
    E: EntitlementRepository,
{
    pub fn new(ebooks: Arc<B>, entitlements: Arc<E>) -> Self {
        Self {
            ebooks,
            entitlements,
        }
    }

    pub async fn list(
        &self,
        filter: EbookFilter,
        page: Pagination,
    ) -> CommerceResult<EbookPageOutput> {
        let ebooks = self.ebooks.list_ebooks(&filter, page).await?;
        let total = self.ebooks.count_ebooks(&filter).await?;
        Ok(EbookPageOutput { ebooks, total })
    }

    pub async fn get(&self, ebook_id: EBookId) -> CommerceResult<EBook> {
        self.ebooks
            .find_ebook(ebook_id)
            .await?
            .ok_or(CommerceError::EbookNotFound)
    }

    /// Resolve the document URL for a subscriber.
    ///
    /// The subscription check runs before the e-book lookup, so callers
    /// without access learn nothing about which ids exist.
    pub async fn download(
        &self,
        user_id: UserId,
        ebook_id: EBookId,
    ) -> CommerceResult<EbookDownload> {
        let subscription = self.entitlements.find_subscription(user_id).await?;
        if !subscription.is_some_and(|s| s.is_active()) {
            return Err(CommerceError::SubscriptionRequired);
        }

        let ebook = self
            .ebooks
            .find_ebook(ebook_id)
            .await?
            .ok_or(CommerceError::EbookNotFound)?;

        tracing::info!(ebook_id = %ebook_id, user_id = %user_id, "E-book download granted");

        Ok(EbookDownload {
            title: ebook.title,
            download_url: ebook.document_url,
        })
    }
}
