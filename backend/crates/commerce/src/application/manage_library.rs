//! Manage Library Use Case
//!
//! Admin-only writes to the digital library: publishing new e-books with
//! their assets and retiring existing ones. Admin rights are checked here
//! rather than in routing, so every caller path gets the same answer.

use std::sync::Arc;

use auth::application::check_session::AuthenticatedUser;
use kernel::id::EBookId;
use platform::storage::FileStore;

use crate::domain::entities::{EBook, EbookDraft};
use crate::domain::repository::EbookRepository;
use crate::error::{CommerceError, CommerceResult};

/// One uploaded file, already decoded to raw bytes
#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Add e-book input
#[derive(Debug, Clone)]
pub struct AddEbookInput {
    pub draft: EbookDraft,
    pub cover: AssetUpload,
    pub document: AssetUpload,
}

/// Manage library use case
pub struct ManageLibraryUseCase<B, F>
where
    B: EbookRepository,
    F: FileStore,
{
    ebooks: Arc<B>,
    file_store: Arc<F>,
}

impl<B, F> ManageLibraryUseCase<B, F>
where
    B: EbookRepository,
    F: FileStore,
{
    pub fn new(ebooks: Arc<B>, file_store: Arc<F>) -> Self {
        Self { ebooks, file_store }
    }

    pub async fn add(
        &self,
        actor: &AuthenticatedUser,
        input: AddEbookInput,
    ) -> CommerceResult<EBook> {
        ensure_admin(actor)?;

        if input.draft.title.trim().is_empty() {
            return Err(CommerceError::Validation("title is required".to_string()));
        }
        if input.cover.bytes.is_empty() || input.document.bytes.is_empty() {
            return Err(CommerceError::Validation(
                "Cover image and document file are required".to_string(),
            ));
        }

        let file_size = display_size(input.document.bytes.len());

        let cover_image_url = self
            .file_store
            .store(
                &input.cover.file_name,
                &input.cover.content_type,
                &input.cover.bytes,
            )
            .await?;
        let document_url = self
            .file_store
            .store(
                &input.document.file_name,
                &input.document.content_type,
                &input.document.bytes,
            )
            .await?;

        let ebook = EBook::new(input.draft, cover_image_url, document_url, file_size);

        if let Err(err) = self.ebooks.create_ebook(&ebook).await {
            // Row never landed, keep the store from leaking orphans
            self.discard(&ebook.cover_image_url).await;
            self.discard(&ebook.document_url).await;
            return Err(err);
        }

        tracing::info!(ebook_id = %ebook.ebook_id, title = %ebook.title, "E-book published");
        Ok(ebook)
    }

    /// Retire an e-book and clean up its stored assets.
    ///
    /// The row is deactivated, not deleted, so existing references stay
    /// resolvable. Asset deletion failures are logged and swallowed.
    pub async fn remove(&self, actor: &AuthenticatedUser, ebook_id: EBookId) -> CommerceResult<()> {
        ensure_admin(actor)?;

        let ebook = self
            .ebooks
            .deactivate_ebook(ebook_id)
            .await?
            .ok_or(CommerceError::EbookNotFound)?;

        self.discard(&ebook.cover_image_url).await;
        self.discard(&ebook.document_url).await;

        tracing::info!(ebook_id = %ebook_id, "E-book retired");
        Ok(())
    }

    async fn discard(&self, url: &str) {
        if let Err(e) = self.file_store.delete(url).await {
            tracing::warn!(url = %url, error = %e, "Failed to delete stored asset");
        }
    }
}

fn ensure_admin(actor: &AuthenticatedUser) -> CommerceResult<()> {
    if actor.is_admin {
        Ok(())
    } else {
        Err(CommerceError::AdminOnly)
    }
}

/// Human-readable size label, e.g. "15.2 MB"
fn display_size(bytes: usize) -> String {
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use super::display_size;

    #[test]
    fn test_display_size() {
        assert_eq!(display_size(15 * 1024 * 1024), "15.0 MB");
        assert_eq!(display_size(1_572_864), "1.5 MB");
        assert_eq!(display_size(0), "0.0 MB");
    }
}
