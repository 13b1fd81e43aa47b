//! File Storage Backends
//!
//! Asset storage behind a small trait so callers do not care whether files
//! land on local disk or in a remote object bucket. Stored objects are
//! addressed by their public URL.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Storage backend rejected request with status {status}")]
    Rejected { status: u16 },

    /// URL was not produced by this store
    #[error("URL does not belong to this store: {0}")]
    ForeignUrl(String),
}

/// File store trait
#[trait_variant::make(FileStore: Send)]
pub trait LocalFileStore {
    /// Store a file and return its public URL
    async fn store(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError>;

    /// Delete a previously stored file by its public URL
    ///
    /// Deleting an already-deleted object is not an error.
    async fn delete(&self, url: &str) -> Result<(), StorageError>;
}

/// Build a collision-resistant object key under `folder`
fn object_key(folder: &str, file_name: &str) -> String {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let suffix: String = crate::crypto::random_bytes(4)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect();
    format!(
        "{}/{}-{}-{}",
        folder,
        now_ms,
        suffix,
        sanitize_file_name(file_name)
    )
}

/// Strip path separators and anything else unsafe from a client file name
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Local filesystem store (development and single-node deployments)
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
    public_base: String,
    folder: String,
}

impl DiskStore {
    pub fn new(
        root: impl Into<PathBuf>,
        public_base: impl Into<String>,
        folder: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
            folder: folder.into(),
        }
    }

    fn key_from_url(&self, url: &str) -> Result<String, StorageError> {
        url.strip_prefix(&self.public_base)
            .map(|rest| rest.trim_start_matches('/').to_string())
            .filter(|key| !key.is_empty() && !key.contains(".."))
            .ok_or_else(|| StorageError::ForeignUrl(url.to_string()))
    }
}

impl FileStore for DiskStore {
    async fn store(
        &self,
        file_name: &str,
        _content_type: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        let key = object_key(&self.folder, file_name);
        let path = self.root.join(&key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(key = %key, size = bytes.len(), "Stored file on disk");
        Ok(format!("{}/{}", self.public_base, key))
    }

    async fn delete(&self, url: &str) -> Result<(), StorageError> {
        let key = self.key_from_url(url)?;
        let path = self.root.join(&key);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Remote object bucket accessed over HTTP
///
/// Objects are PUT to `{base_url}/{key}` with an API key header and served
/// back from the same URL.
#[derive(Debug, Clone)]
pub struct HttpBucketStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    folder: String,
}

impl HttpBucketStore {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        folder: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StorageError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            folder: folder.into(),
        })
    }
}

impl FileStore for HttpBucketStore {
    async fn store(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        let key = object_key(&self.folder, file_name);
        let url = format!("{}/{}", self.base_url, key);

        let response = self
            .http
            .put(&url)
            .header("x-api-key", &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes.to_vec())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::Rejected {
                status: response.status().as_u16(),
            });
        }

        tracing::debug!(key = %key, size = bytes.len(), "Stored file in bucket");
        Ok(url)
    }

    async fn delete(&self, url: &str) -> Result<(), StorageError> {
        if !url.starts_with(&self.base_url) {
            return Err(StorageError::ForeignUrl(url.to_string()));
        }

        let response = self
            .http
            .delete(url)
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() && status.as_u16() != 404 {
            return Err(StorageError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

/// Runtime-selected store backend
///
/// The trait's async methods make it not object safe, so backend selection
/// is an enum rather than a trait object.
#[derive(Debug, Clone)]
pub enum AnyFileStore {
    Disk(DiskStore),
    Bucket(HttpBucketStore),
}

impl FileStore for AnyFileStore {
    async fn store(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        match self {
            AnyFileStore::Disk(store) => FileStore::store(store, file_name, content_type, bytes).await,
            AnyFileStore::Bucket(store) => FileStore::store(store, file_name, content_type, bytes).await,
        }
    }

    async fn delete(&self, url: &str) -> Result<(), StorageError> {
        match self {
            AnyFileStore::Disk(store) => FileStore::delete(store, url).await,
            AnyFileStore::Bucket(store) => FileStore::delete(store, url).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("notes.pdf"), "notes.pdf");
        assert_eq!(sanitize_file_name("my notes (1).pdf"), "my_notes__1_.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_file_name(""), "file");
        assert_eq!(sanitize_file_name("..."), "file");
    }

    #[test]
    fn test_object_key_shape() {
        let key = object_key("ebooks", "notes.pdf");
        assert!(key.starts_with("ebooks/"));
        assert!(key.ends_with("-notes.pdf"));
        // folder / timestamp-rand-name, exactly one separator
        assert_eq!(key.matches('/').count(), 1);
    }

    #[test]
    fn test_disk_store_key_from_url() {
        let store = DiskStore::new("/tmp/assets", "http://localhost:8080/assets", "ebooks");

        let key = store
            .key_from_url("http://localhost:8080/assets/ebooks/1-aa-notes.pdf")
            .unwrap();
        assert_eq!(key, "ebooks/1-aa-notes.pdf");

        assert!(store.key_from_url("http://evil.example/x.pdf").is_err());
        assert!(
            store
                .key_from_url("http://localhost:8080/assets/../secret")
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_disk_store_roundtrip() {
        let suffix: String = crate::crypto::random_bytes(8)
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect();
        let root = std::env::temp_dir().join(format!("store-test-{suffix}"));
        let store = DiskStore::new(&root, "http://localhost/assets", "ebooks");

        let url = FileStore::store(&store, "sample.pdf", "application/pdf", b"%PDF-1.4 test")
            .await
            .unwrap();
        assert!(url.starts_with("http://localhost/assets/ebooks/"));

        let key = store.key_from_url(&url).unwrap();
        let on_disk = tokio::fs::read(root.join(&key)).await.unwrap();
        assert_eq!(on_disk, b"%PDF-1.4 test");

        FileStore::delete(&store, &url).await.unwrap();
        assert!(tokio::fs::metadata(root.join(&key)).await.is_err());

        // Second delete is a no-op
        FileStore::delete(&store, &url).await.unwrap();

        tokio::fs::remove_dir_all(&root).await.ok();
    }
}
