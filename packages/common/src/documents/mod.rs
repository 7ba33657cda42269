//! Content-addressed storage for documents uploaded by event admins.
//!
//! Metadata (filename, MIME type, uploader) lives in the database; this module
//! only stores bytes keyed by their SHA-256 digest.

mod filesystem;
mod hash;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncRead;

pub use filesystem::FilesystemDocumentStore;
pub use hash::ContentHash;

pub type DocumentReader = Box<dyn AsyncRead + Unpin + Send>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("document not found: {0}")]
    NotFound(ContentHash),
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid content hash: {0}")]
    InvalidHash(String),
    #[error("document exceeds size limit ({actual} > {limit} bytes)")]
    TooLarge { actual: u64, limit: u64 },
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store bytes and return their digest. Storing identical bytes twice is a no-op.
    async fn put(&self, data: &[u8]) -> Result<ContentHash, StorageError>;

    /// Open a stored document for streaming.
    async fn open(&self, hash: &ContentHash) -> Result<DocumentReader, StorageError>;

    /// Largest document this store accepts, in bytes.
    fn max_size(&self) -> u64;
}
