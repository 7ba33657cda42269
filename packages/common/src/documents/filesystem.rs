use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::BufReader;
use tracing::debug;

use super::{ContentHash, DocumentReader, DocumentStore, StorageError};

/// Documents on local disk under `{root}/{2 hex chars}/{62 hex chars}`.
///
/// Writes go to `{root}/.tmp` first and are renamed into place, so a reader
/// never observes a half-written document.
pub struct FilesystemDocumentStore {
    root: PathBuf,
    max_size: u64,
}

impl FilesystemDocumentStore {
    pub async fn new(root: impl AsRef<Path>, max_size: u64) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join(".tmp")).await?;
        Ok(Self { root, max_size })
    }

    fn path_for(&self, hash: &ContentHash) -> PathBuf {
        let (dir, file) = hash.shard();
        self.root.join(dir).join(file)
    }

    fn staging_path(&self) -> PathBuf {
        self.root.join(".tmp").join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl DocumentStore for FilesystemDocumentStore {
    async fn put(&self, data: &[u8]) -> Result<ContentHash, StorageError> {
        let actual = data.len() as u64;
        if actual > self.max_size {
            return Err(StorageError::TooLarge {
                actual,
                limit: self.max_size,
            });
        }

        let hash = ContentHash::of(data);
        let target = self.path_for(&hash);
        if fs::try_exists(&target).await? {
            debug!(%hash, "document already stored");
            return Ok(hash);
        }

        let staging = self.staging_path();
        if let Err(e) = fs::write(&staging, data).await {
            let _ = fs::remove_file(&staging).await;
            return Err(e.into());
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        if let Err(e) = fs::rename(&staging, &target).await {
            let _ = fs::remove_file(&staging).await;
            return Err(e.into());
        }

        debug!(%hash, size = actual, "document stored");
        Ok(hash)
    }

    async fn open(&self, hash: &ContentHash) -> Result<DocumentReader, StorageError> {
        match fs::File::open(self.path_for(hash)).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(*hash))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn max_size(&self) -> u64 {
        self.max_size
    }
}
