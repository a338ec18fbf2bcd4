use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::UploadId;

/// Writes request-scoped copies of uploads where the speech model can read them.
#[async_trait]
pub trait ScratchStore: Send + Sync {
    async fn store(&self, data: &[u8], extension: &str) -> Result<StoredFile, StorageError>;

    async fn release(&self, file: StoredFile) {
        file.release().await;
    }
}

/// An upload persisted on disk for the lifetime of one request.
///
/// The file is removed by [`StoredFile::release`] or, failing that, when the
/// guard is dropped, so early returns, panics and cancelled requests never
/// leave it behind.
#[derive(Debug)]
pub struct StoredFile {
    id: UploadId,
    extension: String,
    path: PathBuf,
    size_bytes: u64,
    released: bool,
}

impl StoredFile {
    pub fn new(id: UploadId, extension: impl Into<String>, path: PathBuf, size_bytes: u64) -> Self {
        Self {
            id,
            extension: extension.into(),
            path,
            size_bytes,
            released: false,
        }
    }

    pub fn id(&self) -> UploadId {
        self.id
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Deletes the file if it is still there. Never fails; a missing file is fine.
    pub async fn release(mut self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Scratch file removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove scratch file")
            }
        }
        self.released = true;
    }
}

impl Drop for StoredFile {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Scratch file removed on drop"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove scratch file")
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to prepare upload directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to save upload to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
