use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::application::ports::{ScratchStore, StorageError, StoredFile};
use crate::domain::{ScratchFileName, UploadId};

pub struct LocalScratchStore {
    directory: PathBuf,
}

impl LocalScratchStore {
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory).map_err(|source| StorageError::Directory {
            path: directory.clone(),
            source,
        })?;
        Ok(Self { directory })
    }
}

#[async_trait]
impl ScratchStore for LocalScratchStore {
    async fn store(&self, data: &[u8], extension: &str) -> Result<StoredFile, StorageError> {
        let id = UploadId::new();
        let name = ScratchFileName::new(&id, extension);
        let path = self.directory.join(name.as_str());

        // create_new: a name clash must never clobber another request's file.
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|source| StorageError::Write {
                path: path.clone(),
                source,
            })?;

        // From here on the guard owns the file; a failed write drops it.
        let stored = StoredFile::new(id, extension, path.clone(), data.len() as u64);

        let written = async {
            file.write_all(data).await?;
            file.flush().await
        }
        .await;
        drop(file);

        if let Err(source) = written {
            tracing::error!(path = %path.display(), error = %source, "Failed to write scratch file");
            return Err(StorageError::Write { path, source });
        }

        Ok(stored)
    }
}
