use std::sync::Arc;

use bytes::Bytes;

use crate::application::ports::{ScratchStore, StorageError, TranscriptionError};
use crate::application::services::TranscriptionService;
use crate::domain::{ExtensionAllowList, file_extension};

/// A file part lifted out of a multipart request.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub data: Bytes,
}

impl Upload {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}

pub struct UploadService {
    allow_list: ExtensionAllowList,
    store: Arc<dyn ScratchStore>,
    transcription: TranscriptionService,
}

impl UploadService {
    pub fn new(
        allow_list: ExtensionAllowList,
        store: Arc<dyn ScratchStore>,
        transcription: TranscriptionService,
    ) -> Self {
        Self {
            allow_list,
            store,
            transcription,
        }
    }

    pub fn model_name(&self) -> &'static str {
        self.transcription.model_name()
    }

    /// Validates the upload, stages it on disk, transcribes it and removes the
    /// staged copy again whatever the outcome.
    pub async fn handle(&self, upload: Option<Upload>) -> Result<String, UploadError> {
        let upload = upload.ok_or(UploadError::NoFile)?;

        if upload.filename.is_empty() {
            return Err(UploadError::NoSelectedFile);
        }

        if !self.allow_list.is_allowed(&upload.filename) {
            return Err(UploadError::FileTypeNotAllowed);
        }

        let extension = file_extension(&upload.filename).unwrap_or_default();
        let stored = self.store.store(&upload.data, extension).await?;

        tracing::debug!(
            filename = %upload.filename,
            path = %stored.path().display(),
            bytes = stored.size_bytes(),
            "Upload staged for transcription"
        );

        let result = self.transcription.transcribe(stored.path()).await;
        self.store.release(stored).await;

        Ok(result?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file provided")]
    NoFile,
    #[error("No selected file")]
    NoSelectedFile,
    #[error("File type not allowed")]
    FileTypeNotAllowed,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
}

impl UploadError {
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::NoFile | Self::NoSelectedFile | Self::FileTypeNotAllowed
        )
    }
}
