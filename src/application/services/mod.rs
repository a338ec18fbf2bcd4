mod transcription_service;
mod upload_service;

pub use transcription_service::TranscriptionService;
pub use upload_service::{Upload, UploadError, UploadService};
