use std::path::Path;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::domain::{Segment, TranscriptionInfo};

/// Single-pass sequence of recognized segments, in audio order.
pub type SegmentStream = BoxStream<'static, Result<Segment, TranscriptionError>>;

pub struct Transcription {
    pub info: TranscriptionInfo,
    pub segments: SegmentStream,
}

/// A loaded speech-recognition model. Shared by every in-flight request, so
/// implementations must tolerate concurrent calls.
#[async_trait]
pub trait SpeechModel: Send + Sync {
    fn name(&self) -> &'static str;

    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
}
