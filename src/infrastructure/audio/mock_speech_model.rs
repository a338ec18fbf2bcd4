use std::path::Path;

use async_trait::async_trait;
use futures::{StreamExt, stream};

use crate::application::ports::{SpeechModel, Transcription, TranscriptionError};
use crate::domain::{Segment, TranscriptionInfo};

/// Returns the same segments for every file, one second apiece. Lets the
/// server run without model weights.
pub struct MockSpeechModel {
    segments: Vec<String>,
}

impl MockSpeechModel {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl SpeechModel for MockSpeechModel {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription, TranscriptionError> {
        if !tokio::fs::try_exists(audio_path).await.unwrap_or(false) {
            return Err(TranscriptionError::DecodingFailed(format!(
                "no such file: {}",
                audio_path.display()
            )));
        }

        let segments: Vec<Segment> = self
            .segments
            .iter()
            .enumerate()
            .map(|(i, text)| Segment::new(i as f32, (i + 1) as f32, text.clone()))
            .collect();

        Ok(Transcription {
            info: TranscriptionInfo {
                language: Some("en".to_string()),
                duration: Some(segments.len() as f32),
            },
            segments: stream::iter(segments.into_iter().map(Ok)).boxed(),
        })
    }
}
