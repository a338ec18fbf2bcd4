use std::path::Path;
use std::sync::Arc;

use futures::TryStreamExt;

use crate::application::ports::{SpeechModel, Transcription, TranscriptionError};

pub struct TranscriptionService {
    model: Arc<dyn SpeechModel>,
}

impl TranscriptionService {
    pub fn new(model: Arc<dyn SpeechModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &'static str {
        self.model.name()
    }

    /// Runs the model on `audio_path` and joins every segment's text with a
    /// single space. The first failing segment aborts the whole transcription.
    #[tracing::instrument(skip(self), fields(model = self.model.name()))]
    pub async fn transcribe(&self, audio_path: &Path) -> Result<String, TranscriptionError> {
        let Transcription { info, segments } = self.model.transcribe(audio_path).await?;

        let texts: Vec<String> = segments.map_ok(|segment| segment.text).try_collect().await?;
        let transcript = texts.join(" ");

        tracing::info!(
            segments = texts.len(),
            chars = transcript.len(),
            language = info.language.as_deref().unwrap_or("unknown"),
            duration_secs = info.duration,
            "Transcription completed"
        );

        Ok(transcript)
    }
}
