use std::sync::Arc;

use crate::application::ports::{SpeechModel, TranscriptionError};
use crate::presentation::config::{ModelProvider, ModelSettings};

use super::candle_whisper_engine::CandleWhisperEngine;
use super::mock_speech_model::MockSpeechModel;
use super::openai_whisper_engine::OpenAiWhisperEngine;

pub struct SpeechModelFactory;

impl SpeechModelFactory {
    /// Loads the configured model. Blocking for the local provider, which may
    /// download weights on first use.
    pub fn create(settings: &ModelSettings) -> Result<Arc<dyn SpeechModel>, TranscriptionError> {
        match settings.provider {
            ModelProvider::Local => {
                let engine = CandleWhisperEngine::new(settings.model_id())?;
                Ok(Arc::new(engine))
            }
            ModelProvider::OpenAi => {
                let key = settings.api_key.clone().ok_or_else(|| {
                    TranscriptionError::ModelLoadFailed(
                        "API key required for OpenAI Whisper".to_string(),
                    )
                })?;
                let engine = OpenAiWhisperEngine::new(
                    key,
                    settings.base_url.clone(),
                    Some(settings.model_id().to_string()),
                );
                Ok(Arc::new(engine))
            }
            ModelProvider::Mock => Ok(Arc::new(MockSpeechModel::new(
                settings.mock_segments.iter().cloned(),
            ))),
        }
    }
}
