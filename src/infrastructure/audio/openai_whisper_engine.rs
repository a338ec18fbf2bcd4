use std::path::Path;

use async_trait::async_trait;
use futures::{StreamExt, stream};
use reqwest::multipart;
use serde::Deserialize;

use crate::application::ports::{SpeechModel, Transcription, TranscriptionError};
use crate::domain::{Segment, TranscriptionInfo};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "whisper-1";

/// Delegates to an OpenAI-compatible `/audio/transcriptions` endpoint.
pub struct OpenAiWhisperEngine {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct VerboseTranscription {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    duration: Option<f32>,
    #[serde(default)]
    segments: Option<Vec<ApiSegment>>,
}

#[derive(Debug, Deserialize)]
struct ApiSegment {
    start: f32,
    end: f32,
    text: String,
}

impl OpenAiWhisperEngine {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }
}

#[async_trait]
impl SpeechModel for OpenAiWhisperEngine {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription, TranscriptionError> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let audio = tokio::fs::read(audio_path).await.map_err(|e| {
            TranscriptionError::DecodingFailed(format!("read {}: {}", audio_path.display(), e))
        })?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio")
            .to_string();

        let file_part = multipart::Part::bytes(audio)
            .file_name(file_name)
            .mime_str(mime_for(audio_path))
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("mime: {}", e)))?;

        let form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "verbose_json")
            .part("file", file_part);

        tracing::debug!(model = %self.model, url = %url, "Sending audio to OpenAI Whisper API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TranscriptionError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let body: VerboseTranscription = response
            .json()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("body: {}", e)))?;

        let info = TranscriptionInfo {
            language: body.language,
            duration: body.duration,
        };

        let segments: Vec<Segment> = match body.segments {
            Some(segments) if !segments.is_empty() => segments
                .into_iter()
                .map(|s| Segment::new(s.start, s.end, s.text))
                .collect(),
            _ => vec![Segment::new(
                0.0,
                info.duration.unwrap_or(0.0),
                body.text,
            )],
        };

        tracing::info!(segments = segments.len(), "OpenAI Whisper transcription received");

        Ok(Transcription {
            info,
            segments: stream::iter(segments.into_iter().map(Ok)).boxed(),
        })
    }
}

fn mime_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);
    match extension.as_deref() {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        Some("flac") => "audio/flac",
        _ => "application/octet-stream",
    }
}
