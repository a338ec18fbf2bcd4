use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::whisper::{self as m, Config};
use futures::{StreamExt, TryStreamExt, future, stream};
use hf_hub::api::sync::{Api, ApiRepo};
use hf_hub::{Repo, RepoType};
use tokenizers::Tokenizer;
use tokio::sync::Mutex;

use crate::application::ports::{SpeechModel, Transcription, TranscriptionError};
use crate::domain::{Segment, TranscriptionInfo};

use super::audio_decoder::decode_audio_file;

const MEL_FILTERS_REPO: &str = "FL33TW00D-HF/whisper-base";
const MAX_DECODE_TOKENS: usize = 224;
const WINDOW_SECS: f32 = m::CHUNK_LENGTH as f32;

/// Whisper running in-process on candle. Loaded once; inference is serialised
/// through the model mutex, so concurrent requests queue per window.
pub struct CandleWhisperEngine {
    runtime: Arc<WhisperRuntime>,
}

struct WhisperRuntime {
    model: Mutex<m::model::Whisper>,
    tokenizer: Tokenizer,
    config: Config,
    device: Device,
    mel_filters: Vec<f32>,
}

impl CandleWhisperEngine {
    pub fn new(model_id: &str) -> Result<Self, TranscriptionError> {
        let device = Device::Cpu;

        tracing::info!(
            device = ?device,
            model = model_id,
            "Initializing Candle Whisper transcription engine"
        );

        let api = Api::new().map_err(|e| TranscriptionError::ModelLoadFailed(e.to_string()))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = fetch(&repo, "config.json")?;
        let tokenizer_path = fetch(&repo, "tokenizer.json")?;
        let weights_path = fetch(&repo, "model.safetensors")?;

        let config_contents = std::fs::read_to_string(&config_path)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("read config: {}", e)))?;
        let config: Config = serde_json::from_str(&config_contents)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("parse config: {}", e)))?;

        let mel_repo = api.repo(Repo::new(MEL_FILTERS_REPO.to_string(), RepoType::Model));
        let mel_file = match config.num_mel_bins {
            128 => "melfilters128.bytes",
            _ => "melfilters.bytes",
        };
        let mel_bytes = std::fs::read(fetch(&mel_repo, mel_file)?)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("mel filters: {}", e)))?;
        let mel_filters = read_mel_filters(&mel_bytes, &config)?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("tokenizer: {}", e)))?;

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], m::DTYPE, &device)
                .map_err(|e| TranscriptionError::ModelLoadFailed(format!("weights: {}", e)))?
        };
        let model = m::model::Whisper::load(&vb, config.clone())
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("model: {}", e)))?;

        tracing::info!(mel_bins = config.num_mel_bins, "Candle Whisper engine loaded");

        Ok(Self {
            runtime: Arc::new(WhisperRuntime {
                model: Mutex::new(model),
                tokenizer,
                config,
                device,
                mel_filters,
            }),
        })
    }
}

#[async_trait]
impl SpeechModel for CandleWhisperEngine {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription, TranscriptionError> {
        let path: PathBuf = audio_path.to_path_buf();
        let audio = match tokio::task::spawn_blocking(move || decode_audio_file(&path)).await {
            Ok(result) => result?,
            Err(e) => {
                return Err(TranscriptionError::DecodingFailed(format!(
                    "decoder task: {}",
                    e
                )));
            }
        };

        let duration = audio.duration_secs();
        let windows: Vec<Vec<f32>> = audio
            .samples
            .chunks(m::N_SAMPLES)
            .map(<[f32]>::to_vec)
            .collect();

        tracing::debug!(windows = windows.len(), duration_secs = duration, "Audio split into windows");

        let runtime = Arc::clone(&self.runtime);
        let segments = stream::iter(windows.into_iter().enumerate())
            .then(move |(index, samples)| {
                let runtime = Arc::clone(&runtime);
                async move {
                    let task = tokio::task::spawn_blocking(move || {
                        runtime.transcribe_window(index, &samples, duration)
                    });
                    match task.await {
                        Ok(result) => result,
                        Err(e) => Err(TranscriptionError::TranscriptionFailed(format!(
                            "inference task: {}",
                            e
                        ))),
                    }
                }
            })
            .try_filter(|segment| future::ready(!segment.text.is_empty()))
            .boxed();

        Ok(Transcription {
            info: TranscriptionInfo {
                language: None,
                duration: Some(duration),
            },
            segments,
        })
    }
}

impl WhisperRuntime {
    fn transcribe_window(
        &self,
        index: usize,
        samples: &[f32],
        duration: f32,
    ) -> Result<Segment, TranscriptionError> {
        let mut padded = samples.to_vec();
        padded.resize(m::N_SAMPLES, 0.0);

        let mel = m::audio::pcm_to_mel(&self.config, &padded, &self.mel_filters);
        let n_mel = self.config.num_mel_bins;
        let n_frames = mel.len() / n_mel;
        let mel = Tensor::from_vec(mel, (1, n_mel, n_frames), &self.device).map_err(inference)?;

        let mut model = self.model.blocking_lock();
        tracing::debug!(window = index, "Transcribing audio window");
        let text = self.decode(&mut model, &mel)?;

        let start = index as f32 * WINDOW_SECS;
        let end = (start + WINDOW_SECS).min(duration);
        Ok(Segment::new(start, end, text))
    }

    /// Greedy decoding of one 30 second mel window.
    fn decode(&self, model: &mut m::model::Whisper, mel: &Tensor) -> Result<String, TranscriptionError> {
        let sot = self.token_id(m::SOT_TOKEN)?;
        let transcribe = self.token_id(m::TRANSCRIBE_TOKEN)?;
        let no_timestamps = self.token_id(m::NO_TIMESTAMPS_TOKEN)?;
        let eot = self.token_id(m::EOT_TOKEN)?;

        let audio_features = model.encoder.forward(mel, true).map_err(inference)?;

        let prompt_len = 3;
        let mut tokens = vec![sot, transcribe, no_timestamps];
        let mut text = String::new();

        for _ in 0..MAX_DECODE_TOKENS {
            let token_tensor = Tensor::new(tokens.as_slice(), &self.device)
                .and_then(|t| t.unsqueeze(0))
                .map_err(inference)?;

            let hidden = model
                .decoder
                .forward(&token_tensor, &audio_features, tokens.len() == prompt_len)
                .map_err(inference)?;
            let logits = hidden
                .squeeze(0)
                .and_then(|h| model.decoder.final_linear(&h))
                .map_err(inference)?;

            let last = logits.dim(0).map_err(inference)? - 1;
            let next = logits
                .get(last)
                .and_then(|l| l.argmax(0))
                .and_then(|t| t.to_scalar::<u32>())
                .map_err(inference)?;

            if next == eot {
                break;
            }
            tokens.push(next);

            if let Some(piece) = self.tokenizer.id_to_token(next) {
                text.push_str(&piece.replace('Ġ', " ").replace('▁', " "));
            }
        }

        model.reset_kv_cache();
        Ok(text.trim().to_string())
    }

    fn token_id(&self, token: &str) -> Result<u32, TranscriptionError> {
        self.tokenizer.token_to_id(token).ok_or_else(|| {
            TranscriptionError::TranscriptionFailed(format!("token not found: {}", token))
        })
    }
}

fn inference(e: candle_core::Error) -> TranscriptionError {
    TranscriptionError::TranscriptionFailed(e.to_string())
}

fn fetch(repo: &ApiRepo, file: &str) -> Result<PathBuf, TranscriptionError> {
    repo.get(file)
        .map_err(|e| TranscriptionError::ModelLoadFailed(format!("{}: {}", file, e)))
}

fn read_mel_filters(bytes: &[u8], config: &Config) -> Result<Vec<f32>, TranscriptionError> {
    let expected_len = config.num_mel_bins * (m::N_FFT / 2 + 1);
    if bytes.len() < expected_len * 4 {
        return Err(TranscriptionError::ModelLoadFailed(format!(
            "mel filters file too small: {} bytes, expected at least {}",
            bytes.len(),
            expected_len * 4
        )));
    }

    Ok(bytes
        .chunks_exact(4)
        .take(expected_len)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}
