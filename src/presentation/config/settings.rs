use std::path::PathBuf;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;
use crate::domain::DEFAULT_ALLOWED_EXTENSIONS;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub upload: UploadSettings,
    pub model: ModelSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    pub max_size_bytes: usize,
    pub directory: PathBuf,
    pub allowed_extensions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    pub provider: ModelProvider,
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub mock_segments: Vec<String>,
}

impl ModelSettings {
    /// Configured model id, or the provider's default.
    pub fn model_id(&self) -> &str {
        match (&self.model_id, self.provider) {
            (Some(id), _) => id,
            (None, ModelProvider::Local) => "openai/whisper-base",
            (None, ModelProvider::OpenAi) => "whisper-1",
            (None, ModelProvider::Mock) => "mock",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    Local,
    #[serde(rename = "openai")]
    OpenAi,
    Mock,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub json: bool,
}

impl Settings {
    /// Layers built-in defaults, `appsettings.<environment>.*` and `APP_*`
    /// environment variables (`APP_SERVER__PORT=8080`), later sources winning.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let file_name = format!("appsettings.{}", environment.as_str());
        Self::builder()?
            .add_source(File::with_name(&file_name).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("upload.allowed_extensions")
                    .with_list_parse_key("model.mock_segments")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Built-in defaults only.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let allowed: Vec<String> = DEFAULT_ALLOWED_EXTENSIONS
            .iter()
            .map(|ext| ext.to_string())
            .collect();

        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("upload.max_size_bytes", DEFAULT_MAX_UPLOAD_BYTES as u64)?
            .set_default("upload.directory", "/tmp")?
            .set_default("upload.allowed_extensions", allowed)?
            .set_default("model.provider", "local")?
            .set_default("model.mock_segments", vec!["mock".to_string(), "transcription".to_string()])?
            .set_default("logging.json", false)
    }
}
