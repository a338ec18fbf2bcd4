use std::path::PathBuf;

use transcribe_server::presentation::config::{Environment, ModelProvider, ModelSettings, Settings};

#[test]
fn given_no_overrides_when_loading_defaults_then_matches_reference_deployment() {
    let settings = Settings::defaults().unwrap();

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 5000);
    assert_eq!(settings.upload.max_size_bytes, 16 * 1024 * 1024);
    assert_eq!(settings.upload.directory, PathBuf::from("/tmp"));
    assert_eq!(
        settings.upload.allowed_extensions,
        vec!["wav", "mp3", "ogg", "flac"]
    );
    assert_eq!(settings.model.provider, ModelProvider::Local);
    assert_eq!(settings.model.model_id(), "openai/whisper-base");
    assert_eq!(settings.model.api_key, None);
    assert!(!settings.logging.json);
}

#[test]
fn given_provider_without_model_id_when_resolving_then_uses_provider_default() {
    let mut model = ModelSettings {
        provider: ModelProvider::OpenAi,
        model_id: None,
        api_key: None,
        base_url: None,
        mock_segments: Vec::new(),
    };
    assert_eq!(model.model_id(), "whisper-1");

    model.model_id = Some("openai/whisper-small".to_string());
    assert_eq!(model.model_id(), "openai/whisper-small");
}

// The only test in this binary that touches APP_* variables.
#[test]
fn given_app_env_vars_when_loading_then_overrides_defaults() {
    let vars = [
        ("APP_SERVER__PORT", "8080"),
        ("APP_UPLOAD__MAX_SIZE_BYTES", "1024"),
        ("APP_UPLOAD__ALLOWED_EXTENSIONS", "wav,m4a"),
        ("APP_MODEL__PROVIDER", "mock"),
        ("APP_MODEL__MOCK_SEGMENTS", "hello,world"),
    ];
    for (key, value) in vars {
        unsafe { std::env::set_var(key, value) };
    }

    let loaded = Settings::load(Environment::Test);

    for (key, _) in vars {
        unsafe { std::env::remove_var(key) };
    }
    let settings = loaded.unwrap();

    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.upload.max_size_bytes, 1024);
    assert_eq!(settings.upload.allowed_extensions, vec!["wav", "m4a"]);
    assert_eq!(settings.upload.directory, PathBuf::from("/tmp"));
    assert_eq!(settings.model.provider, ModelProvider::Mock);
    assert_eq!(settings.model.mock_segments, vec!["hello", "world"]);
}
