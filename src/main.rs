use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use transcribe_server::application::services::{TranscriptionService, UploadService};
use transcribe_server::domain::ExtensionAllowList;
use transcribe_server::infrastructure::audio::SpeechModelFactory;
use transcribe_server::infrastructure::observability::{TracingConfig, init_tracing};
use transcribe_server::infrastructure::storage::LocalScratchStore;
use transcribe_server::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load configuration")?;

    init_tracing(&TracingConfig::new(environment, &settings.logging));

    let model_settings = settings.model.clone();
    tracing::info!(
        provider = ?model_settings.provider,
        model = model_settings.model_id(),
        "Loading speech model"
    );
    let model = tokio::task::spawn_blocking(move || SpeechModelFactory::create(&model_settings))
        .await
        .context("Model loading task panicked")?
        .context("Failed to load speech model")?;

    let store = LocalScratchStore::new(&settings.upload.directory)
        .context("Failed to prepare upload directory")?;
    let allow_list = ExtensionAllowList::new(&settings.upload.allowed_extensions);
    if allow_list.is_empty() {
        anyhow::bail!("upload.allowed_extensions must not be empty");
    }

    let upload_service = Arc::new(UploadService::new(
        allow_list,
        Arc::new(store),
        TranscriptionService::new(model),
    ));
    let state = AppState::new(upload_service, settings.upload.max_size_bytes);
    let router = create_router(state);

    let host = settings.server.host.as_str();
    let port = settings.server.port;
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    let addr: SocketAddr = listener.local_addr()?;

    tracing::info!(
        %addr,
        upload_dir = %settings.upload.directory.display(),
        max_upload_bytes = settings.upload.max_size_bytes,
        "Listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
