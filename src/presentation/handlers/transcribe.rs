use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use serde::Serialize;

use crate::application::services::Upload;
use crate::presentation::handlers::ApiError;
use crate::presentation::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct TranscriptionResponse {
    pub transcription: String,
}

/// Shared by the form route and the API route.
#[tracing::instrument(skip(state, multipart))]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranscriptionResponse>, ApiError> {
    let upload = match multipart {
        Ok(multipart) => read_upload(multipart).await?,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Request is not multipart/form-data");
            None
        }
    };

    let transcription = state.upload_service.handle(upload).await?;

    Ok(Json(TranscriptionResponse { transcription }))
}

/// Finds the first `file` part that carries a filename. A `file` part sent
/// without one is a plain form value, not an upload. A body that cannot be
/// parsed carries no upload either; only an oversized one is an error.
async fn read_upload(mut multipart: Multipart) -> Result<Option<Upload>, ApiError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => return unreadable(e),
        };
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_owned) else {
            continue;
        };

        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => return unreadable(e),
        };
        tracing::debug!(filename = %filename, bytes = data.len(), "File data received");

        return Ok(Some(Upload::new(filename, data)));
    }
}

fn unreadable(e: MultipartError) -> Result<Option<Upload>, ApiError> {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return Err(ApiError::PayloadTooLarge);
    }
    tracing::debug!(error = %e, "Malformed multipart body");
    Ok(None)
}
