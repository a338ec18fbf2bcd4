use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::UploadError;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Every failure the HTTP surface can report. The status code is chosen here
/// and nowhere else.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("File too large")]
    PayloadTooLarge,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Upload(e) if e.is_rejection() => StatusCode::BAD_REQUEST,
            ApiError::Upload(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %error, "Transcription request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %error, "Transcription request rejected");
        }

        (status, Json(ErrorResponse { error })).into_response()
    }
}
