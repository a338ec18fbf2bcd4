use axum::extract::{Request, State};
use axum::http::header::CONTENT_LENGTH;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::presentation::handlers::ApiError;
use crate::presentation::state::AppState;

/// Rejects requests whose declared `Content-Length` exceeds the upload ceiling
/// before any extractor runs. Bodies without a length are capped later by
/// `DefaultBodyLimit`.
pub async fn upload_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let declared = request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    if let Some(length) = declared
        && length > state.max_upload_bytes as u64
    {
        tracing::warn!(
            content_length = length,
            limit = state.max_upload_bytes,
            "Request body exceeds upload limit"
        );
        return ApiError::PayloadTooLarge.into_response();
    }

    next.run(request).await
}
