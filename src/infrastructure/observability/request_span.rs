use axum::extract::Request;
use tracing::Span;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Span for one HTTP request, tagged with the id set by the request-id layer.
pub fn make_request_span(request: &Request) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri().path()
    )
}
