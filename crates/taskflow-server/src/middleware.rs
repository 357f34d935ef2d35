//! Request correlation and transport-level fallbacks

use axum::body::Body;
use axum::http::{HeaderValue, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use taskflow_core::errors::{TfError, TfErrorKind};
use taskflow_core_types::schema::HEADER_REQUEST_ID;
use taskflow_core_types::RequestId;
use tracing::Instrument;

use crate::response::ApiError;

/// Run the request inside an `http.request` span keyed by its request id.
///
/// A well-formed inbound `x-request-id` is reused; otherwise one is minted.
/// The id is echoed on the response either way.
pub async fn request_id(request: Request<Body>, next: Next) -> Response {
    let inbound = request
        .headers()
        .get(HEADER_REQUEST_ID)
        .and_then(|v| v.to_str().ok());
    let request_id = RequestId::from_inbound(inbound);

    let span = tracing::info_span!(
        "http.request",
        request_id = %request_id,
        method = %request.method(),
        route = %request.uri().path(),
    );

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(HEADER_REQUEST_ID, value);
    }
    response
}

/// Give the router's bare 405 responses the failure envelope. The
/// `allow` header is kept.
pub async fn method_not_allowed_envelope(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }
    let (parts, _) = response.into_parts();
    let mut rewritten = ApiError::from(
        TfError::new(TfErrorKind::MethodNotAllowed).with_message("method not allowed"),
    )
    .into_response();
    if let Some(allow) = parts.headers.get(axum::http::header::ALLOW) {
        rewritten
            .headers_mut()
            .insert(axum::http::header::ALLOW, allow.clone());
    }
    rewritten
}

pub async fn not_found() -> ApiError {
    TfError::new(TfErrorKind::NotFound)
        .with_message("no such endpoint")
        .into()
}
