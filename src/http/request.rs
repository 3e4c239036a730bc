//! Request identification.
//!
//! Every request gets an `x-request-id` (kept if the client sent one,
//! otherwise a UUID v4). The id is attached to the request span so that
//! handler spans and log lines can be correlated, and echoed in the response.

use axum::{body::Body, http::Request};
use tracing::Span;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Access to the request id header.
pub trait RequestIdExt {
    /// The request id, or `"unknown"` if the header is missing.
    fn request_id(&self) -> &str;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> &str {
        self.headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

/// Span wrapping the whole request.
pub fn make_request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request.request_id(),
    )
}
