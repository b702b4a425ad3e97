//! Request handling.
//!
//! # Responsibilities
//! - Extract the cookie that gets forwarded upstream
//! - Assign each inbound request an `x-request-id` for log correlation
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The per-request id lives only in headers and spans; the body carries the
//!   process-lifetime identifier instead

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Cookie header to forward, if the client sent one.
///
/// HTTP/2 clients may split cookies across several header fields; those are
/// folded back into one value joined by `"; "`.
pub fn forwarded_cookie(headers: &HeaderMap) -> Option<HeaderValue> {
    let mut values = headers.get_all(header::COOKIE).iter();
    let first = values.next()?;

    let rest: Vec<&HeaderValue> = values.collect();
    if rest.is_empty() {
        return Some(first.clone());
    }

    let mut joined = first.as_bytes().to_vec();
    for value in rest {
        joined.extend_from_slice(b"; ");
        joined.extend_from_slice(value.as_bytes());
    }
    HeaderValue::from_bytes(&joined).ok()
}

/// Generates an `x-request-id` when the client did not send one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Copies the request's `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}
