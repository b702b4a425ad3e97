//! Response rendering.
//!
//! # Responsibilities
//! - Serialize the identity payload as the response body
//! - Set `Content-Type: application/json; charset=utf-8`

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::identity::OutputPayload;

pub const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Status code plus payload for one handled request.
#[derive(Debug)]
pub struct IdentityResponse {
    pub status: StatusCode,
    pub payload: OutputPayload,
}

impl IdentityResponse {
    pub fn new(status: StatusCode, payload: OutputPayload) -> Self {
        Self { status, payload }
    }
}

impl IntoResponse for IdentityResponse {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.payload) {
            Ok(bytes) => {
                let mut response = Response::new(Body::from(bytes));
                *response.status_mut() = self.status;
                response
                    .headers_mut()
                    .insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8));
                response
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize identity payload");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
