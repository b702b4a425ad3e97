//! Upstream identity service client.
//!
//! # Responsibilities
//! - Issue one `GET {base_url}/auth` per lookup, forwarding the inbound cookie
//! - Apply the configured TLS trust policy and deadlines
//! - Hand back status + body, or a transport error with its full description
//!
//! # Design Decisions
//! - No retries; a lookup is one-shot
//! - The response is owned and dropped inside `fetch_identity`, so it is
//!   released on every path without explicit close calls
//! - The body is drained only for a 200; other statuses never read it

use std::error::Error as StdError;
use std::time::{Duration, Instant};

use axum::http::{header, HeaderValue, StatusCode};
use thiserror::Error;

use crate::config::AuthConfig;

/// Path appended to the configured base URL.
pub const AUTH_PATH: &str = "/auth";

/// Raw answer from one upstream lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamAuthResponse {
    pub status: u16,
    /// Full body text for a 200, empty otherwise.
    pub body: String,
}

/// The upstream could not be reached or the exchange broke mid-way.
#[derive(Debug, Error)]
#[error("{description}")]
pub struct NetworkError {
    pub description: String,
}

impl NetworkError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        Self {
            description: describe(&err),
        }
    }
}

/// Render an error and its source chain, skipping repeated messages.
///
/// A cause is dropped when an earlier layer already printed its text, whole
/// or embedded in a longer message.
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut parts: Vec<String> = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !parts.iter().any(|prev| prev.contains(text.as_str())) {
            parts.push(text);
        }
        source = cause.source();
    }
    parts.join(": ")
}

/// Client bound to one upstream base URL.
#[derive(Clone)]
pub struct UpstreamAuthClient {
    http: reqwest::Client,
    auth_url: String,
}

impl UpstreamAuthClient {
    /// Build a client from the upstream configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));

        if config.allow_untrusted_upstream {
            tracing::warn!(
                base_url = %config.base_url,
                "Upstream TLS verification disabled: any certificate and hostname accepted"
            );
            builder = builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }

        Ok(Self {
            http: builder.build()?,
            auth_url: format!("{}{}", config.base_url, AUTH_PATH),
        })
    }

    /// Full URI the lookup targets.
    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    /// Perform one lookup.
    ///
    /// `cookie` is forwarded byte-for-byte; when absent the request carries
    /// no `Cookie` header at all.
    pub async fn fetch_identity(
        &self,
        cookie: Option<&HeaderValue>,
    ) -> Result<UpstreamAuthResponse, NetworkError> {
        let start = Instant::now();
        tracing::debug!(
            uri = %self.auth_url,
            cookie_present = cookie.is_some(),
            "Querying upstream identity service"
        );

        let mut request = self.http.get(&self.auth_url);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie.clone());
        }

        let response = request.send().await.map_err(NetworkError::from_reqwest)?;
        let status = response.status();

        let body = if status == StatusCode::OK {
            response.text().await.map_err(NetworkError::from_reqwest)?
        } else {
            String::new()
        };

        tracing::debug!(
            uri = %self.auth_url,
            status = status.as_u16(),
            body_len = body.len(),
            elapsed = ?start.elapsed(),
            "Upstream identity service answered"
        );

        Ok(UpstreamAuthResponse {
            status: status.as_u16(),
            body,
        })
    }
}

impl std::fmt::Debug for UpstreamAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamAuthClient")
            .field("auth_url", &self.auth_url)
            .finish()
    }
}
