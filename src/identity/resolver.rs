//! Per-request identity resolution.
//!
//! ```text
//! base URL empty ──────────────────────────────▶ Disabled
//! fetch fails ─────────────────────────────────▶ TransportError(description)
//! status != 200 ───────────────────────────────▶ UpstreamError("zlux return code=N")
//! status == 200, username path missing ────────▶ ParseDegraded(NO_USERNAME_MESSAGE)
//! status == 200, username found ───────────────▶ Resolved(username)
//! ```

use axum::http::HeaderValue;

use crate::config::AuthConfig;
use crate::identity::client::UpstreamAuthClient;
use crate::identity::outcome::Outcome;
use crate::identity::parser::parse_username;

/// Resolves inbound cookies to usernames through the upstream service.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    /// `None` when the lookup is disabled by configuration.
    client: Option<UpstreamAuthClient>,
}

impl IdentityResolver {
    pub fn new(config: &AuthConfig) -> Result<Self, reqwest::Error> {
        let client = if config.is_disabled() {
            tracing::info!("Upstream base URL empty; identity lookup disabled");
            None
        } else {
            Some(UpstreamAuthClient::new(config)?)
        };
        Ok(Self { client })
    }

    /// Run the lookup for one request. Never fails; every error path folds
    /// into an [`Outcome`].
    pub async fn resolve(&self, cookie: Option<&HeaderValue>) -> Outcome {
        let Some(client) = &self.client else {
            return Outcome::Disabled;
        };

        let response = match client.fetch_identity(cookie).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(uri = %client.auth_url(), error = %e, "Upstream identity lookup failed");
                return Outcome::TransportError(e.description);
            }
        };

        if response.status != 200 {
            tracing::warn!(
                uri = %client.auth_url(),
                status = response.status,
                "Upstream identity service rejected lookup"
            );
            return Outcome::upstream_status(response.status);
        }

        match parse_username(&response.body) {
            Ok(username) => Outcome::Resolved(username),
            Err(e) => {
                tracing::warn!(error = %e, "Upstream identity body carried no username");
                Outcome::no_username()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_base_url_is_disabled() {
        let resolver = IdentityResolver::new(&AuthConfig::default()).unwrap();

        let cookie = HeaderValue::from_static("jedHTTPSession=abc");
        assert_eq!(resolver.resolve(Some(&cookie)).await, Outcome::Disabled);
        assert_eq!(resolver.resolve(None).await, Outcome::Disabled);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = AuthConfig {
            base_url: format!("http://{addr}"),
            ..AuthConfig::default()
        };
        let resolver = IdentityResolver::new(&config).unwrap();

        match resolver.resolve(None).await {
            Outcome::TransportError(msg) => assert!(!msg.is_empty()),
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
