//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the identity handler
//! - Wire up middleware (request ID, tracing, request timeout)
//! - Hold the process-lifetime state handed to every request
//! - Bind server to listener and stop on shutdown

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    routing::get,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServiceConfig;
use crate::http::request::{
    forwarded_cookie, propagate_request_id_layer, set_request_id_layer, X_REQUEST_ID,
};
use crate::http::response::IdentityResponse;
use crate::identity::{compose, IdentityResolver, RequestIdentifier};
use crate::observability::metrics;

/// Errors raised while building or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("server IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
///
/// Everything here is fixed at startup and only read per request.
#[derive(Clone, Debug)]
pub struct AppState {
    pub resolver: IdentityResolver,
    pub request_id: RequestIdentifier,
}

/// HTTP server for the identity service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    request_id: RequestIdentifier,
}

impl HttpServer {
    /// Create a server with a freshly generated request identifier.
    pub fn new(config: ServiceConfig) -> Result<Self, ServerError> {
        Self::with_identifier(config, RequestIdentifier::generate())
    }

    /// Create a server that reports `request_id` in every response.
    pub fn with_identifier(
        config: ServiceConfig,
        request_id: RequestIdentifier,
    ) -> Result<Self, ServerError> {
        let resolver = IdentityResolver::new(&config.upstream)?;
        let state = AppState {
            resolver,
            request_id,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            request_id,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let layers = ServiceBuilder::new()
            .layer(set_request_id_layer())
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(X_REQUEST_ID)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                }),
            )
            .layer(propagate_request_id_layer())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )));

        Router::new()
            .route("/", get(identity_handler))
            .route("/{*path}", get(identity_handler))
            .with_state(state)
            .layer(layers)
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_id = %self.request_id,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Resolve the caller's identity and render the payload.
async fn identity_handler(State(state): State<AppState>, headers: HeaderMap) -> IdentityResponse {
    let start = Instant::now();
    let cookie = forwarded_cookie(&headers);

    let outcome = state.resolver.resolve(cookie.as_ref()).await;
    let kind = outcome.kind();
    metrics::record_lookup(kind, start);
    tracing::info!(outcome = %kind, "Identity request handled");

    let (status, payload) = compose(state.request_id, outcome);
    IdentityResponse::new(status, payload)
}
