//! Delegated identity lookup service.
//!
//! Answers every `GET` with the caller's username as reported by an upstream
//! identity service, looked up with the caller's own session cookie.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request (Cookie)
//!     ───────────────────────▶ http::server ──▶ identity::resolver ──▶ identity::client ──▶ GET {base_url}/auth
//!                                                     │                                          │
//!                                                     ▼                                          ▼
//!     Client Response (JSON)                   identity::outcome ◀────── identity::parser ◀─── upstream body
//!     ◀──────────────────────── http::response ◀──────┘
//! ```
//!
//! Configuration is resolved once at startup (`--config` file, then
//! `ZOWE_ZLUX_URL` / `IDENTITY_HELLO_BIND`), and the request identifier echoed
//! in every response is drawn once here.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use identity_hello::config::loader::warn_on_unparseable_url;
use identity_hello::config::resolve_config;
use identity_hello::lifecycle::signals::wait_for_termination;
use identity_hello::observability::{logging, metrics};
use identity_hello::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "identity-hello")]
#[command(about = "Resolve callers to usernames through an upstream identity service", long_about = None)]
struct Args {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(args.config.as_deref())?;

    logging::init(&config.observability)?;
    tracing::info!("identity-hello v{} starting", env!("CARGO_PKG_VERSION"));
    warn_on_unparseable_url(&config.upstream.base_url);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        lookup_enabled = !config.upstream.is_disabled(),
        allow_untrusted_upstream = config.upstream.allow_untrusted_upstream,
        upstream_timeout_secs = config.upstream.timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Address already checked by config validation.
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let mut server_task = tokio::spawn(server.run(listener, server_shutdown));

    tokio::select! {
        _ = wait_for_termination(&shutdown) => {
            (&mut server_task).await??;
        }
        // Server exited on its own (listener error).
        result = &mut server_task => {
            result??;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
