//! Metrics collection and exposition.
//!
//! # Metrics
//! - `identity_lookups_total` (counter): lookups by outcome
//! - `identity_lookup_duration_seconds` (histogram): time to resolve a request
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade and is a no-op until an
//!   exporter is installed
//! - Prometheus exporter serves its own HTTP listener

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::identity::OutcomeKind;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one finished lookup.
pub fn record_lookup(kind: OutcomeKind, start: Instant) {
    let outcome = kind.as_str();
    metrics::counter!("identity_lookups_total", "outcome" => outcome).increment(1);
    metrics::histogram!("identity_lookup_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
