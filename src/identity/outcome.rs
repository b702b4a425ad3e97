//! Lookup outcomes and the JSON payload they compose into.
//!
//! | Outcome | Body | Status |
//! |---|---|---|
//! | Disabled | `{id, Hello: ""}` | 200 |
//! | Resolved(u) | `{id, Hello: u}` | 200 |
//! | UpstreamError(m) | `{id, Hello: "", Error: m}` | 200 |
//! | ParseDegraded(m) | `{id, Hello: "", Error: m}` | 200 |
//! | TransportError(m) | `{id, Error: m}` | 500 |
//!
//! A transport failure means the lookup mechanism itself broke and fails the
//! request. The other failures mean the lookup ran but produced no identity,
//! so they degrade to a 200 carrying an `Error` next to an empty `Hello`.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::identity::request_id::RequestIdentifier;

/// Message used when a 200 upstream body yields no username.
pub const NO_USERNAME_MESSAGE: &str = "No username given from zlux";

/// Prefix of the message for a non-200 upstream status.
pub const UPSTREAM_STATUS_PREFIX: &str = "zlux return code=";

/// Result of resolving one inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No upstream configured; lookup skipped.
    Disabled,
    /// Upstream returned a username.
    Resolved(String),
    /// Upstream reachable but answered with a non-200 status.
    UpstreamError(String),
    /// Upstream answered 200 with an unusable body.
    ParseDegraded(String),
    /// Upstream could not be reached.
    TransportError(String),
}

impl Outcome {
    pub fn upstream_status(status: u16) -> Self {
        Self::UpstreamError(format!("{UPSTREAM_STATUS_PREFIX}{status}"))
    }

    pub fn no_username() -> Self {
        Self::ParseDegraded(NO_USERNAME_MESSAGE.to_string())
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Disabled => OutcomeKind::Disabled,
            Outcome::Resolved(_) => OutcomeKind::Resolved,
            Outcome::UpstreamError(_) => OutcomeKind::UpstreamError,
            Outcome::ParseDegraded(_) => OutcomeKind::ParseDegraded,
            Outcome::TransportError(_) => OutcomeKind::TransportError,
        }
    }
}

/// Outcome category without its data, used for metrics and classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Disabled,
    Resolved,
    UpstreamError,
    ParseDegraded,
    TransportError,
}

impl OutcomeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeKind::Disabled => "disabled",
            OutcomeKind::Resolved => "resolved",
            OutcomeKind::UpstreamError => "upstream_error",
            OutcomeKind::ParseDegraded => "parse_degraded",
            OutcomeKind::TransportError => "transport_error",
        }
    }
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON body returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPayload {
    pub id: RequestIdentifier,

    #[serde(rename = "Hello", default, skip_serializing_if = "Option::is_none")]
    pub hello: Option<String>,

    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OutputPayload {
    /// Recover the outcome category from the field set.
    ///
    /// `Resolved("")` is indistinguishable from `Disabled` on the wire and
    /// classifies as `Disabled`. Returns `None` for shapes composition never
    /// produces (no `Hello` and no `Error`).
    pub fn classify(&self) -> Option<OutcomeKind> {
        match (self.hello.as_deref(), self.error.as_deref()) {
            (None, Some(_)) => Some(OutcomeKind::TransportError),
            (Some(""), None) => Some(OutcomeKind::Disabled),
            (Some(_), None) => Some(OutcomeKind::Resolved),
            (Some(_), Some(msg)) if msg.starts_with(UPSTREAM_STATUS_PREFIX) => {
                Some(OutcomeKind::UpstreamError)
            }
            (Some(_), Some(_)) => Some(OutcomeKind::ParseDegraded),
            (None, None) => None,
        }
    }
}

/// Build the response status and payload for an outcome.
pub fn compose(id: RequestIdentifier, outcome: Outcome) -> (StatusCode, OutputPayload) {
    let (status, hello, error) = match outcome {
        Outcome::Disabled => (StatusCode::OK, Some(String::new()), None),
        Outcome::Resolved(username) => (StatusCode::OK, Some(username), None),
        Outcome::UpstreamError(msg) | Outcome::ParseDegraded(msg) => {
            (StatusCode::OK, Some(String::new()), Some(msg))
        }
        Outcome::TransportError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, None, Some(msg)),
    };

    (status, OutputPayload { id, hello, error })
}
