//! Delegated identity resolution.
//!
//! # Data Flow
//! ```text
//! inbound Cookie header
//!     → resolver.rs (decides whether to look up at all)
//!     → client.rs (GET {base_url}/auth with the forwarded cookie)
//!     → parser.rs (username from the nested status document)
//!     → outcome.rs (Outcome → status code + JSON payload)
//! ```
//!
//! # Design Decisions
//! - One upstream lookup per request; nothing cached or retried
//! - Transport failures fail the request (500); everything else degrades to a
//!   200 with an `Error` field
//! - The request identifier is fixed for the process lifetime

pub mod client;
pub mod outcome;
pub mod parser;
pub mod request_id;
pub mod resolver;

pub use client::{NetworkError, UpstreamAuthClient, UpstreamAuthResponse};
pub use outcome::{compose, Outcome, OutcomeKind, OutputPayload};
pub use parser::{parse_username, IdentityParseError};
pub use request_id::RequestIdentifier;
pub use resolver::IdentityResolver;
