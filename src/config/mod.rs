//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → optional config file (TOML) via loader.rs
//!     → environment overlay (ZOWE_ZLUX_URL, IDENTITY_HELLO_BIND)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → AuthConfig handed to the HTTP server state
//! ```
//!
//! # Design Decisions
//! - Config is resolved once at startup and never reloaded
//! - All fields have defaults to allow running with no file at all
//! - An empty upstream URL is a legal value meaning "lookup disabled"

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{resolve_config, ConfigError};
pub use schema::AuthConfig;
pub use schema::ListenerConfig;
pub use schema::LogFormat;
pub use schema::ObservabilityConfig;
pub use schema::ServiceConfig;
