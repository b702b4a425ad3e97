//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, routing)
//!     → request.rs (x-request-id, cookie extraction)
//!     → identity resolver (upstream lookup)
//!     → response.rs (JSON payload + content type)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::IdentityResponse;
pub use server::{AppState, HttpServer, ServerError};
