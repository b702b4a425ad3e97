//! Identity response parsing.
//!
//! The upstream status document nests the username several levels deep:
//!
//! ```text
//! { "categories": { "zss": { "plugins": {
//!     "org.zowe.zlux.auth.zss": { "username": "<string>" } } } } }
//! ```
//!
//! Every key on the path is required. Siblings (`success`, `expms`, ...) are
//! ignored.

use serde_json::Value;
use thiserror::Error;

/// Object keys from the document root down to the plugin entry.
const PLUGIN_PATH: [&str; 4] = ["categories", "zss", "plugins", "org.zowe.zlux.auth.zss"];

const USERNAME_KEY: &str = "username";

/// Why a username could not be extracted.
#[derive(Debug, Error)]
pub enum IdentityParseError {
    #[error("upstream body is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("missing or non-object key '{0}' on the username path")]
    MissingKey(&'static str),

    #[error("username is not a string")]
    NotAString,
}

/// Extract the username from an upstream body.
///
/// An explicit empty string is a successful result.
pub fn parse_username(body: &str) -> Result<String, IdentityParseError> {
    let root: Value = serde_json::from_str(body)?;

    let mut node = &root;
    for key in PLUGIN_PATH {
        node = node
            .as_object()
            .and_then(|obj| obj.get(key))
            .filter(|child| child.is_object())
            .ok_or(IdentityParseError::MissingKey(key))?;
    }

    match node.get(USERNAME_KEY) {
        Some(Value::String(username)) => Ok(username.clone()),
        Some(_) => Err(IdentityParseError::NotAString),
        None => Err(IdentityParseError::MissingKey(USERNAME_KEY)),
    }
}
