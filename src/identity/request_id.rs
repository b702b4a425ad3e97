//! Process-lifetime request identifier.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Opaque numeric value generated once per process and echoed in every
/// response.
///
/// Serialized as a decimal string so clients never lose precision on
/// values above 2^53.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct RequestIdentifier(u64);

impl RequestIdentifier {
    /// Draw a fresh identifier in `0..=i64::MAX`.
    pub fn generate() -> Self {
        Self(rand::thread_rng().gen_range(0..=i64::MAX as u64))
    }

    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RequestIdentifier {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<RequestIdentifier> for String {
    fn from(id: RequestIdentifier) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for RequestIdentifier {
    type Error = ParseIntError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
