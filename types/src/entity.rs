//! Entity identity type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable identity derived deterministically from a public key.
///
/// The string form is the base58check address of the key's hash160, so two
/// encodings of the same key (compressed and uncompressed) are distinct
/// entities, exactly as on the underlying ledger.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Entity(String);

impl Entity {
    /// Wrap an already-encoded entity string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw entity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Entity {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Entity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
