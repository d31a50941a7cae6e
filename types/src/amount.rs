//! Trust amounts.
//!
//! Direct trust is a sum of ledger output values (base units, u64). One's
//! trust in oneself is unbounded, so query results carry an explicit
//! infinity instead of a sentinel value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of a direct or indirect trust query.
///
/// Variant order makes every finite amount compare below `Infinite`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrustAmount {
    Finite(u64),
    Infinite,
}

impl TrustAmount {
    pub const ZERO: Self = Self::Finite(0);

    pub fn is_infinite(&self) -> bool {
        matches!(self, Self::Infinite)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// The finite value, or `None` for self-trust.
    pub fn finite(&self) -> Option<u64> {
        match self {
            Self::Finite(v) => Some(*v),
            Self::Infinite => None,
        }
    }
}

impl From<u64> for TrustAmount {
    fn from(v: u64) -> Self {
        Self::Finite(v)
    }
}

impl PartialEq<u64> for TrustAmount {
    fn eq(&self, other: &u64) -> bool {
        matches!(self, Self::Finite(v) if v == other)
    }
}

impl fmt::Display for TrustAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(v) => write!(f, "{}", v),
            Self::Infinite => write!(f, "infinity"),
        }
    }
}
