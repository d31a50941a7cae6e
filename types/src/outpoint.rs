//! Reference to one specific transaction output.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TxHash;

/// `(transaction hash, output index)` identifying one ledger output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Outpoint {
    pub hash: TxHash,
    pub index: u32,
}

impl Outpoint {
    pub fn new(hash: TxHash, index: u32) -> Self {
        Self { hash, index }
    }
}

impl fmt::Display for Outpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hash, self.index)
    }
}
