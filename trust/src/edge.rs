//! Direct trust edges.
//!
//! A `DirectTrust` is one trust delta backed by one ledger output. Edges form
//! spend chains mirroring the coins behind them: an increase starts a chain,
//! each decrease continues it with a smaller (or equal) amount, and a
//! nullifying edge closes it without any backing output.
//!
//! Edges live in the `TrustLedger` arena and refer to each other by
//! [`EdgeId`]. `prev` is set when an edge is classified; `next` is filled in
//! by [`DirectTrust::spend`] when the successor is recorded.

use serde::{Deserialize, Serialize};
use std::fmt;
use tir_chain::Script;
use tir_crypto::derive_entity;
use tir_types::{Entity, Outpoint, PublicKey, TxHash};

use crate::TrustError;

/// Handle of an edge inside a `TrustLedger`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The ledger output backing an edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrustOutput {
    pub index: u32,
    pub script: Script,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectTrust {
    pub origin: PublicKey,
    pub dest: PublicKey,
    pub amount: u64,
    /// Transaction that created this edge.
    pub tx_hash: TxHash,
    /// Backing output; `None` only for nullifying edges. Output index and
    /// script are present or absent together.
    pub output: Option<TrustOutput>,
    prev: Option<EdgeId>,
    next: Option<EdgeId>,
}

impl DirectTrust {
    pub fn new(
        origin: PublicKey,
        dest: PublicKey,
        amount: u64,
        tx_hash: TxHash,
        output: Option<TrustOutput>,
        prev: Option<EdgeId>,
    ) -> Self {
        Self {
            origin,
            dest,
            amount,
            tx_hash,
            output,
            prev,
            next: None,
        }
    }

    pub fn prev(&self) -> Option<EdgeId> {
        self.prev
    }

    pub fn next(&self) -> Option<EdgeId> {
        self.next
    }

    pub fn output_index(&self) -> Option<u32> {
        self.output.as_ref().map(|o| o.index)
    }

    pub fn script(&self) -> Option<&Script> {
        self.output.as_ref().map(|o| &o.script)
    }

    /// The backing outpoint, if any.
    pub fn outpoint(&self) -> Option<Outpoint> {
        self.output_index().map(|index| Outpoint::new(self.tx_hash, index))
    }

    pub fn origin_entity(&self) -> Entity {
        derive_entity(&self.origin)
    }

    pub fn dest_entity(&self) -> Entity {
        derive_entity(&self.dest)
    }

    pub fn is_null(&self) -> bool {
        self.amount == 0
    }

    pub fn is_increase(&self) -> bool {
        self.prev.is_none()
    }

    pub fn is_decrease(&self) -> bool {
        !self.is_increase()
    }

    pub fn is_spent(&self) -> bool {
        self.next.is_some()
    }

    pub fn is_spendable(&self) -> bool {
        !self.is_spent() && !self.is_null()
    }

    /// Check the structural invariants. Must be called after construction
    /// and after every `spend`.
    pub fn validate(&self) -> bool {
        if self.output.is_none() && (self.is_increase() || self.amount > 0) {
            return false;
        }
        if self.is_increase() && self.is_null() {
            return false;
        }
        !(self.is_spent() && self.is_null())
    }

    /// Whether `next` may continue this edge.
    pub fn check_spend(&self, next: &DirectTrust) -> Result<(), TrustError> {
        if self.is_spent() {
            return Err(TrustError::InvariantViolation(format!(
                "trust from tx {} is already spent",
                self.tx_hash
            )));
        }
        if self.origin != next.origin || self.dest != next.dest {
            return Err(TrustError::InvariantViolation(format!(
                "tx {} continues trust from tx {} between different parties",
                next.tx_hash, self.tx_hash
            )));
        }
        if next.amount > self.amount {
            return Err(TrustError::InvariantViolation(format!(
                "tx {} raises trust from {} to {}",
                next.tx_hash, self.amount, next.amount
            )));
        }
        Ok(())
    }

    /// Link `next` (stored at `next_id`) as the successor of this edge
    /// (stored at `self_id`).
    pub fn spend(
        &mut self,
        self_id: EdgeId,
        next_id: EdgeId,
        next: &mut DirectTrust,
    ) -> Result<(), TrustError> {
        self.check_spend(next)?;
        self.next = Some(next_id);
        next.prev = Some(self_id);
        Ok(())
    }

    /// A zero-amount successor closing this chain in transaction `tx_hash`.
    pub fn nullify(&self, self_id: EdgeId, tx_hash: TxHash) -> DirectTrust {
        DirectTrust::new(
            self.origin.clone(),
            self.dest.clone(),
            0,
            tx_hash,
            None,
            Some(self_id),
        )
    }
}
