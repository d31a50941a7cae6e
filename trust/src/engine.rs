//! The trust engine: feeds observed transactions into a `TrustLedger` and
//! builds transactions that change trust.

use serde::{Deserialize, Serialize};
use tir_chain::{CoinSource, Script, Transaction};
use tir_types::{Entity, PublicKey, TrustAmount};
use tracing::{debug, info};

use crate::classify::classify;
use crate::edge::DirectTrust;
use crate::ledger::TrustLedger;
use crate::tag::tag_key;
use crate::TrustError;

/// Fee charged by the builders when the caller passes none.
pub const DEFAULT_FEE: u64 = 1000;

/// Shape of the shared outputs the builders create. Classification accepts
/// both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputVariant {
    /// 1-of-2 over origin and destination.
    Untagged,
    /// 1-of-3 over origin, destination and the tag key.
    #[default]
    Tagged,
}

impl OutputVariant {
    /// Shared output script between `origin` and `dest`.
    pub fn trust_script(&self, origin: &PublicKey, dest: &PublicKey) -> Result<Script, TrustError> {
        let script = match self {
            Self::Untagged => Script::multisig(1, &[origin.clone(), dest.clone()])?,
            Self::Tagged => {
                Script::multisig(1, &[origin.clone(), dest.clone(), tag_key().clone()])?
            }
        };
        Ok(script)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineOptions {
    pub default_fee: u64,
    pub output_variant: OutputVariant,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            default_fee: DEFAULT_FEE,
            output_variant: OutputVariant::default(),
        }
    }
}

/// Classifies observed transactions and builds trust-changing ones.
///
/// Observation is synchronous and in-memory. The builders look coins up
/// through `C`; the transactions they return are signed but not broadcast.
pub struct TrustEngine<C> {
    pub(crate) ledger: TrustLedger,
    pub(crate) coins: C,
    pub(crate) options: EngineOptions,
}

impl<C: CoinSource> TrustEngine<C> {
    pub fn new(coins: C) -> Self {
        Self::with_options(coins, EngineOptions::default())
    }

    pub fn with_options(coins: C, options: EngineOptions) -> Self {
        Self {
            ledger: TrustLedger::new(),
            coins,
            options,
        }
    }

    pub fn ledger(&self) -> &TrustLedger {
        &self.ledger
    }

    pub fn coins(&self) -> &C {
        &self.coins
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Record the trust changes carried by `tx`.
    ///
    /// Returns whether `tx` changed trust. Observing a transaction that
    /// already changed trust is an error, and so is any edge that fails its
    /// invariants; either way the ledger is left untouched.
    pub fn observe(&mut self, tx: &Transaction) -> Result<bool, TrustError> {
        let hash = tx.hash();
        if self.ledger.is_trust_tx(&hash) {
            return Err(TrustError::DuplicateTransaction(hash));
        }

        let edges = classify(&self.ledger, tx, hash)?;
        if edges.is_empty() {
            debug!(tx = %hash, "not a trust transaction");
            return Ok(false);
        }

        let count = edges.len();
        self.ledger.add_batch(edges)?;
        info!(tx = %hash, edges = count, "trust transaction observed");
        Ok(true)
    }

    /// The edges `tx` would produce, without recording them.
    pub fn direct_trusts_of(&self, tx: &Transaction) -> Result<Vec<DirectTrust>, TrustError> {
        classify(&self.ledger, tx, tx.hash())
    }

    pub fn direct_trust(&self, origin: &Entity, dest: &Entity) -> TrustAmount {
        self.ledger.direct_trust(origin, dest)
    }

    pub fn indirect_trust(&self, origin: &Entity, dest: &Entity) -> TrustAmount {
        self.ledger.indirect_trust(origin, dest)
    }
}
