//! Unspent outputs and their lookup.

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tir_types::Outpoint;

use crate::{ChainError, Script};

/// An unspent output: its value and locking script.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub value: u64,
    pub script: Script,
}

impl Coin {
    pub fn new(value: u64, script: Script) -> Self {
        Self { value, script }
    }
}

/// Coin lookup by outpoint, served by the ledger node.
///
/// Lookups may suspend on I/O. `Ok(None)` means the outpoint is unknown or
/// already spent; `Err` is reserved for backend failures.
pub trait CoinSource: Send + Sync {
    fn coin(
        &self,
        outpoint: &Outpoint,
    ) -> impl Future<Output = Result<Option<Coin>, ChainError>> + Send;
}

impl<C: CoinSource> CoinSource for Arc<C> {
    fn coin(
        &self,
        outpoint: &Outpoint,
    ) -> impl Future<Output = Result<Option<Coin>, ChainError>> + Send {
        (**self).coin(outpoint)
    }
}
