//! Trust engine errors.

use thiserror::Error;
use tir_types::{Entity, Outpoint, TxHash};

#[derive(Debug, Error)]
pub enum TrustError {
    #[error("transaction already processed: {0} already carries trust")]
    DuplicateTransaction(TxHash),

    #[error("cannot change self-trust of {0}")]
    SelfTrust(Entity),

    #[error("insufficient trust: need {needed}, have {available}")]
    InsufficientTrust { needed: u64, available: u64 },

    #[error("insufficient funds: need {needed}, coin holds {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("trust amount must be non-zero")]
    ZeroAmount,

    #[error("coin {0} not found")]
    CoinNotFound(Outpoint),

    #[error("trust invariant violated: {0}")]
    InvariantViolation(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("tag label must fit in 32 bytes, got {0}")]
    TagLabelTooLong(usize),

    #[error("chain error: {0}")]
    Chain(#[from] tir_chain::ChainError),

    #[error("crypto error: {0}")]
    Crypto(#[from] tir_crypto::CryptoError),
}
