use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("invalid script: {0}")]
    InvalidScript(String),

    #[error("input index {0} out of range")]
    InputOutOfRange(usize),

    #[error("coin lookup failed: {0}")]
    Lookup(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] tir_crypto::CryptoError),

    #[error("types error: {0}")]
    Types(#[from] tir_types::TypesError),
}
