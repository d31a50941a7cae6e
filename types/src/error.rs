//! Errors raised while constructing fundamental types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid public key encoding: {0}")]
    InvalidPublicKey(String),

    #[error("invalid transaction hash: {0}")]
    InvalidHash(String),
}
