use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid private key")]
    InvalidPrivateKey,

    #[error("public key is not a point on secp256k1")]
    InvalidPublicKey,

    #[error("invalid entity encoding: {0}")]
    InvalidEntity(String),

    #[error("signing failed: {0}")]
    Signing(String),
}
