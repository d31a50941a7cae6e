//! secp256k1 key derivation.

use k256::ecdsa::{SigningKey, VerifyingKey};
use tir_types::{KeyPair, PrivateKey, PublicKey};

use crate::CryptoError;

fn signing_key(private: &PrivateKey) -> Result<SigningKey, CryptoError> {
    SigningKey::from_slice(&private.0).map_err(|_| CryptoError::InvalidPrivateKey)
}

fn encode(verifying_key: &VerifyingKey, compress: bool) -> Result<PublicKey, CryptoError> {
    let point = verifying_key.to_encoded_point(compress);
    PublicKey::from_sec1(point.as_bytes()).map_err(|_| CryptoError::InvalidPublicKey)
}

/// Derive the compressed public key from a private key.
pub fn public_from_private(private: &PrivateKey) -> Result<PublicKey, CryptoError> {
    let key = signing_key(private)?;
    encode(key.verifying_key(), true)
}

/// Reconstruct a full key pair from a private key.
pub fn keypair_from_private(private: PrivateKey) -> Result<KeyPair, CryptoError> {
    let public = public_from_private(&private)?;
    Ok(KeyPair { public, private })
}

/// Check that SEC1 bytes name an actual point on the curve.
pub fn validate_public_key(public: &PublicKey) -> Result<(), CryptoError> {
    VerifyingKey::from_sec1_bytes(public.as_bytes())
        .map(|_| ())
        .map_err(|_| CryptoError::InvalidPublicKey)
}

/// Re-encode a public key in 65-byte uncompressed form.
pub fn uncompressed(public: &PublicKey) -> Result<PublicKey, CryptoError> {
    let key = VerifyingKey::from_sec1_bytes(public.as_bytes())
        .map_err(|_| CryptoError::InvalidPublicKey)?;
    encode(&key, false)
}
