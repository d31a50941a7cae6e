//! ECDSA signing and verification over precomputed digests.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use tir_types::{PrivateKey, PublicKey};

use crate::CryptoError;

/// Sign a 32-byte digest, returning a DER-encoded low-S signature.
///
/// Signing is deterministic (RFC 6979), so the same key and digest always
/// produce the same bytes.
pub fn sign_digest(digest: &[u8; 32], private_key: &PrivateKey) -> Result<Vec<u8>, CryptoError> {
    let key = SigningKey::from_slice(&private_key.0).map_err(|_| CryptoError::InvalidPrivateKey)?;
    let signature: Signature = key
        .sign_prehash(digest)
        .map_err(|e| CryptoError::Signing(e.to_string()))?;
    let signature = signature.normalize_s().unwrap_or(signature);
    Ok(signature.to_der().as_bytes().to_vec())
}

/// Verify a DER-encoded signature over a digest.
///
/// Returns `false` for malformed keys or signatures rather than erroring.
pub fn verify_digest(digest: &[u8; 32], der_signature: &[u8], public_key: &PublicKey) -> bool {
    let Ok(key) = VerifyingKey::from_sec1_bytes(public_key.as_bytes()) else {
        return false;
    };
    let Ok(signature) = Signature::from_der(der_signature) else {
        return false;
    };
    key.verify_prehash(digest, &signature).is_ok()
}
