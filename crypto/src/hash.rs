//! SHA-256 and RIPEMD-160 hashing for transactions and scripts.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Compute a single SHA-256 digest of arbitrary data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut output = [0u8; 32];
    output.copy_from_slice(&Sha256::digest(data));
    output
}

/// Double SHA-256, used for transaction hashes and signature digests.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// RIPEMD-160 of SHA-256, the hash committed to by pay-to-pubkey-hash outputs.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let mut output = [0u8; 20];
    output.copy_from_slice(&Ripemd160::digest(sha256(data)));
    output
}
