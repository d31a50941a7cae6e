//! Key material for secp256k1 identities.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::TypesError;

/// A SEC1-encoded secp256k1 public key: 33 bytes compressed (`02`/`03`
/// prefix) or 65 bytes uncompressed (`04` prefix).
///
/// Only the encoding shape is checked here; curve membership is checked by
/// `tir_crypto::validate_public_key`. Equality is byte equality, which is
/// what script matching on the ledger uses.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PublicKey(Vec<u8>);

impl PublicKey {
    pub const COMPRESSED_LEN: usize = 33;
    pub const UNCOMPRESSED_LEN: usize = 65;

    /// Wrap SEC1 bytes after checking length and prefix.
    pub fn from_sec1(bytes: &[u8]) -> Result<Self, TypesError> {
        let well_formed = match bytes.len() {
            Self::COMPRESSED_LEN => bytes[0] == 0x02 || bytes[0] == 0x03,
            Self::UNCOMPRESSED_LEN => bytes[0] == 0x04,
            _ => false,
        };
        if !well_formed {
            return Err(TypesError::InvalidPublicKey(format!(
                "{} bytes with prefix {:?}",
                bytes.len(),
                bytes.first()
            )));
        }
        Ok(Self(bytes.to_vec()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_compressed(&self) -> bool {
        self.0.len() == Self::COMPRESSED_LEN
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = &self.0[..self.0.len().min(5)];
        write!(f, "PublicKey({}..)", hex::encode(head))
    }
}

/// A 32-byte secp256k1 secret scalar.
///
/// This type intentionally does not implement `Debug`, `Serialize`, or `Clone`
/// to prevent accidental exposure. Key bytes are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(pub [u8; 32]);

/// A secp256k1 key pair (public + private).
///
/// Use `tir_crypto::keypair_from_private()` to construct key pairs. This
/// struct is intentionally just data.
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}
