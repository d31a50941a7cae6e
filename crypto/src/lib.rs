//! Cryptographic primitives for the Trust is Risk overlay.
//!
//! - **secp256k1 ECDSA** for signing ledger inputs (RFC 6979, DER encoded)
//! - **SHA-256d** for transaction hashes and signature digests
//! - **hash160** (SHA-256 then RIPEMD-160) for pay-to-pubkey-hash scripts
//! - Entity derivation as base58check of the key's hash160

pub mod entity;
pub mod error;
pub mod hash;
pub mod keys;
pub mod sign;

pub use entity::{decode_entity, derive_entity, entity_from_hash, ENTITY_VERSION};
pub use error::CryptoError;
pub use hash::{hash160, sha256, sha256d};
pub use keys::{keypair_from_private, public_from_private, uncompressed, validate_public_key};
pub use sign::{sign_digest, verify_digest};
