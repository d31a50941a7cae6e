//! Fundamental types for the Trust is Risk overlay.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! transaction hashes, outpoints, entities, key material and trust amounts.

pub mod amount;
pub mod entity;
pub mod error;
pub mod hash;
pub mod keys;
pub mod outpoint;

pub use amount::TrustAmount;
pub use entity::Entity;
pub use error::TypesError;
pub use hash::TxHash;
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use outpoint::Outpoint;
