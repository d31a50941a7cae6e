//! Deterministic fixture identities.
//!
//! Seven parties with fixed secp256k1 keys, so entities, scripts and
//! transaction hashes are stable across test runs.

use tir_crypto::{derive_entity, keypair_from_private};
use tir_types::{Entity, KeyPair, PrivateKey, PublicKey};

/// Fixture party names and their private keys (hex).
pub const PARTIES: [(&str, &str); 7] = [
    ("alice", "02b8f07a401eca4888039b1898f94db44c43ccc6d3aa8b27e9b6ed7b377b24c0"),
    ("bob", "2437025954568a8273968aa7535dbfc444fd8f8d0f5237cd96ac7234c77810ad"),
    ("charlie", "3bba2af9539d09b4fd2bdea1d3a2ce4bf5d779831b8781ee2acf9c03378b2ad7"),
    ("dave", "19bd8d853faefdb9b01e4de7f6096ff8f5f96d43e6564a5258307334a4aa59f3"),
    ("eve", "0503054cf7ebb4e62191af1d8de97945178d3f465ee88ef1fb4e80a70cb4a49a"),
    ("frank", "878dfe5b43ac858ea37b3a9eeba9e244f1848a30f78b2e5ac5b3ebde81ac7d45"),
    ("george", "1349a1318b1426e6f724cbfe7ecd2c46008a364a96c4bd20c83fc1c4ebb2eb4a"),
];

/// A fixture identity.
pub struct Party {
    pub name: &'static str,
    pub keys: KeyPair,
    pub entity: Entity,
}

impl Party {
    /// Look a fixture party up by name. Panics on unknown names.
    pub fn named(name: &str) -> Self {
        let (name, secret) = PARTIES
            .iter()
            .find(|(n, _)| *n == name)
            .copied()
            .unwrap_or_else(|| panic!("no fixture party named {name}"));
        let bytes: [u8; 32] = hex::decode(secret)
            .expect("fixture keys are hex")
            .try_into()
            .expect("fixture keys are 32 bytes");
        let keys = keypair_from_private(PrivateKey(bytes)).expect("fixture keys are valid");
        let entity = derive_entity(&keys.public);
        Self { name, keys, entity }
    }

    /// Every fixture party, in declaration order.
    pub fn all() -> Vec<Self> {
        PARTIES.iter().map(|(name, _)| Self::named(name)).collect()
    }

    pub fn public(&self) -> &PublicKey {
        &self.keys.public
    }

    pub fn private(&self) -> &PrivateKey {
        &self.keys.private
    }
}
