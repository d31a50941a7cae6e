//! Entity derivation from public keys.
//!
//! Entity format: base58check(`ENTITY_VERSION` ‖ hash160(public key)), the
//! same string the ledger uses for pay-to-pubkey-hash addresses, so a payout
//! to an entity and a change output to an entity are the same script.

use tir_types::{Entity, PublicKey};

use crate::{hash160, CryptoError};

/// Version byte prefixed to the key hash before base58check encoding.
pub const ENTITY_VERSION: u8 = 0x00;

/// Derive the entity for a public key.
pub fn derive_entity(public_key: &PublicKey) -> Entity {
    entity_from_hash(&hash160(public_key.as_bytes()))
}

/// Encode an already-hashed key as an entity.
pub fn entity_from_hash(key_hash: &[u8; 20]) -> Entity {
    let mut payload = Vec::with_capacity(21);
    payload.push(ENTITY_VERSION);
    payload.extend_from_slice(key_hash);
    Entity::new(bs58::encode(payload).with_check().into_string())
}

/// Decode an entity back into the 20-byte key hash it commits to.
pub fn decode_entity(entity: &Entity) -> Result<[u8; 20], CryptoError> {
    let decoded = bs58::decode(entity.as_str())
        .with_check(Some(ENTITY_VERSION))
        .into_vec()
        .map_err(|e| CryptoError::InvalidEntity(e.to_string()))?;
    if decoded.len() != 21 {
        return Err(CryptoError::InvalidEntity(format!(
            "expected 21 bytes, got {}",
            decoded.len()
        )));
    }
    let mut hash = [0u8; 20];
    hash.copy_from_slice(&decoded[1..]);
    Ok(hash)
}
