//! The trust tag key.
//!
//! Every tagged trust output names one extra participant: a curve point whose
//! x coordinate spells out a public label. Light clients filter for it
//! without anybody holding its private key, and anybody can re-derive it:
//!
//! 1. x = label bytes, zero-padded on the right to 32 bytes.
//! 2. y = (x³ + 7)^((p + 1) / 4) mod p, a square root since p ≡ 3 (mod 4).
//! 3. If y² ≢ x³ + 7, increment x and retry.
//!
//! The resulting uncompressed point is a protocol constant.

use std::sync::OnceLock;

use num_bigint::BigUint;
use tir_types::PublicKey;

use crate::TrustError;

/// Label embedded in the tag key's x coordinate.
pub const TAG_LABEL: &str = "Trust is Risk";

/// SEC1 uncompressed encoding of the tag point derived from [`TAG_LABEL`].
pub const TAG_PUBLIC_KEY: [u8; 65] = [
    0x04, 0x54, 0x72, 0x75, 0x73, 0x74, 0x20, 0x69, 0x73, 0x20, 0x52, 0x69, 0x73, 0x6b, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x05, 0x5d, 0x5f, 0x28, 0x5e, 0xd7, 0x9d, 0x0c, 0x6f, 0x61, 0xc3, 0x0e,
    0xfc, 0x9d, 0x21, 0x91, 0x65, 0x82, 0x80, 0x59, 0xa6, 0x01, 0x25, 0x0c, 0x8e, 0xce, 0x18,
    0x00, 0x14, 0xde, 0x48, 0x1a,
];

const FIELD_BYTES: usize = 32;

/// secp256k1 field prime, 2^256 - 2^32 - 977.
fn field_prime() -> BigUint {
    (BigUint::from(1u8) << 256) - (BigUint::from(1u8) << 32) - BigUint::from(977u32)
}

/// Derive the uncompressed tag point for `label`.
pub fn derive_tag_point(label: &[u8]) -> Result<[u8; 65], TrustError> {
    if label.len() > FIELD_BYTES {
        return Err(TrustError::TagLabelTooLong(label.len()));
    }
    let p = field_prime();
    let exponent = (&p + 1u8) >> 2;
    let seven = BigUint::from(7u8);

    let mut padded = [0u8; FIELD_BYTES];
    padded[..label.len()].copy_from_slice(label);
    let mut x = BigUint::from_bytes_be(&padded);

    let y = loop {
        let rhs = (x.modpow(&BigUint::from(3u8), &p) + &seven) % &p;
        let y = rhs.modpow(&exponent, &p);
        if (&y * &y) % &p == rhs {
            break y;
        }
        x += 1u8;
    };

    let mut point = [0u8; 65];
    point[0] = 0x04;
    write_be(&mut point[1..33], &x);
    write_be(&mut point[33..], &y);
    Ok(point)
}

/// Derive the tag key for `label` as a public key.
pub fn derive_tag_key(label: &[u8]) -> Result<PublicKey, TrustError> {
    let point = derive_tag_point(label)?;
    PublicKey::from_sec1(&point).map_err(|e| TrustError::InvariantViolation(e.to_string()))
}

/// The protocol tag key.
pub fn tag_key() -> &'static PublicKey {
    static TAG: OnceLock<PublicKey> = OnceLock::new();
    TAG.get_or_init(|| {
        PublicKey::from_sec1(&TAG_PUBLIC_KEY).expect("tag constant is a well-formed SEC1 point")
    })
}

fn write_be(out: &mut [u8], value: &BigUint) {
    let bytes = value.to_bytes_be();
    let offset = out.len() - bytes.len();
    out[offset..].copy_from_slice(&bytes);
}
