//! Locking and unlocking scripts.
//!
//! Only the two standard shapes the overlay cares about are built or
//! classified here:
//!
//! ```text
//! pay-to-pubkey-hash:  OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG
//! m-of-n multisig:     OP_m <key_1> .. <key_n> OP_n OP_CHECKMULTISIG
//! ```
//!
//! Everything else is `NonStandard`. Key encodings are carried verbatim, so a
//! script built here is byte-identical to one built by the ledger node.

use serde::{Deserialize, Serialize};
use std::fmt;
use tir_types::PublicKey;

use crate::ChainError;

pub const OP_0: u8 = 0x00;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_1: u8 = 0x51;
pub const OP_16: u8 = 0x60;
pub const OP_DUP: u8 = 0x76;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_CHECKSIG: u8 = 0xac;
pub const OP_CHECKMULTISIG: u8 = 0xae;

/// Maximum number of keys in a bare multisig script.
pub const MAX_MULTISIG_KEYS: usize = 16;

/// Standard classification of a locking script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptType {
    PubKeyHash,
    Multisig,
    NonStandard,
}

/// One parsed script element. `OP_0` parses as an empty push.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    Push(Vec<u8>),
    Op(u8),
}

#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Script(Vec<u8>);

impl Script {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build `OP_m <keys..> OP_n OP_CHECKMULTISIG`. Keys keep the given order.
    pub fn multisig(m: usize, keys: &[PublicKey]) -> Result<Self, ChainError> {
        let n = keys.len();
        if m == 0 || m > n || n > MAX_MULTISIG_KEYS {
            return Err(ChainError::InvalidScript(format!(
                "cannot build {}-of-{} multisig",
                m, n
            )));
        }
        let mut bytes = vec![small_int_op(m)];
        for key in keys {
            push_data(&mut bytes, key.as_bytes());
        }
        bytes.push(small_int_op(n));
        bytes.push(OP_CHECKMULTISIG);
        Ok(Self(bytes))
    }

    /// Build `OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG`.
    pub fn pubkey_hash(hash: &[u8; 20]) -> Self {
        let mut bytes = Vec::with_capacity(25);
        bytes.extend_from_slice(&[OP_DUP, OP_HASH160, 20]);
        bytes.extend_from_slice(hash);
        bytes.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
        Self(bytes)
    }

    /// Build a push-only script (unlocking scripts). Empty items become `OP_0`.
    pub fn from_pushes(items: &[&[u8]]) -> Self {
        let mut bytes = Vec::new();
        for item in items {
            push_data(&mut bytes, item);
        }
        Self(bytes)
    }

    /// Parse the script into instructions.
    pub fn instructions(&self) -> Result<Vec<Instruction>, ChainError> {
        let bytes = &self.0;
        let mut out = Vec::new();
        let mut pos = 0;
        while pos < bytes.len() {
            let op = bytes[pos];
            pos += 1;
            let len = match op {
                OP_0 => {
                    out.push(Instruction::Push(Vec::new()));
                    continue;
                }
                0x01..=0x4b => op as usize,
                OP_PUSHDATA1 => read_len(bytes, &mut pos, 1)?,
                OP_PUSHDATA2 => read_len(bytes, &mut pos, 2)?,
                OP_PUSHDATA4 => read_len(bytes, &mut pos, 4)?,
                _ => {
                    out.push(Instruction::Op(op));
                    continue;
                }
            };
            let end = pos
                .checked_add(len)
                .filter(|end| *end <= bytes.len())
                .ok_or_else(|| ChainError::InvalidScript("push past end of script".into()))?;
            out.push(Instruction::Push(bytes[pos..end].to_vec()));
            pos = end;
        }
        Ok(out)
    }

    /// The pushed items, if the script consists of pushes only.
    pub fn pushes(&self) -> Option<Vec<Vec<u8>>> {
        self.instructions()
            .ok()?
            .into_iter()
            .map(|i| match i {
                Instruction::Push(data) => Some(data),
                Instruction::Op(_) => None,
            })
            .collect()
    }

    pub fn script_type(&self) -> ScriptType {
        if self.pubkey_hash_bytes().is_some() {
            ScriptType::PubKeyHash
        } else if self.multisig_keys().is_some() {
            ScriptType::Multisig
        } else {
            ScriptType::NonStandard
        }
    }

    /// The committed key hash of a pay-to-pubkey-hash script.
    pub fn pubkey_hash_bytes(&self) -> Option<[u8; 20]> {
        let b = &self.0;
        let shaped = b.len() == 25
            && b[0] == OP_DUP
            && b[1] == OP_HASH160
            && b[2] == 20
            && b[23] == OP_EQUALVERIFY
            && b[24] == OP_CHECKSIG;
        if !shaped {
            return None;
        }
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&b[3..23]);
        Some(hash)
    }

    /// `(m, keys)` of a bare multisig script, keys in script order.
    pub fn multisig_keys(&self) -> Option<(usize, Vec<PublicKey>)> {
        let instructions = self.instructions().ok()?;
        let (first, rest) = instructions.split_first()?;
        let (last, rest) = rest.split_last()?;
        let (n_op, key_ops) = rest.split_last()?;

        if *last != Instruction::Op(OP_CHECKMULTISIG) {
            return None;
        }
        let m = small_int_value(first)?;
        let n = small_int_value(n_op)?;
        if n != key_ops.len() || m == 0 || m > n {
            return None;
        }

        let keys = key_ops
            .iter()
            .map(|op| match op {
                Instruction::Push(data) => PublicKey::from_sec1(data).ok(),
                Instruction::Op(_) => None,
            })
            .collect::<Option<Vec<_>>>()?;
        Some((m, keys))
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", hex::encode(&self.0))
    }
}

fn small_int_op(n: usize) -> u8 {
    // Callers bound n to 1..=16.
    OP_1 + (n as u8 - 1)
}

fn small_int_value(instruction: &Instruction) -> Option<usize> {
    match instruction {
        Instruction::Op(op) if (OP_1..=OP_16).contains(op) => Some((op - OP_1 + 1) as usize),
        _ => None,
    }
}

fn push_data(bytes: &mut Vec<u8>, data: &[u8]) {
    let len = data.len();
    if len == 0 {
        bytes.push(OP_0);
        return;
    }
    if len < OP_PUSHDATA1 as usize {
        bytes.push(len as u8);
    } else if len <= 0xff {
        bytes.push(OP_PUSHDATA1);
        bytes.push(len as u8);
    } else if len <= 0xffff {
        bytes.push(OP_PUSHDATA2);
        bytes.extend_from_slice(&(len as u16).to_le_bytes());
    } else {
        bytes.push(OP_PUSHDATA4);
        bytes.extend_from_slice(&(len as u32).to_le_bytes());
    }
    bytes.extend_from_slice(data);
}

fn read_len(bytes: &[u8], pos: &mut usize, width: usize) -> Result<usize, ChainError> {
    let end = *pos + width;
    let raw = bytes
        .get(*pos..end)
        .ok_or_else(|| ChainError::InvalidScript("truncated push length".into()))?;
    *pos = end;
    let mut buf = [0u8; 4];
    buf[..width].copy_from_slice(raw);
    Ok(u32::from_le_bytes(buf) as usize)
}
