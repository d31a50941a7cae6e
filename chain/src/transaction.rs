//! Transactions, inputs and outputs with legacy serialization.

use serde::{Deserialize, Serialize};
use tir_crypto::{decode_entity, derive_entity, entity_from_hash, sha256d};
use tir_types::{Entity, Outpoint, PublicKey, TxHash};

use crate::{ChainError, Script, ScriptType};

pub const DEFAULT_SEQUENCE: u32 = 0xffff_ffff;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    pub prevout: Outpoint,
    /// Unlocking script.
    pub script: Script,
    pub sequence: u32,
}

impl Input {
    /// An unsigned input spending `prevout`.
    pub fn from_outpoint(prevout: Outpoint) -> Self {
        Self {
            prevout,
            script: Script::empty(),
            sequence: DEFAULT_SEQUENCE,
        }
    }

    /// The public key revealed by a pay-to-pubkey-hash unlocking script
    /// (`<signature> <public key>`), if the input has that shape.
    pub fn sender_key(&self) -> Option<PublicKey> {
        let pushes = self.script.pushes()?;
        match pushes.as_slice() {
            [signature, key] if !signature.is_empty() => PublicKey::from_sec1(key).ok(),
            _ => None,
        }
    }

    /// The entity that signed a pay-to-pubkey-hash input.
    pub fn sender_entity(&self) -> Option<Entity> {
        self.sender_key().map(|key| derive_entity(&key))
    }

    pub fn is_pubkey_hash_spend(&self) -> bool {
        self.sender_key().is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub value: u64,
    /// Locking script.
    pub script: Script,
}

impl Output {
    pub fn new(value: u64, script: Script) -> Self {
        Self { value, script }
    }

    /// A pay-to-pubkey-hash output paying `entity`.
    pub fn pay_to(entity: &Entity, value: u64) -> Result<Self, ChainError> {
        let hash = decode_entity(entity)?;
        Ok(Self::new(value, Script::pubkey_hash(&hash)))
    }

    pub fn script_type(&self) -> ScriptType {
        self.script.script_type()
    }

    /// Recipient entity of a pay-to-pubkey-hash output.
    pub fn recipient(&self) -> Option<Entity> {
        self.script.pubkey_hash_bytes().map(|hash| entity_from_hash(&hash))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    pub locktime: u32,
}

impl Transaction {
    pub const VERSION: u32 = 1;

    pub fn new(inputs: Vec<Input>, outputs: Vec<Output>) -> Self {
        Self {
            version: Self::VERSION,
            inputs,
            outputs,
            locktime: 0,
        }
    }

    /// Legacy wire serialization:
    /// `version | n_in | inputs | n_out | outputs | locktime`, little-endian,
    /// counts and script lengths as compact-size integers.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.version.to_le_bytes());
        write_compact_size(&mut out, self.inputs.len() as u64);
        for input in &self.inputs {
            out.extend_from_slice(input.prevout.hash.as_bytes());
            out.extend_from_slice(&input.prevout.index.to_le_bytes());
            write_compact_size(&mut out, input.script.len() as u64);
            out.extend_from_slice(input.script.as_bytes());
            out.extend_from_slice(&input.sequence.to_le_bytes());
        }
        write_compact_size(&mut out, self.outputs.len() as u64);
        for output in &self.outputs {
            out.extend_from_slice(&output.value.to_le_bytes());
            write_compact_size(&mut out, output.script.len() as u64);
            out.extend_from_slice(output.script.as_bytes());
        }
        out.extend_from_slice(&self.locktime.to_le_bytes());
        out
    }

    /// Double SHA-256 of the serialization.
    pub fn hash(&self) -> TxHash {
        TxHash::new(sha256d(&self.serialize()))
    }

    pub fn outpoint(&self, index: u32) -> Outpoint {
        Outpoint::new(self.hash(), index)
    }
}

pub(crate) fn write_compact_size(out: &mut Vec<u8>, n: u64) {
    match n {
        0..=0xfc => out.push(n as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&n.to_le_bytes());
        }
    }
}
