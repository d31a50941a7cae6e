//! Mutable transactions: assembly, unlocking templates, signing, verification.
//!
//! Signatures commit to the legacy `SIGHASH_ALL` digest: the transaction with
//! every unlocking script blanked except the signed input's, which is replaced
//! by the spent coin's locking script, followed by the 4-byte hash type.

use tir_crypto::{hash160, public_from_private, sign_digest, sha256d, verify_digest};
use tir_types::{Outpoint, PrivateKey, PublicKey};

use crate::{ChainError, Coin, Input, Output, Script, ScriptType, Transaction};

pub const SIGHASH_ALL: u8 = 0x01;

/// A transaction under construction. Inputs added with a coin remember it so
/// they can be signed and verified without another lookup.
#[derive(Clone, Debug, Default)]
pub struct MutableTransaction {
    inputs: Vec<Input>,
    outputs: Vec<Output>,
    coins: Vec<Option<Coin>>,
}

impl MutableTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outputs(outputs: Vec<Output>) -> Self {
        Self {
            outputs,
            ..Self::default()
        }
    }

    pub fn add_output(&mut self, output: Output) {
        self.outputs.push(output);
    }

    /// Add an input whose coin is not known to this transaction.
    pub fn add_input(&mut self, prevout: Outpoint) {
        self.inputs.push(Input::from_outpoint(prevout));
        self.coins.push(None);
    }

    /// Add an input spending `coin` at `prevout`.
    pub fn add_coin(&mut self, prevout: Outpoint, coin: Coin) {
        self.inputs.push(Input::from_outpoint(prevout));
        self.coins.push(Some(coin));
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn coin(&self, index: usize) -> Option<&Coin> {
        self.coins.get(index).and_then(Option::as_ref)
    }

    /// Write an unsigned unlocking template for input `index` against
    /// `prev_script`, on behalf of `key`.
    ///
    /// Pay-to-pubkey-hash: `OP_0 <key>`; multisig: `OP_0` followed by one
    /// `OP_0` placeholder per required signature. Returns `false` when `key`
    /// cannot unlock the script.
    pub fn script_template(
        &mut self,
        index: usize,
        prev_script: &Script,
        key: &PublicKey,
    ) -> Result<bool, ChainError> {
        let input = self
            .inputs
            .get_mut(index)
            .ok_or(ChainError::InputOutOfRange(index))?;

        match prev_script.script_type() {
            ScriptType::PubKeyHash => {
                if prev_script.pubkey_hash_bytes() != Some(hash160(key.as_bytes())) {
                    return Ok(false);
                }
                let empty: &[u8] = &[];
                input.script = Script::from_pushes(&[empty, key.as_bytes()]);
                Ok(true)
            }
            ScriptType::Multisig => {
                let Some((m, keys)) = prev_script.multisig_keys() else {
                    return Ok(false);
                };
                if !keys.contains(key) {
                    return Ok(false);
                }
                let empty: &[u8] = &[];
                let placeholders = vec![empty; m + 1];
                input.script = Script::from_pushes(&placeholders);
                Ok(true)
            }
            ScriptType::NonStandard => Ok(false),
        }
    }

    /// The `SIGHASH_ALL` digest for input `index` spending `prev_script`.
    pub fn signature_hash(&self, index: usize, prev_script: &Script) -> Result<[u8; 32], ChainError> {
        if index >= self.inputs.len() {
            return Err(ChainError::InputOutOfRange(index));
        }
        let mut copy = self.to_tx();
        for (i, input) in copy.inputs.iter_mut().enumerate() {
            input.script = if i == index {
                prev_script.clone()
            } else {
                Script::empty()
            };
        }
        let mut preimage = copy.serialize();
        preimage.extend_from_slice(&u32::from(SIGHASH_ALL).to_le_bytes());
        Ok(sha256d(&preimage))
    }

    /// Sign input `index`, which spends `coin`, with `key`.
    ///
    /// Returns `false` (leaving the input untouched) when the key has no
    /// authority over the coin or the coin needs more than one signature.
    pub fn sign_input(
        &mut self,
        index: usize,
        coin: &Coin,
        key: &PrivateKey,
    ) -> Result<bool, ChainError> {
        let public = public_from_private(key)?;
        let unlocking = match coin.script.script_type() {
            ScriptType::PubKeyHash => {
                if coin.script.pubkey_hash_bytes() != Some(hash160(public.as_bytes())) {
                    return Ok(false);
                }
                let signature = self.signature(index, coin, key)?;
                Script::from_pushes(&[signature.as_slice(), public.as_bytes()])
            }
            ScriptType::Multisig => {
                match coin.script.multisig_keys() {
                    Some((1, keys)) if keys.contains(&public) => {}
                    _ => return Ok(false),
                }
                let signature = self.signature(index, coin, key)?;
                Script::from_pushes(&[&[][..], signature.as_slice()])
            }
            ScriptType::NonStandard => return Ok(false),
        };
        self.inputs[index].script = unlocking;
        Ok(true)
    }

    /// Sign every input with a known coin that `key` can unlock. Returns the
    /// number of inputs signed.
    pub fn sign(&mut self, key: &PrivateKey) -> Result<usize, ChainError> {
        let mut signed = 0;
        for index in 0..self.inputs.len() {
            let Some(coin) = self.coins[index].clone() else {
                continue;
            };
            if self.sign_input(index, &coin, key)? {
                signed += 1;
            }
        }
        Ok(signed)
    }

    /// Check the unlocking script of input `index` against `coin`.
    pub fn verify_input(&self, index: usize, coin: &Coin) -> bool {
        let Some(input) = self.inputs.get(index) else {
            return false;
        };
        let Ok(digest) = self.signature_hash(index, &coin.script) else {
            return false;
        };
        let Some(pushes) = input.script.pushes() else {
            return false;
        };

        match coin.script.script_type() {
            ScriptType::PubKeyHash => {
                let [signature, key] = pushes.as_slice() else {
                    return false;
                };
                let Ok(key) = PublicKey::from_sec1(key) else {
                    return false;
                };
                coin.script.pubkey_hash_bytes() == Some(hash160(key.as_bytes()))
                    && check_signature(&digest, signature, &key)
            }
            ScriptType::Multisig => {
                let Some((1, keys)) = coin.script.multisig_keys() else {
                    return false;
                };
                let [dummy, signature] = pushes.as_slice() else {
                    return false;
                };
                dummy.is_empty() && keys.iter().any(|k| check_signature(&digest, signature, k))
            }
            ScriptType::NonStandard => false,
        }
    }

    /// Verify every input whose coin is known. Inputs without coins fail.
    pub fn verify(&self) -> bool {
        !self.inputs.is_empty()
            && self
                .coins
                .iter()
                .enumerate()
                .all(|(i, coin)| coin.as_ref().is_some_and(|c| self.verify_input(i, c)))
    }

    pub fn to_tx(&self) -> Transaction {
        Transaction::new(self.inputs.clone(), self.outputs.clone())
    }

    pub fn into_tx(self) -> Transaction {
        Transaction::new(self.inputs, self.outputs)
    }

    fn signature(&self, index: usize, coin: &Coin, key: &PrivateKey) -> Result<Vec<u8>, ChainError> {
        let digest = self.signature_hash(index, &coin.script)?;
        let mut signature = sign_digest(&digest, key)?;
        signature.push(SIGHASH_ALL);
        Ok(signature)
    }
}

fn check_signature(digest: &[u8; 32], signature: &[u8], key: &PublicKey) -> bool {
    match signature.split_last() {
        Some((&SIGHASH_ALL, der)) => verify_digest(digest, der, key),
        _ => false,
    }
}
