//! Nullable coin source: a thread-safe in-memory UTXO set for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;

use tir_chain::{ChainError, Coin, CoinSource, Script, Transaction};
use tir_crypto::hash160;
use tir_types::{Outpoint, PublicKey, TxHash};

/// An in-memory coin set. Thread-safe for use with tokio's multi-threaded
/// runtime.
pub struct NullCoinSource {
    coins: Mutex<HashMap<Outpoint, Coin>>,
    lookups: AtomicUsize,
    funded: AtomicU32,
    failing: AtomicBool,
}

impl NullCoinSource {
    pub fn new() -> Self {
        Self {
            coins: Mutex::new(HashMap::new()),
            lookups: AtomicUsize::new(0),
            funded: AtomicU32::new(0),
            failing: AtomicBool::new(false),
        }
    }

    pub fn insert(&self, outpoint: Outpoint, coin: Coin) {
        self.coins.lock().unwrap().insert(outpoint, coin);
    }

    pub fn remove(&self, outpoint: &Outpoint) -> Option<Coin> {
        self.coins.lock().unwrap().remove(outpoint)
    }

    pub fn contains(&self, outpoint: &Outpoint) -> bool {
        self.coins.lock().unwrap().contains_key(outpoint)
    }

    pub fn len(&self) -> usize {
        self.coins.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a pay-to-pubkey-hash coin of `value` for `key` at a fresh
    /// outpoint, as if a faucet had paid it.
    pub fn fund(&self, key: &PublicKey, value: u64) -> Outpoint {
        let n = self.funded.fetch_add(1, Ordering::SeqCst);
        let mut hash = [0xf0; 32];
        hash[..4].copy_from_slice(&n.to_be_bytes());
        let outpoint = Outpoint::new(TxHash::new(hash), 0);
        let script = Script::pubkey_hash(&hash160(key.as_bytes()));
        self.insert(outpoint, Coin::new(value, script));
        outpoint
    }

    /// Apply a confirmed transaction: its inputs are spent, its outputs
    /// become coins.
    pub fn apply(&self, tx: &Transaction) {
        let hash = tx.hash();
        let mut coins = self.coins.lock().unwrap();
        for input in &tx.inputs {
            coins.remove(&input.prevout);
        }
        for (index, output) in tx.outputs.iter().enumerate() {
            coins.insert(
                Outpoint::new(hash, index as u32),
                Coin::new(output.value, output.script.clone()),
            );
        }
    }

    /// Number of lookups served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Make every subsequent lookup fail as a backend error would.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Default for NullCoinSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CoinSource for NullCoinSource {
    async fn coin(&self, outpoint: &Outpoint) -> Result<Option<Coin>, ChainError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ChainError::Lookup(format!("backend unavailable for {}", outpoint)));
        }
        Ok(self.coins.lock().unwrap().get(outpoint).cloned())
    }
}
