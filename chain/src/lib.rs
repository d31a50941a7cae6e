//! The ledger surface the trust overlay rides on.
//!
//! A deliberately small, bit-exact subset of a Bitcoin-style UTXO ledger:
//! scripts (pay-to-pubkey-hash and bare m-of-n multisig), transactions and
//! their legacy serialization, coin lookup, and input signing. Block
//! validation, peer sync and mempool handling live in the ledger node, not
//! here.

pub mod coin;
pub mod error;
pub mod mtx;
pub mod script;
pub mod transaction;

pub use coin::{Coin, CoinSource};
pub use error::ChainError;
pub use mtx::MutableTransaction;
pub use script::{Instruction, Script, ScriptType};
pub use transaction::{Input, Output, Transaction};
