//! Nullable infrastructure for deterministic testing.
//!
//! The ledger node is abstracted behind `tir_chain::CoinSource`. This crate
//! provides test-friendly stand-ins that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap the node-backed coin source for [`NullCoinSource`] in tests,
//! and use [`fixtures`] for stable identities.

pub mod coins;
pub mod fixtures;

pub use coins::NullCoinSource;
pub use fixtures::{Party, PARTIES};
