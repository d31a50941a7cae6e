//! Shared helpers for the trust integration tests.

#![allow(dead_code)]

use tir_chain::{MutableTransaction, Transaction};
use tir_nullables::{NullCoinSource, Party};
use tir_trust::{EngineOptions, OutputVariant, TrustEngine, DEFAULT_FEE};
use tir_types::Outpoint;

pub const COIN: u64 = 100_000_000;

pub fn engine() -> TrustEngine<NullCoinSource> {
    TrustEngine::new(NullCoinSource::new())
}

pub fn engine_with(variant: OutputVariant) -> TrustEngine<NullCoinSource> {
    TrustEngine::with_options(
        NullCoinSource::new(),
        EngineOptions {
            output_variant: variant,
            ..EngineOptions::default()
        },
    )
}

/// Pay `party` a fresh coin.
pub fn fund(engine: &TrustEngine<NullCoinSource>, party: &Party, value: u64) -> Outpoint {
    engine.coins().fund(party.public(), value)
}

/// Confirm a built transaction: apply it to the coin set and observe it.
pub fn confirm(engine: &mut TrustEngine<NullCoinSource>, mtx: &MutableTransaction) -> Transaction {
    let tx = mtx.to_tx();
    engine.coins().apply(&tx);
    engine.observe(&tx).expect("observe");
    tx
}

/// Fund `from` exactly enough to trust `to` with `amount`, then build,
/// confirm and observe the increase.
pub async fn trust(
    engine: &mut TrustEngine<NullCoinSource>,
    from: &Party,
    to: &Party,
    amount: u64,
) -> Transaction {
    let source = fund(engine, from, amount + DEFAULT_FEE);
    let mtx = engine
        .build_increase_tx(from.private(), to.public(), source, amount, None)
        .await
        .expect("build increase");
    assert!(mtx.verify());
    confirm(engine, &mtx)
}
