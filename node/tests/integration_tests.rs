//! Integration tests exercising the node-side pipeline:
//! TOML config → service → ingestion queue → trust queries.

use std::io::Write;

use tir_chain::Transaction;
use tir_crypto::derive_entity;
use tir_node::{NodeError, TrustConfig, TrustService};
use tir_nullables::{NullCoinSource, Party};
use tir_trust::{DecreaseAuthority, OutputVariant};
use tir_types::TrustAmount;

const COIN: u64 = 100_000_000;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

async fn fund_and_trust(
    service: &TrustService<NullCoinSource>,
    from: &Party,
    to: &Party,
    amount: u64,
    coin_value: u64,
) -> Transaction {
    let engine = service.engine();
    let source = engine.read().await.coins().fund(from.public(), coin_value);
    let mtx = service
        .build_increase_tx(from.private(), to.public(), source, amount, None)
        .await
        .expect("build increase");
    assert!(mtx.verify());
    let tx = mtx.into_tx();
    engine.read().await.coins().apply(&tx);
    tx
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn configured_fee_and_variant_reach_the_builders() {
    let file = config_file(
        r#"
        default_fee = 5000
        output_variant = "untagged"
        channel_capacity = 4
        "#,
    );
    let config = TrustConfig::from_toml_file(file.path()).unwrap();
    let service = TrustService::new(NullCoinSource::new(), config).unwrap();
    let (alice, bob) = (Party::named("alice"), Party::named("bob"));

    let tx = fund_and_trust(&service, &alice, &bob, 10 * COIN, 11 * COIN).await;
    let (_, keys) = tx.outputs[0].script.multisig_keys().unwrap();
    assert_eq!(keys.len(), 2);
    assert_eq!(tx.outputs[1].value, COIN - 5000);
    assert_eq!(
        service.config().engine_options().output_variant,
        OutputVariant::Untagged
    );
}

#[tokio::test]
async fn queued_transactions_build_the_trust_graph() {
    let service = TrustService::new(NullCoinSource::new(), TrustConfig::default()).unwrap();
    let (alice, bob, charlie) = (
        Party::named("alice"),
        Party::named("bob"),
        Party::named("charlie"),
    );

    let ab = fund_and_trust(&service, &alice, &bob, 10 * COIN, 10 * COIN + 1000).await;
    let bc = fund_and_trust(&service, &bob, &charlie, 4 * COIN, 4 * COIN + 1000).await;

    let (feed, handle) = service.spawn_ingest();
    for tx in [ab, bc] {
        feed.send(tx).await.unwrap();
    }
    drop(feed);
    handle.await.unwrap();

    assert_eq!(service.direct_trust(&alice.entity, &charlie.entity).await, 0);
    assert_eq!(
        service.indirect_trust(&alice.entity, &charlie.entity).await,
        4 * COIN
    );
    assert_eq!(
        service.indirect_trust(&charlie.entity, &charlie.entity).await,
        TrustAmount::Infinite
    );
    assert_eq!(service.stats().accepted(), 2);
}

#[tokio::test]
async fn stolen_trust_is_gone() {
    let service = TrustService::new(NullCoinSource::new(), TrustConfig::default()).unwrap();
    let (alice, bob) = (Party::named("alice"), Party::named("bob"));
    let tx = fund_and_trust(&service, &alice, &bob, 3 * COIN, 3 * COIN + 1000).await;
    service.observe(&tx).await.unwrap();

    let txs = service
        .build_decrease_txs(
            DecreaseAuthority::Steal {
                origin: alice.public(),
                dest: bob.private(),
            },
            3 * COIN,
            Some(&derive_entity(bob.public())),
            None,
        )
        .await
        .unwrap();
    assert!(txs[0].verify());
    assert!(service.observe(&txs[0].to_tx()).await.unwrap());
    assert_eq!(service.direct_trust(&alice.entity, &bob.entity).await, 0);
}

#[tokio::test]
async fn builder_errors_surface_as_trust_errors() {
    let service = TrustService::new(NullCoinSource::new(), TrustConfig::default()).unwrap();
    let alice = Party::named("alice");
    let err = service
        .build_decrease_txs(
            DecreaseAuthority::Origin {
                origin: alice.private(),
                dest: alice.public(),
            },
            COIN,
            None,
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, NodeError::Trust(_)));
}
