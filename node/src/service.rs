//! The trust service: one engine fed by the node's accepted transactions.
//!
//! The node pushes every accepted transaction into a bounded queue. A single
//! ingestion task drains it in arrival order and applies each transaction
//! under the engine's write lock, so edge mutation is serialized globally.
//! Queries and builders take the read lock; coin lookups happen before it
//! is taken.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tir_chain::{CoinSource, MutableTransaction, Transaction};
use tir_trust::{DecreaseAuthority, TrustEngine, TrustError};
use tir_types::{Entity, Outpoint, PrivateKey, PublicKey, TrustAmount};
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::task::JoinHandle;

use crate::{NodeError, ShutdownController, TrustConfig};

/// Ingestion counters.
#[derive(Debug, Default)]
pub struct IngestStats {
    observed: AtomicU64,
    accepted: AtomicU64,
    rejected: AtomicU64,
}

impl IngestStats {
    /// Transactions processed, trust-carrying or not.
    pub fn observed(&self) -> u64 {
        self.observed.load(Ordering::Relaxed)
    }

    /// Transactions that changed trust.
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    /// Transactions refused with an error (duplicates, broken chains).
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    fn record(&self, outcome: &Result<bool, TrustError>) {
        self.observed.fetch_add(1, Ordering::Relaxed);
        match outcome {
            Ok(true) => {
                self.accepted.fetch_add(1, Ordering::Relaxed);
            }
            Ok(false) => {}
            Err(_) => {
                self.rejected.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

pub struct TrustService<C> {
    engine: Arc<RwLock<TrustEngine<Arc<C>>>>,
    coins: Arc<C>,
    stats: Arc<IngestStats>,
    shutdown: ShutdownController,
    config: TrustConfig,
}

impl<C: CoinSource + 'static> TrustService<C> {
    pub fn new(coins: C, config: TrustConfig) -> Result<Self, NodeError> {
        config.validate()?;
        let coins = Arc::new(coins);
        let engine = TrustEngine::with_options(Arc::clone(&coins), config.engine_options());
        Ok(Self {
            engine: Arc::new(RwLock::new(engine)),
            coins,
            stats: Arc::new(IngestStats::default()),
            shutdown: ShutdownController::new(),
            config,
        })
    }

    pub fn config(&self) -> &TrustConfig {
        &self.config
    }

    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// The coin source shared with the engine.
    pub fn coins(&self) -> &C {
        &self.coins
    }

    /// Shared handle to the engine.
    pub fn engine(&self) -> Arc<RwLock<TrustEngine<Arc<C>>>> {
        Arc::clone(&self.engine)
    }

    /// Start the ingestion task. Accepted transactions sent on the returned
    /// queue are applied in order; the task ends when every sender is
    /// dropped or on [`TrustService::shutdown`].
    pub fn spawn_ingest(&self) -> (mpsc::Sender<Transaction>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(self.config.channel_capacity);
        let handle = tokio::spawn(ingest(
            Arc::clone(&self.engine),
            Arc::clone(&self.stats),
            rx,
            self.shutdown.subscribe(),
        ));
        (tx, handle)
    }

    /// Stop background tasks.
    pub fn shutdown(&self) {
        let listeners = self.shutdown.shutdown();
        tracing::info!(listeners, "trust service shutting down");
    }

    /// Apply one transaction directly, bypassing the queue.
    pub async fn observe(&self, tx: &Transaction) -> Result<bool, NodeError> {
        let outcome = self.engine.write().await.observe(tx);
        self.stats.record(&outcome);
        Ok(outcome?)
    }

    pub async fn direct_trust(&self, origin: &Entity, dest: &Entity) -> TrustAmount {
        self.engine.read().await.direct_trust(origin, dest)
    }

    pub async fn indirect_trust(&self, origin: &Entity, dest: &Entity) -> TrustAmount {
        self.engine.read().await.indirect_trust(origin, dest)
    }

    pub async fn build_increase_tx(
        &self,
        origin: &PrivateKey,
        dest: &PublicKey,
        source: Outpoint,
        amount: u64,
        fee: Option<u64>,
    ) -> Result<MutableTransaction, NodeError> {
        // Looked up without the lock so a slow backend never stalls ingestion.
        let coin = self
            .coins
            .coin(&source)
            .await
            .map_err(TrustError::from)?
            .ok_or(TrustError::CoinNotFound(source))?;
        let engine = self.engine.read().await;
        Ok(engine.build_increase_from_coin(origin, dest, source, coin, amount, fee)?)
    }

    pub async fn build_decrease_txs(
        &self,
        authority: DecreaseAuthority<'_>,
        amount: u64,
        payee: Option<&Entity>,
        fee: Option<u64>,
    ) -> Result<Vec<MutableTransaction>, NodeError> {
        let engine = self.engine.read().await;
        Ok(engine
            .build_decrease_txs(authority, amount, payee, fee)
            .await?)
    }
}

async fn ingest<C: CoinSource>(
    engine: Arc<RwLock<TrustEngine<Arc<C>>>>,
    stats: Arc<IngestStats>,
    mut rx: mpsc::Receiver<Transaction>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    loop {
        let tx = tokio::select! {
            biased;
            _ = shutdown_rx.recv() => {
                tracing::info!("trust ingestion shutting down");
                break;
            }
            tx = rx.recv() => match tx {
                Some(tx) => tx,
                None => {
                    tracing::info!("transaction feed closed, trust ingestion stopping");
                    break;
                }
            },
        };

        let outcome = engine.write().await.observe(&tx);
        stats.record(&outcome);
        match outcome {
            Ok(true) => tracing::debug!(tx = %tx.hash(), "trust updated"),
            Ok(false) => {}
            Err(TrustError::DuplicateTransaction(hash)) => {
                tracing::warn!(tx = %hash, "duplicate trust transaction ignored");
            }
            Err(e) => tracing::warn!(tx = %tx.hash(), error = %e, "trust transaction rejected"),
        }
    }
}
