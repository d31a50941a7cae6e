//! Shutdown signalling for the trust service's background tasks.
//!
//! Tasks subscribe to a `tokio::sync::broadcast` channel and `select!` on it
//! alongside their main loop.

use tokio::sync::broadcast;

pub struct ShutdownController {
    tx: broadcast::Sender<()>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// A receiver notified on shutdown.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Notify every subscriber. Returns how many were listening.
    pub fn shutdown(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}
