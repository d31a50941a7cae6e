//! Trust node integration. Wires the trust engine into a ledger node.
//!
//! The node side of the overlay:
//! - Loads [`TrustConfig`] from TOML
//! - Initialises structured logging
//! - Runs the [`TrustService`], which ingests every accepted ledger
//!   transaction in order and serves trust queries and transaction builders

pub mod config;
pub mod error;
pub mod logging;
pub mod service;
pub mod shutdown;

pub use config::TrustConfig;
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use service::{IngestStats, TrustService};
pub use shutdown::ShutdownController;
