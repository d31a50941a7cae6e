//! Trust is Risk: a trust network riding on a UTXO ledger.
//!
//! Trust from A to B is money A has locked in a 1-of-n output shared with B
//! (and, in tagged outputs, the public [`tag_key`]). B can take it at any
//! time; A can take it back. Every such output is a [`DirectTrust`] edge:
//!
//! - **Increase**: A spends a plain coin into a shared output, optionally
//!   returning change to itself.
//! - **Decrease**: the shared output is spent into a smaller shared output
//!   (the continuation) plus a payout, or into anything else, which
//!   nullifies the chain.
//!
//! The [`TrustLedger`] keeps every edge and answers direct trust (sum of
//! spendable edges) and indirect trust (maximum flow over the direct trust
//! graph). The [`TrustEngine`] classifies observed transactions and builds
//! new trust-changing ones.

pub mod build;
pub mod classify;
pub mod edge;
pub mod engine;
pub mod error;
pub mod flow;
pub mod ledger;
pub mod tag;

pub use build::DecreaseAuthority;
pub use edge::{DirectTrust, EdgeId, TrustOutput};
pub use engine::{EngineOptions, OutputVariant, TrustEngine, DEFAULT_FEE};
pub use error::TrustError;
pub use ledger::TrustLedger;
pub use tag::{derive_tag_key, derive_tag_point, tag_key, TAG_LABEL, TAG_PUBLIC_KEY};
