use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("trust error: {0}")]
    Trust(#[from] tir_trust::TrustError),

    #[error("config error: {0}")]
    Config(String),
}
