//! Trust node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use tir_trust::{EngineOptions, OutputVariant, DEFAULT_FEE};

use crate::{LogFormat, NodeError};

/// Configuration for the trust service.
///
/// Can be loaded from a TOML file via [`TrustConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustConfig {
    /// Fee in base units charged when a build request passes none.
    #[serde(default = "default_fee")]
    pub default_fee: u64,

    /// Shape of newly built trust outputs: "tagged" or "untagged".
    #[serde(default)]
    pub output_variant: OutputVariant,

    /// Bound of the accepted-transaction ingestion queue.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_fee() -> u64 {
    DEFAULT_FEE
}

fn default_channel_capacity() -> usize {
    1024
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl TrustConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| NodeError::Config(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), NodeError> {
        if self.channel_capacity == 0 {
            return Err(NodeError::Config("channel_capacity must be positive".into()));
        }
        Ok(())
    }

    /// Options for the trust engine.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            default_fee: self.default_fee,
            output_variant: self.output_variant,
        }
    }
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            default_fee: default_fee(),
            output_variant: OutputVariant::default(),
            channel_capacity: default_channel_capacity(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
