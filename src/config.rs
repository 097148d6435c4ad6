//! Configuration for the gateway and aggregation defaults
//!
//! Loaded from a TOML file with `[cache]` and `[aggregate]` sections; every
//! field is defaultable and a missing file yields the defaults.

use crate::aggregate::{AggregateOptions, MergeStrategy, ResultMode};
use crate::cache::CacheConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub aggregate: AggregateDefaults,
}

/// Per-deployment defaults for aggregation calls; callers can still
/// override any of these per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateDefaults {
    #[serde(default)]
    pub merge_strategy: MergeStrategy,
    #[serde(default = "default_true")]
    pub normalize_scores: bool,
    #[serde(default)]
    pub result_mode: ResultMode,
}

fn default_true() -> bool {
    true
}

impl Default for AggregateDefaults {
    fn default() -> Self {
        Self {
            merge_strategy: MergeStrategy::default(),
            normalize_scores: true,
            result_mode: ResultMode::default(),
        }
    }
}

impl AggregateDefaults {
    /// Seed call options from the configured defaults.
    pub fn to_options(&self) -> AggregateOptions {
        AggregateOptions {
            merge_strategy: self.merge_strategy,
            normalize_scores: self.normalize_scores,
            result_mode: self.result_mode,
            ..AggregateOptions::default()
        }
    }
}

impl GatewayConfig {
    /// Load from a TOML file; a missing file falls back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}
