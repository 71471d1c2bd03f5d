//! Engine configuration, loaded from a JSON file by the CLI.

use crate::graph::reducer::GraphReducer;
use crate::settlement::netting::NettingStrategy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Knobs for [`SettlementEngine`](crate::settlement::engine::SettlementEngine).
///
/// Missing fields fall back to their defaults, so `{}` is a valid config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Strategy used by `settle` and `report`.
    pub strategy: NettingStrategy,
    /// Cancel obligation cycles before pairwise netting.
    pub cancel_cycles: bool,
    /// Collapse two-hop chains before pairwise netting. Independent of
    /// `cancel_cycles`; with both off the graph is netted as extracted.
    pub collapse_chains: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: NettingStrategy::AggregateGreedy,
            cancel_cycles: true,
            collapse_chains: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn with_strategy(mut self, strategy: NettingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The graph reducer these settings describe.
    pub fn reducer(&self) -> GraphReducer {
        GraphReducer::new()
            .with_cycle_cancellation(self.cancel_cycles)
            .with_chain_collapse(self.collapse_chains)
    }
}
