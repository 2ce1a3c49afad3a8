//! Experiment configuration, loadable from YAML or JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::engine::{default_pool_size, BlurParams, StrategyKind, DEFAULT_SECTORS};
use crate::error::{BlurError, Result};
use crate::partition::PartitionKind;

/// Default cap on thread-per-region passes. Typical Linux per-user thread
/// limits start failing spawns in the low tens of thousands.
pub const DEFAULT_THREAD_PER_REGION_LIMIT: usize = 4_096;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Timed passes per (strategy, partition) pair.
    pub repeats: usize,
    /// Target sector count for the sector partition.
    pub sectors: usize,
    /// Workers for the task-stack and managed-pool strategies.
    pub pool_size: usize,
    pub strategies: Vec<StrategyKind>,
    pub partitions: Vec<PartitionKind>,
    /// Thread-per-region passes planning more regions than this are skipped.
    pub thread_per_region_limit: usize,
    /// Whether the driver keeps the last output of every pair.
    pub save_outputs: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            repeats: 5,
            sectors: DEFAULT_SECTORS,
            pool_size: default_pool_size(),
            strategies: StrategyKind::iter().collect(),
            partitions: vec![
                PartitionKind::Row,
                PartitionKind::Column,
                PartitionKind::Sector,
                PartitionKind::Pixel,
            ],
            thread_per_region_limit: DEFAULT_THREAD_PER_REGION_LIMIT,
            save_outputs: true,
        }
    }
}

impl ExperimentConfig {
    /// Loads a config file; missing fields keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: ExperimentConfig = common::file_format::load_file(path.as_ref())?;
        config.validate()?;
        tracing::debug!(path = %path.as_ref().display(), ?config, "Loaded experiment config");
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        common::file_format::save_file(self, path)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.repeats == 0 {
            return Err(BlurError::InvalidConfig(
                "repeats must be at least 1".to_string(),
            ));
        }
        if self.strategies.is_empty() {
            return Err(BlurError::InvalidConfig(
                "at least one strategy is required".to_string(),
            ));
        }
        if self.partitions.is_empty() {
            return Err(BlurError::InvalidConfig(
                "at least one partition is required".to_string(),
            ));
        }
        Ok(())
    }

    pub fn params(&self, partition: PartitionKind) -> BlurParams {
        BlurParams::new(partition)
            .with_sectors(self.sectors)
            .with_pool_size(self.pool_size)
    }
}
