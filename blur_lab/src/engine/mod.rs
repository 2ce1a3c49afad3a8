//! Blur pass execution.
//!
//! A pass captures a [`Snapshot`], plans regions over it, hands every region
//! exclusive access to its own destination pixels and lets a [`Strategy`]
//! run the resulting tasks. The caller blocks until every region is done.

mod managed_pool;
mod region_task;
mod sequential;
mod task_stack;
mod thread_per_region;

#[cfg(test)]
pub(crate) mod testing;
#[cfg(test)]
mod tests;

use std::time::Instant;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::Result;
use crate::partition::{self, PartitionKind};
use crate::picture::Picture;
use crate::region::Region;
use crate::snapshot::Snapshot;

pub use managed_pool::ManagedPool;
pub use region_task::RegionTask;
pub use sequential::Sequential;
pub use task_stack::{TaskStack, TaskStackWorkers};
pub use thread_per_region::ThreadPerRegion;

pub const DEFAULT_SECTORS: usize = 4;

/// Identifies one of the execution strategies.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StrategyKind {
    Sequential,
    ThreadPerRegion,
    TaskStack,
    ManagedPool,
}

/// Per-pass parameters. Fields a strategy has no use for are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlurParams {
    pub partition: PartitionKind,
    /// Target sector count for [`PartitionKind::Sector`].
    pub sectors: usize,
    /// Worker count for the task-stack and managed-pool strategies.
    pub pool_size: usize,
}

impl Default for BlurParams {
    fn default() -> Self {
        Self {
            partition: PartitionKind::Row,
            sectors: DEFAULT_SECTORS,
            pool_size: default_pool_size(),
        }
    }
}

impl BlurParams {
    pub fn new(partition: PartitionKind) -> Self {
        Self {
            partition,
            ..Default::default()
        }
    }

    pub fn with_sectors(mut self, sectors: usize) -> Self {
        self.sectors = sectors;
        self
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn plan(&self, width: usize, height: usize) -> Vec<Region> {
        partition::plan(self.partition, width, height, self.sectors)
    }

    /// Pool size with 0 promoted to a single worker.
    pub fn effective_pool_size(&self) -> usize {
        if self.pool_size == 0 {
            tracing::warn!("Pool size 0 requested, using a single worker");
            1
        } else {
            self.pool_size
        }
    }
}

/// Number of threads the machine can run in parallel, at least 1.
pub fn default_pool_size() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// One way of executing the regions of a pass.
pub trait Strategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Regions this strategy works on for a `width` x `height` picture.
    fn plan(&self, params: &BlurParams, width: usize, height: usize) -> Vec<Region> {
        params.plan(width, height)
    }

    /// Runs every task to completion before returning.
    fn execute(
        &self,
        snapshot: &Snapshot,
        tasks: Vec<RegionTask<'_>>,
        params: &BlurParams,
    ) -> Result<()>;

    /// Blurs `picture` in one pass, in place.
    ///
    /// On failure the picture is rolled back to its snapshot before the error
    /// is returned, so the caller keeps its unblurred input.
    fn run_in_place(&self, picture: &mut Picture, params: &BlurParams) -> Result<()> {
        let started = Instant::now();
        let snapshot = Snapshot::capture(picture);
        let regions = self.plan(params, snapshot.width(), snapshot.height());

        let outcome = {
            let tasks = region_task::split_into_tasks(picture, &regions);
            let task_count = tasks.len();
            if task_count == 0 {
                Ok(0)
            } else {
                self.execute(&snapshot, tasks, params).map(|_| task_count)
            }
        };

        match outcome {
            Ok(task_count) => {
                tracing::debug!(
                    strategy = %self.kind(),
                    partition = %params.partition,
                    regions = task_count,
                    elapsed = ?started.elapsed(),
                    "Blur pass complete"
                );
                Ok(())
            }
            Err(err) => {
                picture.restore_from(&snapshot);
                tracing::error!(strategy = %self.kind(), "Blur pass failed, picture restored: {}", err);
                Err(err)
            }
        }
    }

    /// Blurs an owned picture and hands it back.
    ///
    /// The picture is consumed even on failure; use
    /// [`Strategy::run_in_place`] to keep the restored input.
    fn run(&self, mut picture: Picture, params: &BlurParams) -> Result<Picture> {
        self.run_in_place(&mut picture, params)?;
        Ok(picture)
    }
}

/// Owns one instance of every strategy and dispatches passes by kind.
///
/// Keeping the engine alive between passes keeps the managed pool's threads
/// alive too.
#[derive(Debug, Default)]
pub struct BlurEngine {
    sequential: Sequential,
    thread_per_region: ThreadPerRegion,
    task_stack: TaskStackWorkers,
    managed_pool: ManagedPool,
}

impl BlurEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strategy(&self, kind: StrategyKind) -> &dyn Strategy {
        match kind {
            StrategyKind::Sequential => &self.sequential,
            StrategyKind::ThreadPerRegion => &self.thread_per_region,
            StrategyKind::TaskStack => &self.task_stack,
            StrategyKind::ManagedPool => &self.managed_pool,
        }
    }

    pub fn managed_pool(&self) -> &ManagedPool {
        &self.managed_pool
    }

    pub fn run(&self, kind: StrategyKind, picture: Picture, params: &BlurParams) -> Result<Picture> {
        self.strategy(kind).run(picture, params)
    }

    pub fn run_in_place(
        &self,
        kind: StrategyKind,
        picture: &mut Picture,
        params: &BlurParams,
    ) -> Result<()> {
        self.strategy(kind).run_in_place(picture, params)
    }
}
