use std::io;

use super::region_task::RegionTask;
use super::{BlurParams, Strategy, StrategyKind};
use crate::error::{BlurError, Result};
use crate::snapshot::Snapshot;

/// Thread-per-region stand-in that blurs its first region and then fails
/// the way a thread limit does.
#[derive(Debug, Default)]
pub(crate) struct FailingAfterFirstRegion;

impl Strategy for FailingAfterFirstRegion {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ThreadPerRegion
    }

    fn execute(
        &self,
        snapshot: &Snapshot,
        tasks: Vec<RegionTask<'_>>,
        _params: &BlurParams,
    ) -> Result<()> {
        if let Some(first) = tasks.into_iter().next() {
            first.run(snapshot);
        }
        Err(BlurError::ThreadSpawn {
            name: "blur-region-1".to_string(),
            source: io::Error::from(io::ErrorKind::WouldBlock),
        })
    }
}
