use super::region_task::RegionTask;
use super::{BlurParams, Strategy, StrategyKind};
use crate::error::Result;
use crate::partition::whole_interior;
use crate::region::Region;
use crate::snapshot::Snapshot;

/// Single-threaded baseline every other strategy is checked against.
///
/// Ignores the requested partition and blurs the whole interior as one
/// region on the calling thread.
#[derive(Debug, Default)]
pub struct Sequential;

impl Strategy for Sequential {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Sequential
    }

    fn plan(&self, _params: &BlurParams, width: usize, height: usize) -> Vec<Region> {
        whole_interior(width, height).into_iter().collect()
    }

    fn execute(
        &self,
        snapshot: &Snapshot,
        tasks: Vec<RegionTask<'_>>,
        _params: &BlurParams,
    ) -> Result<()> {
        for task in tasks {
            task.run(snapshot);
        }
        Ok(())
    }
}
