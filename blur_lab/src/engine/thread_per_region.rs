use std::thread;

use super::region_task::RegionTask;
use super::{BlurParams, Strategy, StrategyKind};
use crate::error::{BlurError, Result};
use crate::snapshot::Snapshot;

/// Spawns one OS thread per region, then joins all of them.
///
/// Parallelism is unbounded: a pixel partition creates one thread per
/// interior pixel. This is kept as-is so its thread creation cost can be
/// measured against the pooled strategies.
#[derive(Debug, Default)]
pub struct ThreadPerRegion;

impl Strategy for ThreadPerRegion {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ThreadPerRegion
    }

    fn execute(
        &self,
        snapshot: &Snapshot,
        tasks: Vec<RegionTask<'_>>,
        _params: &BlurParams,
    ) -> Result<()> {
        spawn_and_join(tasks.into_iter().map(move |task| move || task.run(snapshot)))
    }
}

/// Runs every job on its own named thread and waits for all of them.
///
/// A failed spawn stops further spawning; threads already started are still
/// joined before the error is returned.
fn spawn_and_join<J>(jobs: impl IntoIterator<Item = J>) -> Result<()>
where
    J: FnOnce() + Send,
{
    thread::scope(|scope| {
        let mut handles = Vec::new();
        let mut result = Ok(());

        for (index, job) in jobs.into_iter().enumerate() {
            let name = format!("blur-region-{index}");
            let spawned = thread::Builder::new()
                .name(name.clone())
                .spawn_scoped(scope, job);

            match spawned {
                Ok(handle) => handles.push((name, handle)),
                Err(source) => {
                    result = Err(BlurError::ThreadSpawn { name, source });
                    break;
                }
            }
        }

        // Join barrier: every started thread finishes before the pass ends.
        for (name, handle) in handles {
            if handle.join().is_err() && result.is_ok() {
                result = Err(BlurError::WorkerPanicked { name });
            }
        }

        result
    })
}
