use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::region_task::RegionTask;
use super::{BlurParams, Strategy, StrategyKind};
use crate::error::{BlurError, Result};
use crate::snapshot::Snapshot;

/// Submits every region to a reusable rayon pool and waits for it to go idle.
///
/// The pool lives as long as the strategy and is shared by consecutive
/// passes; it is rebuilt only when a pass asks for a different size.
#[derive(Debug, Default)]
pub struct ManagedPool {
    pool: Mutex<Option<Arc<ThreadPool>>>,
    builds: AtomicUsize,
}

impl ManagedPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Thread count of the current pool, if one has been built.
    pub fn pool_threads(&self) -> Option<usize> {
        self.pool
            .lock()
            .as_ref()
            .map(|pool| pool.current_num_threads())
    }

    /// How many pools this strategy has built so far.
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    fn pool_with(&self, threads: usize) -> Result<Arc<ThreadPool>> {
        let mut slot = self.pool.lock();
        if let Some(pool) = slot.as_ref() {
            if pool.current_num_threads() == threads {
                return Ok(Arc::clone(pool));
            }
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("blur-pool-{index}"))
            .build()
            .map_err(|source| BlurError::PoolBuild { threads, source })?;
        self.builds.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(threads, "Built managed blur pool");

        let pool = Arc::new(pool);
        *slot = Some(Arc::clone(&pool));
        Ok(pool)
    }
}

impl Strategy for ManagedPool {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ManagedPool
    }

    fn execute(
        &self,
        snapshot: &Snapshot,
        tasks: Vec<RegionTask<'_>>,
        params: &BlurParams,
    ) -> Result<()> {
        let pool = self.pool_with(params.effective_pool_size())?;
        run_scoped(&pool, tasks.into_iter().map(move |task| move || task.run(snapshot)))
    }
}

/// Submits every job to `pool` and blocks until the pool has run them all.
fn run_scoped<I, J>(pool: &ThreadPool, jobs: I) -> Result<()>
where
    I: IntoIterator<Item = J> + Send,
    J: FnOnce() + Send,
{
    // `scope` returns only once every spawned job has completed.
    panic::catch_unwind(AssertUnwindSafe(|| {
        pool.scope(|scope| {
            for job in jobs {
                scope.spawn(move |_| job());
            }
        })
    }))
    .map_err(|_| BlurError::WorkerPanicked {
        name: "blur-pool".to_string(),
    })
}
