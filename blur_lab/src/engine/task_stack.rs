use std::thread;

use parking_lot::Mutex;

use super::region_task::RegionTask;
use super::{BlurParams, Strategy, StrategyKind};
use crate::error::{BlurError, Result};
use crate::snapshot::Snapshot;

/// LIFO stack shared by a set of workers behind a single mutex.
///
/// Every operation takes the lock for the duration of one push, pop or
/// length query only.
#[derive(Debug)]
pub struct TaskStack<T> {
    items: Mutex<Vec<T>>,
}

impl<T> Default for TaskStack<T> {
    fn default() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }
}

impl<T> TaskStack<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, item: T) {
        self.items.lock().push(item);
    }

    /// Pops the most recently pushed item. An empty stack yields `None`.
    pub fn pop(&self) -> Option<T> {
        self.items.lock().pop()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

impl<T> From<Vec<T>> for TaskStack<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }
}

/// Fixed pool of workers draining a per-pass [`TaskStack`] of regions.
///
/// All tasks are on the stack before the first worker starts; each worker
/// pops one task at a time, runs it without holding the lock and exits when
/// the stack is empty.
#[derive(Debug, Default)]
pub struct TaskStackWorkers;

impl Strategy for TaskStackWorkers {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TaskStack
    }

    fn execute(
        &self,
        snapshot: &Snapshot,
        tasks: Vec<RegionTask<'_>>,
        params: &BlurParams,
    ) -> Result<()> {
        let stack = TaskStack::from(tasks);
        drain_with_workers(&stack, params.effective_pool_size(), |task| task.run(snapshot))
    }
}

/// Starts `worker_count` named threads that pop and `work` items until
/// `stack` is empty, then joins them.
fn drain_with_workers<T, W>(stack: &TaskStack<T>, worker_count: usize, work: W) -> Result<()>
where
    T: Send,
    W: Fn(T) + Sync,
{
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(worker_count);
        let mut result = Ok(());

        for index in 0..worker_count {
            let name = format!("blur-stack-{index}");
            let work = &work;
            let spawned = thread::Builder::new()
                .name(name.clone())
                .spawn_scoped(scope, move || drain(stack, work));

            match spawned {
                Ok(handle) => handles.push((name, handle)),
                Err(source) => {
                    // Workers already running still drain the whole stack.
                    result = Err(BlurError::ThreadSpawn { name, source });
                    break;
                }
            }
        }

        for (name, handle) in handles {
            match handle.join() {
                Ok(executed) => tracing::trace!(worker = %name, executed, "Worker finished"),
                Err(_) => {
                    if result.is_ok() {
                        result = Err(BlurError::WorkerPanicked { name });
                    }
                }
            }
        }

        result
    })
}

/// Pops and runs items until the stack is empty. Returns how many ran.
fn drain<T>(stack: &TaskStack<T>, work: &impl Fn(T)) -> usize {
    let mut executed = 0;
    while let Some(item) = stack.pop() {
        work(item);
        executed += 1;
    }
    executed
}
