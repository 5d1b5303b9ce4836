//! Scoped OS threads, created for one batch and joined before it returns.

use super::{panic_message, ExecutionReport, Executor, ReapFailure, Task};
use crate::error::{ReduceError, Result};
use std::io;
use std::thread::{self, ScopedJoinHandle};
use tracing::{debug, warn};

/// Configuration for [`ThreadExecutor`].
#[derive(Clone, Debug)]
pub struct ThreadExecutorConfig {
    /// Prefix for worker thread names (e.g. `"dot-worker"`)
    pub name_prefix: String,
    /// Worker stack size in bytes; platform default when `None`
    pub stack_size: Option<usize>,
}

impl Default for ThreadExecutorConfig {
    fn default() -> Self {
        Self {
            name_prefix: "dot-worker".to_string(),
            stack_size: None,
        }
    }
}

/// Spawns one named thread per task and joins all of them.
#[derive(Clone, Debug, Default)]
pub struct ThreadExecutor {
    config: ThreadExecutorConfig,
}

impl ThreadExecutor {
    pub fn new(config: ThreadExecutorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ThreadExecutorConfig {
        &self.config
    }
}

impl Executor for ThreadExecutor {
    fn name(&self) -> &'static str {
        "threads"
    }

    fn run_all<'env>(&self, tasks: Vec<Task<'env>>) -> Result<ExecutionReport> {
        thread::scope(|scope| {
            launch_and_reap(tasks, |worker, task| {
                let mut builder =
                    thread::Builder::new().name(format!("{}-{}", self.config.name_prefix, worker));
                if let Some(size) = self.config.stack_size {
                    builder = builder.stack_size(size);
                }
                builder.spawn_scoped(scope, task)
            })
        })
    }
}

/// Launch every task through `spawn`, keeping a ledger of live handles.
///
/// On the first launch failure every handle already in the ledger is joined
/// before the error is returned, so no worker outlives the call.
pub(crate) fn launch_and_reap<'scope, 'env, S>(
    tasks: Vec<Task<'env>>,
    mut spawn: S,
) -> Result<ExecutionReport>
where
    S: FnMut(usize, Task<'env>) -> io::Result<ScopedJoinHandle<'scope, ()>>,
{
    let requested = tasks.len();
    let mut ledger: Vec<(usize, ScopedJoinHandle<'scope, ()>)> = Vec::new();
    ledger
        .try_reserve_exact(requested)
        .map_err(|e| ReduceError::Allocation {
            requested,
            reason: e.to_string(),
        })?;

    for (worker, task) in tasks.into_iter().enumerate() {
        match spawn(worker, task) {
            Ok(handle) => ledger.push((worker, handle)),
            Err(source) => {
                let joined = reap(ledger);
                warn!(
                    worker,
                    joined = joined.launched,
                    error = %source,
                    "worker launch failed; joined already-launched workers"
                );
                return Err(ReduceError::Launch { worker, source });
            }
        }
    }

    debug!(workers = requested, "all workers launched");
    Ok(reap(ledger))
}

/// Join every handle in the ledger, recording the ones that panicked.
fn reap(ledger: Vec<(usize, ScopedJoinHandle<'_, ()>)>) -> ExecutionReport {
    let mut report = ExecutionReport::new(ledger.len());
    for (worker, handle) in ledger {
        if let Err(payload) = handle.join() {
            report.reap_failures.push(ReapFailure {
                worker,
                reason: panic_message(&*payload),
            });
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_threads_are_named() {
        let executor = ThreadExecutor::new(ThreadExecutorConfig {
            name_prefix: "named".to_string(),
            stack_size: Some(256 * 1024),
        });
        let names = parking_lot::Mutex::new(Vec::new());
        let tasks: Vec<Task<'_>> = (0..3)
            .map(|_| {
                let names = &names;
                Box::new(move || {
                    let name = thread::current().name().map(str::to_string);
                    names.lock().push(name);
                }) as Task<'_>
            })
            .collect();
        executor.run_all(tasks).unwrap();

        let mut names: Vec<String> = names.into_inner().into_iter().flatten().collect();
        names.sort();
        assert_eq!(names, vec!["named-0", "named-1", "named-2"]);
    }

    #[test]
    fn test_launch_failure_joins_launched_workers() {
        let finished = AtomicUsize::new(0);
        let tasks: Vec<Task<'_>> = (0..5)
            .map(|_| {
                let finished = &finished;
                Box::new(move || {
                    thread::sleep(Duration::from_millis(20));
                    finished.fetch_add(1, Ordering::SeqCst);
                }) as Task<'_>
            })
            .collect();

        let result = thread::scope(|scope| {
            launch_and_reap(tasks, |worker, task| {
                if worker == 3 {
                    Err(io::Error::other("injected launch failure"))
                } else {
                    thread::Builder::new().spawn_scoped(scope, task)
                }
            })
        });

        match result {
            Err(ReduceError::Launch { worker, .. }) => assert_eq!(worker, 3),
            other => panic!("expected launch failure, got {:?}", other),
        }
        // Workers 0..3 were joined before the error came back.
        assert_eq!(finished.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_launch_failure_on_first_worker() {
        let ran = AtomicUsize::new(0);
        let tasks: Vec<Task<'_>> = vec![Box::new(|| {
            ran.fetch_add(1, Ordering::SeqCst);
        })];

        let result = thread::scope(|_scope| {
            launch_and_reap(tasks, |_, _| Err(io::Error::other("no threads left")))
        });

        assert!(matches!(result, Err(ReduceError::Launch { worker: 0, .. })));
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }
}
