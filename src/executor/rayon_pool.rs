//! Rayon-backed executor.
//!
//! Each task is spawned into a [`rayon::Scope`] as-is. Rayon may steal tasks
//! between its threads, but it never splits one: the static partition plan
//! still decides who reduces which indices.

use super::{panic_message, ExecutionReport, Executor, ReapFailure, Task};
use crate::error::{ReduceError, Result};
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};

/// Runs tasks on a dedicated rayon pool.
pub struct RayonExecutor {
    pool: rayon::ThreadPool,
    num_threads: usize,
}

impl RayonExecutor {
    /// Build a pool with `num_threads` workers.
    pub fn new(num_threads: usize) -> Result<Self> {
        if num_threads == 0 {
            return Err(ReduceError::InvalidWorkerCount);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|idx| format!("dot-rayon-{idx}"))
            .build()
            .map_err(|e| ReduceError::Allocation {
                requested: num_threads,
                reason: e.to_string(),
            })?;
        Ok(Self { pool, num_threads })
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }
}

impl Executor for RayonExecutor {
    fn name(&self) -> &'static str {
        "rayon"
    }

    fn run_all<'env>(&self, tasks: Vec<Task<'env>>) -> Result<ExecutionReport> {
        let launched = tasks.len();
        let failures = Mutex::new(Vec::new());

        self.pool.scope(|s| {
            for (worker, task) in tasks.into_iter().enumerate() {
                let failures = &failures;
                s.spawn(move |_| {
                    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
                        failures.lock().push(ReapFailure {
                            worker,
                            reason: panic_message(&*payload),
                        });
                    }
                });
            }
        });

        let mut reap_failures = failures.into_inner();
        reap_failures.sort_by_key(|f| f.worker);
        Ok(ExecutionReport {
            launched,
            reap_failures,
        })
    }
}

impl std::fmt::Debug for RayonExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RayonExecutor")
            .field("num_threads", &self.num_threads)
            .finish()
    }
}
