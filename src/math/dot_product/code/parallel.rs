//! Partitioned multi-worker reduction.
//!
//! The index space is planned once into contiguous partitions. Each worker
//! reduces its partition with the sequential kernel and adds the result to a
//! call-scoped [`Accumulator`] exactly once. The order of those additions is
//! whatever order the workers finish in, so results may differ from the
//! sequential sum by rounding.

use super::accumulator::Accumulator;
use super::partition::{plan, Partition, PartitionPlan};
use super::sequential::dot_kernel;
use crate::config::ReapPolicy;
use crate::error::{check_inputs, ReduceError, Result};
use crate::executor::{Executor, ReapFailure, Task, ThreadExecutor};
use std::collections::TryReserveError;
use tracing::{debug, trace, warn};

/// One worker's assignment: a partition plus read-only views of both inputs.
#[derive(Clone, Copy, Debug)]
pub struct WorkerTask<'a> {
    partition: Partition,
    a: &'a [f64],
    b: &'a [f64],
}

impl<'a> WorkerTask<'a> {
    /// Bind `partition` to the inputs. Both slices must cover `partition.end`.
    pub fn new(partition: Partition, a: &'a [f64], b: &'a [f64]) -> Self {
        Self { partition, a, b }
    }

    pub fn partition(&self) -> Partition {
        self.partition
    }

    /// Partial sum over the assigned range; zero for an empty partition.
    pub fn partial_sum(&self) -> f64 {
        let range = self.partition.range();
        dot_kernel(&self.a[range.clone()], &self.b[range])
    }
}

/// Everything one parallel reduction produced.
#[derive(Clone, Debug)]
pub struct ParallelOutcome {
    /// Accumulated result
    pub value: f64,
    /// The partitions the workers reduced
    pub plan: PartitionPlan,
    /// Partial sum of each worker, `None` if the worker never reported
    pub partials: Vec<Option<f64>>,
    /// Number of partial sums that reached the accumulator
    pub contributions: usize,
    /// Workers that could not be reaped (only non-empty under `BestEffort`)
    pub reap_failures: Vec<ReapFailure>,
}

impl ParallelOutcome {
    pub fn is_complete(&self) -> bool {
        self.reap_failures.is_empty() && self.contributions == self.plan.len()
    }
}

/// Parallel reducer running its workers on an injected [`Executor`].
#[derive(Debug)]
pub struct ParallelReducer<E> {
    executor: E,
    reap_policy: ReapPolicy,
}

impl<E: Executor> ParallelReducer<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            reap_policy: ReapPolicy::default(),
        }
    }

    pub fn with_reap_policy(mut self, reap_policy: ReapPolicy) -> Self {
        self.reap_policy = reap_policy;
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn reap_policy(&self) -> ReapPolicy {
        self.reap_policy
    }

    /// Reduce `a[..n] · b[..n]` with `num_workers` workers.
    pub fn reduce(&self, a: &[f64], b: &[f64], n: usize, num_workers: usize) -> Result<f64> {
        self.reduce_detailed(a, b, n, num_workers)
            .map(|outcome| outcome.value)
    }

    /// Like [`reduce`](Self::reduce), but also returns the plan, per-worker
    /// partial sums and any reap failures tolerated by the policy.
    pub fn reduce_detailed(
        &self,
        a: &[f64],
        b: &[f64],
        n: usize,
        num_workers: usize,
    ) -> Result<ParallelOutcome> {
        check_inputs(a, b, n)?;
        let plan = plan(n, num_workers)?;
        debug!(
            n,
            workers = plan.len(),
            largest = plan.max_len(),
            executor = self.executor.name(),
            "planned parallel reduction"
        );

        let workers = plan.len();
        let allocation_failed = |e: TryReserveError| ReduceError::Allocation {
            requested: workers,
            reason: e.to_string(),
        };
        let mut partials: Vec<Option<f64>> = Vec::new();
        partials.try_reserve_exact(workers).map_err(allocation_failed)?;
        partials.resize(workers, None);
        let mut tasks: Vec<Task<'_>> = Vec::new();
        tasks.try_reserve_exact(workers).map_err(allocation_failed)?;

        let accumulator = Accumulator::new();
        let acc = &accumulator;
        for (partition, slot) in plan.iter().zip(partials.iter_mut()) {
            let task = WorkerTask::new(*partition, a, b);
            tasks.push(Box::new(move || {
                let partial = task.partial_sum();
                let partition = task.partition();
                trace!(worker = partition.worker, len = partition.len(), partial, "partition reduced");
                *slot = Some(partial);
                acc.add(partial);
            }));
        }

        let report = self.executor.run_all(tasks)?;
        let total = accumulator.into_accumulated();

        if !report.is_clean() {
            let failed = report.failed_workers();
            match self.reap_policy {
                ReapPolicy::Fatal => {
                    warn!(?failed, partial = total.sum, "reap failure; discarding partial result");
                    return Err(ReduceError::Reap {
                        failed,
                        partial: total.sum,
                    });
                }
                ReapPolicy::BestEffort => {
                    warn!(
                        ?failed,
                        contributions = total.contributions,
                        expected = plan.len(),
                        "reap failure; returning best-effort accumulated value"
                    );
                }
            }
        } else {
            debug_assert_eq!(total.contributions, plan.len());
        }

        debug!(value = total.sum, contributions = total.contributions, "parallel reduction done");
        Ok(ParallelOutcome {
            value: total.sum,
            plan,
            partials,
            contributions: total.contributions,
            reap_failures: report.reap_failures,
        })
    }
}

/// Reduce `a[..n] · b[..n]` across `num_workers` fresh scoped threads.
///
/// Reap failures are fatal. Use [`ParallelReducer`] to pick another executor
/// or policy.
///
/// # Example
/// ```
/// use parallel_dot::reduce_parallel;
///
/// let a = [1.0, 2.0, 3.0];
/// let b = [4.0, 5.0, 6.0];
/// assert_eq!(reduce_parallel(&a, &b, 3, 2).unwrap(), 32.0);
/// ```
pub fn reduce_parallel(a: &[f64], b: &[f64], n: usize, num_workers: usize) -> Result<f64> {
    ParallelReducer::new(ThreadExecutor::default()).reduce(a, b, n, num_workers)
}
