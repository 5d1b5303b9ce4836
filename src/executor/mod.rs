//! Concurrency backends for the partitioned reduction.
//!
//! An [`Executor`] has a single capability: run a batch of independent tasks
//! and return once every one of them has finished. The reducer builds one task
//! per partition and never cares which backend drives them.

mod inline;
mod rayon_pool;
mod thread;

pub use inline::InlineExecutor;
pub use rayon_pool::RayonExecutor;
pub use thread::{ThreadExecutor, ThreadExecutorConfig};

use crate::error::Result;
use std::any::Any;

/// One unit of work handed to an executor.
pub type Task<'env> = Box<dyn FnOnce() + Send + 'env>;

/// A worker that ran but whose outcome could not be collected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReapFailure {
    pub worker: usize,
    pub reason: String,
}

/// What happened to a batch of tasks once the executor returned.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Number of tasks that were started
    pub launched: usize,
    /// Workers that could not be reaped, in worker order
    pub reap_failures: Vec<ReapFailure>,
}

impl ExecutionReport {
    pub fn new(launched: usize) -> Self {
        Self {
            launched,
            reap_failures: Vec::new(),
        }
    }

    /// True when every launched worker was reaped.
    pub fn is_clean(&self) -> bool {
        self.reap_failures.is_empty()
    }

    /// Indices of the workers that could not be reaped.
    pub fn failed_workers(&self) -> Vec<usize> {
        self.reap_failures.iter().map(|f| f.worker).collect()
    }
}

/// Runs N independent tasks and waits for all of them.
///
/// Implementations must not return before every launched task has finished,
/// including on the error path: if task `j` cannot be launched, tasks `0..j`
/// are joined first and only then is the launch error returned.
pub trait Executor: Send + Sync {
    /// Short backend name (e.g., "threads")
    fn name(&self) -> &'static str;

    /// Run every task to completion.
    ///
    /// Worker `i` is the task at index `i`. Launch and allocation failures are
    /// returned as errors; panicked workers are reported in the
    /// [`ExecutionReport`] instead.
    fn run_all<'env>(&self, tasks: Vec<Task<'env>>) -> Result<ExecutionReport>;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn run_all<'env>(&self, tasks: Vec<Task<'env>>) -> Result<ExecutionReport> {
        (**self).run_all(tasks)
    }
}

impl<E: Executor + ?Sized> Executor for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn run_all<'env>(&self, tasks: Vec<Task<'env>>) -> Result<ExecutionReport> {
        (**self).run_all(tasks)
    }
}

/// Available concurrency backends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Backend {
    /// Fresh scoped OS threads per call, one per partition
    #[default]
    Threads,
    /// A rayon pool sized to the worker count
    Rayon,
    /// Every task in turn on the calling thread
    Inline,
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Threads => "threads",
            Backend::Rayon => "rayon",
            Backend::Inline => "inline",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Build the executor for `backend`, sized for `num_workers` where that matters.
pub fn build_executor(backend: Backend, num_workers: usize) -> Result<Box<dyn Executor>> {
    Ok(match backend {
        Backend::Threads => Box::new(ThreadExecutor::default()),
        Backend::Rayon => Box::new(RayonExecutor::new(num_workers)?),
        Backend::Inline => Box::new(InlineExecutor),
    })
}

/// Render a panic payload for reporting.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
