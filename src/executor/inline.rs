//! Runs every task on the calling thread, in worker order.

use super::{panic_message, ExecutionReport, Executor, ReapFailure, Task};
use crate::error::Result;
use std::panic::{self, AssertUnwindSafe};

/// Executor without any concurrency; contributions arrive in worker order.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn name(&self) -> &'static str {
        "inline"
    }

    fn run_all<'env>(&self, tasks: Vec<Task<'env>>) -> Result<ExecutionReport> {
        let mut report = ExecutionReport::new(tasks.len());
        for (worker, task) in tasks.into_iter().enumerate() {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
                report.reap_failures.push(ReapFailure {
                    worker,
                    reason: panic_message(&*payload),
                });
            }
        }
        Ok(report)
    }
}
