//! Static partitioning of an index range across workers.

use crate::error::{ReduceError, Result};
use std::ops::Range;

/// A half-open index range `[start, end)` reduced by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    pub worker: usize,
    pub start: usize,
    pub end: usize,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Ordered partitions of `[0, n)`, one per worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionPlan {
    n: usize,
    partitions: Vec<Partition>,
}

impl PartitionPlan {
    /// Length of the index space the plan covers.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of partitions (= number of workers).
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Partition> {
        self.partitions.iter()
    }

    /// Largest partition; with the remainder policy this is always the last one.
    pub fn max_len(&self) -> usize {
        self.partitions.iter().map(Partition::len).max().unwrap_or(0)
    }

    /// Check that the partitions are contiguous, disjoint and cover `[0, n)` exactly.
    pub fn is_exact_cover(&self) -> bool {
        let mut next = 0;
        for (i, p) in self.partitions.iter().enumerate() {
            if p.worker != i || p.start != next || p.end < p.start {
                return false;
            }
            next = p.end;
        }
        next == self.n
    }
}

impl<'a> IntoIterator for &'a PartitionPlan {
    type Item = &'a Partition;
    type IntoIter = std::slice::Iter<'a, Partition>;

    fn into_iter(self) -> Self::IntoIter {
        self.partitions.iter()
    }
}

/// Split `[0, n)` into `num_workers` contiguous partitions.
///
/// Every worker gets `n / num_workers` indices and the last one also takes
/// the `n % num_workers` remainder. When `num_workers > n` the leading
/// partitions are empty.
///
/// # Example
/// ```
/// use parallel_dot::math::dot_product::plan;
///
/// let plan = plan(7, 3).unwrap();
/// let ranges: Vec<_> = plan.iter().map(|p| p.range()).collect();
/// assert_eq!(ranges, vec![0..2, 2..4, 4..7]);
/// ```
pub fn plan(n: usize, num_workers: usize) -> Result<PartitionPlan> {
    if num_workers == 0 {
        return Err(ReduceError::InvalidWorkerCount);
    }
    if n == 0 {
        return Err(ReduceError::EmptyInput);
    }

    let base = n / num_workers;
    let remainder = n % num_workers;

    let mut partitions = Vec::new();
    partitions
        .try_reserve_exact(num_workers)
        .map_err(|e| ReduceError::Allocation {
            requested: num_workers,
            reason: e.to_string(),
        })?;

    for worker in 0..num_workers {
        let start = worker * base;
        let mut end = (worker + 1) * base;
        if worker == num_workers - 1 {
            end += remainder;
        }
        partitions.push(Partition { worker, start, end });
    }

    Ok(PartitionPlan { n, partitions })
}
