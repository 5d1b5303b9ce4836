//! Runtime configuration for reductions and their comparison.

use crate::executor::Backend;

/// Fallback worker count when the online CPU count cannot be read.
pub const FALLBACK_WORKERS: usize = 4;

/// Number of online processors, or [`FALLBACK_WORKERS`] if the OS does not say.
pub fn online_cpus() -> usize {
    #[cfg(unix)]
    {
        let n = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
        if n > 0 {
            return n as usize;
        }
    }
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(FALLBACK_WORKERS)
}

/// What to do when a worker finished but could not be reaped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReapPolicy {
    /// Fail the call; the partial sum is only available inside the error.
    #[default]
    Fatal,
    /// Log a warning and return whatever was accumulated.
    BestEffort,
}

/// Acceptance bound for comparing two reductions of the same input.
///
/// Two results agree when their difference is within `absolute` OR within
/// `relative` times the larger magnitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    pub absolute: f64,
    pub relative: f64,
}

impl Tolerance {
    /// Absolute bound used by the classic report.
    pub const DEFAULT_ABSOLUTE: f64 = 1e-6;

    /// Absolute bound only.
    pub fn absolute(absolute: f64) -> Self {
        Self {
            absolute,
            relative: 0.0,
        }
    }

    /// Default absolute bound plus a relative bound growing with the vector length.
    pub fn scaled(n: usize) -> Self {
        Self {
            absolute: Self::DEFAULT_ABSOLUTE,
            relative: (n.max(1) as f64) * f64::EPSILON,
        }
    }

    /// Largest difference accepted between `expected` and `actual`.
    pub fn bound(&self, expected: f64, actual: f64) -> f64 {
        let magnitude = expected.abs().max(actual.abs());
        self.absolute.max(self.relative * magnitude)
    }

    pub fn accepts(&self, expected: f64, actual: f64) -> bool {
        (expected - actual).abs() <= self.bound(expected, actual)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::absolute(Self::DEFAULT_ABSOLUTE)
    }
}

/// Configuration of a parallel reduction.
#[derive(Clone, Debug)]
pub struct ReduceConfig {
    /// Number of partitions, one worker each (default: online CPUs)
    pub num_workers: usize,
    /// Concurrency backend the workers run on (default: scoped threads)
    pub backend: Backend,
    /// Reap failure handling (default: Fatal)
    pub reap_policy: ReapPolicy,
    /// Agreement bound against the sequential result
    pub tolerance: Tolerance,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Self {
            num_workers: online_cpus(),
            backend: Backend::default(),
            reap_policy: ReapPolicy::default(),
            tolerance: Tolerance::default(),
        }
    }
}
