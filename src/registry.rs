//! Strategy registry for discovering and running reducers by name.
//!
//! Every way of computing the dot product (sequential, parallel on each
//! backend, the C baseline) is a [`Reducer`]. The harness and the CLI only
//! deal with this trait.

use crate::config::{ReduceConfig, Tolerance};
use crate::error::{ReduceError, Result};
use crate::executor::{build_executor, Backend, Executor};
use crate::math::dot_product::{ParallelReducer, SequentialReducer, VectorStore};
use thiserror::Error;

/// Name of the strategy every other one is checked against.
pub const REFERENCE: &str = "sequential";

/// A complete dot product strategy.
pub trait Reducer: Send + Sync {
    /// Name of the strategy (e.g., "parallel-threads")
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Reduce `a[..n] · b[..n]`.
    fn reduce(&self, a: &[f64], b: &[f64], n: usize) -> Result<f64>;
}

/// A [`ParallelReducer`] bound to a fixed worker count.
pub struct ParallelStrategy<E> {
    name: &'static str,
    description: &'static str,
    reducer: ParallelReducer<E>,
    num_workers: usize,
}

impl<E: Executor> ParallelStrategy<E> {
    pub fn new(
        name: &'static str,
        description: &'static str,
        reducer: ParallelReducer<E>,
        num_workers: usize,
    ) -> Self {
        Self {
            name,
            description,
            reducer,
            num_workers,
        }
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }
}

impl<E: Executor> Reducer for ParallelStrategy<E> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn reduce(&self, a: &[f64], b: &[f64], n: usize) -> Result<f64> {
        self.reducer.reduce(a, b, n, self.num_workers)
    }
}

/// Why a strategy disagreed with the reference.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("no 'sequential' strategy registered for reference")]
    MissingReference,

    #[error("strategy '{strategy}' failed: {source}")]
    Reduce {
        strategy: &'static str,
        #[source]
        source: ReduceError,
    },

    #[error("strategy '{strategy}' failed verification: expected {expected}, got {actual}, diff {diff}")]
    Mismatch {
        strategy: &'static str,
        expected: f64,
        actual: f64,
        diff: f64,
    },
}

/// Registry of every strategy available in this build
pub struct ReducerRegistry {
    reducers: Vec<Box<dyn Reducer>>,
}

impl ReducerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            reducers: Vec::new(),
        }
    }

    /// Register a strategy
    pub fn register<R: Reducer + 'static>(&mut self, reducer: R) {
        self.reducers.push(Box::new(reducer));
    }

    /// Get all registered strategies
    pub fn all(&self) -> &[Box<dyn Reducer>] {
        &self.reducers
    }

    /// Find strategy by name
    pub fn find(&self, name: &str) -> Option<&dyn Reducer> {
        self.reducers
            .iter()
            .find(|r| r.name() == name)
            .map(|r| r.as_ref())
    }

    /// List strategy names
    pub fn list_names(&self) -> Vec<&'static str> {
        self.reducers.iter().map(|r| r.name()).collect()
    }

    /// Check every strategy against [`REFERENCE`] on `store`.
    pub fn verify(
        &self,
        store: &VectorStore,
        tolerance: &Tolerance,
    ) -> std::result::Result<(), VerificationError> {
        let (a, b, n) = (store.a(), store.b(), store.len());
        let reference = self.find(REFERENCE).ok_or(VerificationError::MissingReference)?;
        let expected = reference
            .reduce(a, b, n)
            .map_err(|source| VerificationError::Reduce {
                strategy: REFERENCE,
                source,
            })?;

        for reducer in self.all() {
            if reducer.name() == REFERENCE {
                continue;
            }
            let actual = reducer
                .reduce(a, b, n)
                .map_err(|source| VerificationError::Reduce {
                    strategy: reducer.name(),
                    source,
                })?;
            if !tolerance.accepts(expected, actual) {
                return Err(VerificationError::Mismatch {
                    strategy: reducer.name(),
                    expected,
                    actual,
                    diff: (expected - actual).abs(),
                });
            }
        }

        Ok(())
    }
}

impl Default for ReducerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry name of the parallel strategy on `backend`.
pub fn parallel_strategy_name(backend: Backend) -> &'static str {
    match backend {
        Backend::Threads => "parallel-threads",
        Backend::Rayon => "parallel-rayon",
        Backend::Inline => "parallel-inline",
    }
}

fn parallel_strategy_description(backend: Backend) -> &'static str {
    match backend {
        Backend::Threads => "Static partitions, one fresh scoped thread per partition",
        Backend::Rayon => "Static partitions, one rayon task per partition",
        Backend::Inline => "Static partitions reduced one after another on the caller",
    }
}

/// Build the registry with all strategies, parallel ones using `config`.
pub fn build_registry(config: &ReduceConfig) -> Result<ReducerRegistry> {
    if config.num_workers == 0 {
        return Err(ReduceError::InvalidWorkerCount);
    }
    let mut registry = ReducerRegistry::new();

    registry.register(SequentialReducer);
    for backend in [Backend::Threads, Backend::Rayon, Backend::Inline] {
        let executor = build_executor(backend, config.num_workers)?;
        registry.register(ParallelStrategy::new(
            parallel_strategy_name(backend),
            parallel_strategy_description(backend),
            ParallelReducer::new(executor).with_reap_policy(config.reap_policy),
            config.num_workers,
        ));
    }
    crate::math::dot_product::c_impl::register_c_reducers(&mut registry);

    Ok(registry)
}
