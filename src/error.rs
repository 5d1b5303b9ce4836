//! Error types for the reduction engine.

use thiserror::Error;

/// Errors produced while planning or running a reduction.
#[derive(Debug, Error)]
pub enum ReduceError {
    #[error("vector length must be positive")]
    EmptyInput,

    #[error("worker count must be positive")]
    InvalidWorkerCount,

    #[error("vector {vector} has {actual} elements, reduction needs {required}")]
    Bounds {
        vector: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("vectors differ in length: a has {a} elements, b has {b}")]
    LengthMismatch { a: usize, b: usize },

    #[error("could not allocate storage for {requested} items: {reason}")]
    Allocation { requested: usize, reason: String },

    #[error("could not launch worker {worker}")]
    Launch {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("{} worker(s) could not be reaped {failed:?} (partial sum {partial})", failed.len())]
    Reap { failed: Vec<usize>, partial: f64 },
}

impl ReduceError {
    /// Whether the error was raised before any worker started.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ReduceError::EmptyInput
                | ReduceError::InvalidWorkerCount
                | ReduceError::Bounds { .. }
                | ReduceError::LengthMismatch { .. }
        )
    }
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, ReduceError>;

/// Check the shared preconditions of both reducers.
pub(crate) fn check_inputs(a: &[f64], b: &[f64], n: usize) -> Result<()> {
    if n == 0 {
        return Err(ReduceError::EmptyInput);
    }
    if a.len() < n {
        return Err(ReduceError::Bounds {
            vector: "a",
            required: n,
            actual: a.len(),
        });
    }
    if b.len() < n {
        return Err(ReduceError::Bounds {
            vector: "b",
            required: n,
            actual: b.len(),
        });
    }
    Ok(())
}
