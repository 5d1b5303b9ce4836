//! Dot product reducers.
//!
//! This module contains the reference reducer, the partition planner and the
//! partitioned parallel reducer built on top of them.

mod accumulator;
pub mod c_impl;
mod parallel;
mod partition;
mod sequential;
mod store;

pub use accumulator::{Accumulated, Accumulator};
pub use c_impl::{C_COMPILER_NAME, C_IMPL_AVAILABLE};
pub use parallel::{reduce_parallel, ParallelOutcome, ParallelReducer, WorkerTask};
pub use partition::{plan, Partition, PartitionPlan};
pub use sequential::{reduce_sequential, SequentialReducer};
pub use store::{VectorStore, PREVIEW_MAX_LEN};

#[cfg(c_implementation_active)]
pub use c_impl::{reduce_c_sequential, CSequentialReducer};
