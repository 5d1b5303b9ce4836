//! # Parallel Dot
//!
//! Sequential and partitioned multi-threaded dot product reduction, with a
//! harness that times the two and checks they agree.
//!
//! ```
//! use parallel_dot::{reduce_parallel, reduce_sequential};
//!
//! let a = [1.0, 2.0, 3.0];
//! let b = [4.0, 5.0, 6.0];
//! assert_eq!(reduce_sequential(&a, &b, 3).unwrap(), 32.0);
//! assert_eq!(reduce_parallel(&a, &b, 3, 2).unwrap(), 32.0);
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod math;
pub mod registry;
pub mod utils;

/// Re-export tui from utils
pub use utils::tui;

pub use config::{ReapPolicy, ReduceConfig, Tolerance};
pub use error::{ReduceError, Result};
pub use math::dot_product::{plan, reduce_parallel, reduce_sequential, PartitionPlan, VectorStore};

/// Re-export commonly used items
pub mod prelude {
    pub use crate::config::{ReapPolicy, ReduceConfig, Tolerance};
    pub use crate::error::{ReduceError, Result};
    pub use crate::executor::{Backend, Executor, InlineExecutor, RayonExecutor, ThreadExecutor};
    pub use crate::math::dot_product::{
        plan, reduce_parallel, reduce_sequential, ParallelReducer, VectorStore,
    };
    pub use crate::registry::{build_registry, Reducer, ReducerRegistry};
}
