//! # Dot Product Reduction
//!
//! The dot product sums the products of corresponding elements:
//!
//! `dot(a, b) = Σ(a[i] * b[i])`
//!
//! ## Strategies
//!
//! - **Sequential**: one index-ordered pass, the correctness and timing baseline
//! - **Partitioned parallel**: `[0, N)` is split once into `k` contiguous
//!   ranges, the last one taking the `N mod k` remainder. Each worker reduces
//!   its range with the sequential kernel and adds its partial sum to a
//!   call-scoped, lock-guarded accumulator. Workers run on an injected
//!   [`Executor`](crate::executor::Executor).
//!
//! Partial sums are combined in completion order, so the parallel result may
//! differ from the sequential one by rounding. With one worker the two are
//! bit-identical.

pub mod bench;
pub mod code;
pub mod test;

pub use code::*;
