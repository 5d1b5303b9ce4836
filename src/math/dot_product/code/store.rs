//! Ownership of the two input vectors.

use crate::error::{ReduceError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Write;
use std::ops::Range;

/// Largest length for which [`VectorStore::preview`] prints the vectors.
pub const PREVIEW_MAX_LEN: usize = 10;

/// Two equal-length, non-empty input vectors.
///
/// Reducers only ever borrow the data; it cannot change while a reduction
/// holds `&[f64]` views into it.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorStore {
    a: Vec<f64>,
    b: Vec<f64>,
}

impl VectorStore {
    /// Range of the uniformly drawn values in [`random`](Self::random).
    pub const VALUE_RANGE: Range<f64> = 0.0..10.0;

    pub fn new(a: Vec<f64>, b: Vec<f64>) -> Result<Self> {
        if a.len() != b.len() {
            return Err(ReduceError::LengthMismatch {
                a: a.len(),
                b: b.len(),
            });
        }
        if a.is_empty() {
            return Err(ReduceError::EmptyInput);
        }
        Ok(Self { a, b })
    }

    /// `n` pairs drawn uniformly from [`VALUE_RANGE`](Self::VALUE_RANGE).
    ///
    /// The same seed always yields the same vectors.
    pub fn random(n: usize, seed: u64) -> Result<Self> {
        if n == 0 {
            return Err(ReduceError::EmptyInput);
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let mut a = Vec::new();
        let mut b = Vec::new();
        for v in [&mut a, &mut b] {
            v.try_reserve_exact(n).map_err(|e| ReduceError::Allocation {
                requested: n,
                reason: e.to_string(),
            })?;
        }
        for _ in 0..n {
            a.push(rng.random_range(Self::VALUE_RANGE));
            b.push(rng.random_range(Self::VALUE_RANGE));
        }
        Ok(Self { a, b })
    }

    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    pub fn a(&self) -> &[f64] {
        &self.a
    }

    pub fn b(&self) -> &[f64] {
        &self.b
    }

    /// Both vectors with two decimals, only for short vectors.
    pub fn preview(&self) -> Option<String> {
        if self.len() > PREVIEW_MAX_LEN {
            return None;
        }
        let mut out = String::new();
        for (label, values) in [("A", &self.a), ("B", &self.b)] {
            let joined: Vec<String> = values.iter().map(|v| format!("{:.2}", v)).collect();
            let _ = writeln!(out, "Vector {}: [{}]", label, joined.join(", "));
        }
        Some(out)
    }
}
