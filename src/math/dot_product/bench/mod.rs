//! Comparison harness: time strategies and check them against the reference.

use super::code::{reduce_sequential, VectorStore};
use crate::config::Tolerance;
use crate::error::{ReduceError, Result};
use crate::registry::Reducer;
use crate::utils::bench::speedup;
use crate::utils::timer::{measure_variants, TimingConfig, Variant, VariantResult};

/// Fixed example shown next to the random run: `[1,2,3] · [4,5,6] = 32`.
pub const EXAMPLE_A: [f64; 3] = [1.0, 2.0, 3.0];
pub const EXAMPLE_B: [f64; 3] = [4.0, 5.0, 6.0];

/// Sequential result of the fixed example.
pub fn illustrative_example() -> Result<f64> {
    reduce_sequential(&EXAMPLE_A, &EXAMPLE_B, EXAMPLE_A.len())
}

/// Agreement between a strategy's result and the reference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Comparison {
    pub expected: f64,
    pub actual: f64,
    pub difference: f64,
    /// Largest difference the tolerance accepted for these values
    pub bound: f64,
    pub agrees: bool,
}

/// Compare `actual` with `expected` under `tolerance`.
pub fn compare(expected: f64, actual: f64, tolerance: &Tolerance) -> Comparison {
    Comparison {
        expected,
        actual,
        difference: (expected - actual).abs(),
        bound: tolerance.bound(expected, actual),
        agrees: tolerance.accepts(expected, actual),
    }
}

/// Timing and correctness of one strategy.
#[derive(Clone, Debug)]
pub struct StrategyReport {
    pub timing: VariantResult,
    pub value: f64,
    pub comparison: Comparison,
    /// Reference time over this strategy's time
    pub speedup: Option<f64>,
}

/// Time every strategy on `store` and compare each with the first one.
///
/// The first strategy is the reference (normally `sequential`); its own
/// report compares it with itself.
pub fn run_comparison(
    reducers: &[&dyn Reducer],
    store: &VectorStore,
    timing: &TimingConfig,
    tolerance: &Tolerance,
) -> Result<Vec<StrategyReport>> {
    if reducers.is_empty() {
        return Ok(Vec::new());
    }

    let (a, b, n) = (store.a(), store.b(), store.len());
    let mut errors: Vec<Option<ReduceError>> = (0..reducers.len()).map(|_| None).collect();

    let variants: Vec<Variant> = reducers
        .iter()
        .zip(errors.iter_mut())
        .map(|(reducer, error)| {
            let reducer = *reducer;
            Variant {
                name: reducer.name(),
                description: reducer.description(),
                run: Box::new(move || {
                    let (elapsed, result) = crate::measure!(reducer.reduce(a, b, n));
                    match result {
                        Ok(value) => (elapsed, Some(value)),
                        Err(e) => {
                            if error.is_none() {
                                *error = Some(e);
                            }
                            (elapsed, None)
                        }
                    }
                }),
            }
        })
        .collect();

    let timings = measure_variants(variants, timing);
    if let Some(e) = errors.into_iter().flatten().next() {
        return Err(e);
    }

    let reference_value = timings[0].result_sample.unwrap_or(f64::NAN);
    let reference_time = timings[0].avg_time;

    Ok(timings
        .into_iter()
        .map(|timing| {
            let value = timing.result_sample.unwrap_or(f64::NAN);
            StrategyReport {
                comparison: compare(reference_value, value, tolerance),
                speedup: speedup(reference_time, timing.avg_time),
                value,
                timing,
            }
        })
        .collect())
}
