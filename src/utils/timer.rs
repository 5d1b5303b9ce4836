//! Timing of strategies for the comparison report.
//!
//! - Wall-clock measurements on the orchestrating thread
//! - Optional warmup before sampling
//! - Randomized interleaving of samples to avoid ordering bias
//! - All raw samples kept for CSV export
//!
//! The orchestrating thread is not pinned to a core: threads inherit their
//! creator's affinity mask, and every worker would land on that core.

use std::hint::black_box;
use std::time::Duration;

use super::bench::{shuffle, time_seed, to_nanos, Measurement};

/// Configuration for timing measurements
#[derive(Clone, Debug)]
pub struct TimingConfig {
    /// Number of timed samples per strategy (default: 1, a single wall-clock shot)
    pub runs_per_variant: usize,
    /// Untimed runs per strategy before sampling (default: 0)
    pub warmup_iterations: usize,
    /// Seed for the sample interleaving (default: time-based)
    pub schedule_seed: Option<u64>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            runs_per_variant: 1,
            warmup_iterations: 0,
            schedule_seed: None,
        }
    }
}

/// A strategy to be measured
pub struct Variant<'a> {
    /// Unique name of the strategy
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Runs the strategy once and returns (measurement, result value).
    /// Timing happens inside the closure so only the reduction is measured.
    pub run: Box<dyn FnMut() -> (Measurement, Option<f64>) + 'a>,
}

/// Result from measuring a single strategy
#[derive(Clone, Debug)]
pub struct VariantResult {
    /// Name of the strategy
    pub name: String,
    /// Description of the strategy
    pub description: String,
    /// Average measurement
    pub avg_time: Duration,
    /// Precise average in nanoseconds as f64
    pub avg_nanos_f64: f64,
    /// Median measurement
    pub median_time: Duration,
    /// Minimum measurement
    pub min_time: Duration,
    /// Maximum measurement
    pub max_time: Duration,
    /// Standard deviation
    pub std_dev: Duration,
    /// Raw samples in the order they were taken
    pub samples: Vec<Duration>,
    /// Result of the last timed run
    pub result_sample: Option<f64>,
}

impl VariantResult {
    /// Coefficient of variation of the samples (0 when there is one sample).
    pub fn cv(&self) -> f64 {
        if self.avg_nanos_f64 > 0.0 {
            self.std_dev.as_nanos() as f64 / self.avg_nanos_f64
        } else {
            0.0
        }
    }
}

/// Measure strategies with randomized sample order.
///
/// 1. Warms up every strategy
/// 2. Builds a shuffled schedule of (strategy, sample) pairs
/// 3. Runs the schedule, collecting one measurement per entry
/// 4. Returns statistics per strategy, in input order
pub fn measure_variants(mut variants: Vec<Variant>, config: &TimingConfig) -> Vec<VariantResult> {
    if variants.is_empty() {
        return Vec::new();
    }

    let samples = config.runs_per_variant.max(1);

    for variant in &mut variants {
        for _ in 0..config.warmup_iterations {
            black_box((variant.run)());
        }
    }

    let mut tasks: Vec<(usize, usize)> = (0..variants.len())
        .flat_map(|v| (0..samples).map(move |s| (v, s)))
        .collect();
    shuffle(&mut tasks, config.schedule_seed.unwrap_or_else(time_seed));

    let mut measurements: Vec<Vec<Measurement>> = (0..variants.len())
        .map(|_| Vec::with_capacity(samples))
        .collect();
    let mut result_samples: Vec<Option<f64>> = vec![None; variants.len()];

    for (variant_idx, _) in tasks {
        let (elapsed_time, result) = (variants[variant_idx].run)();
        measurements[variant_idx].push(elapsed_time);
        result_samples[variant_idx] = result;
    }

    variants
        .into_iter()
        .enumerate()
        .map(|(idx, variant)| {
            let times = std::mem::take(&mut measurements[idx]);
            compute_variant_result(variant.name, variant.description, times, result_samples[idx])
        })
        .collect()
}

/// Compute statistics from raw measurements
fn compute_variant_result(
    name: &'static str,
    description: &'static str,
    measurements: Vec<Measurement>,
    result_sample: Option<f64>,
) -> VariantResult {
    if measurements.is_empty() {
        return VariantResult {
            name: name.to_string(),
            description: description.to_string(),
            avg_time: Duration::ZERO,
            avg_nanos_f64: 0.0,
            median_time: Duration::ZERO,
            min_time: Duration::ZERO,
            max_time: Duration::ZERO,
            std_dev: Duration::ZERO,
            samples: Vec::new(),
            result_sample: None,
        };
    }

    let nanos: Vec<u64> = measurements.iter().map(|m| to_nanos(*m)).collect();
    let mut sorted = nanos.clone();
    sorted.sort_unstable();

    let sum: u64 = nanos.iter().sum();
    let avg_nanos_f64 = sum as f64 / nanos.len() as f64;

    let variance: f64 = nanos
        .iter()
        .map(|&n| {
            let diff = n as f64 - avg_nanos_f64;
            diff * diff
        })
        .sum::<f64>()
        / (nanos.len() - 1).max(1) as f64;

    VariantResult {
        name: name.to_string(),
        description: description.to_string(),
        avg_time: Duration::from_nanos(avg_nanos_f64 as u64),
        avg_nanos_f64,
        median_time: Duration::from_nanos(sorted[sorted.len() / 2]),
        min_time: Duration::from_nanos(sorted[0]),
        max_time: Duration::from_nanos(sorted[sorted.len() - 1]),
        std_dev: Duration::from_nanos(variance.sqrt() as u64),
        samples: measurements,
        result_sample,
    }
}
