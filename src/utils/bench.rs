//! Shared benchmark utilities.
//!
//! Measurements are wall-clock durations: speedup of a multi-threaded
//! strategy only means something in elapsed time on the orchestrating thread.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::{Duration, Instant};

/// Measurement value type
pub type Measurement = Duration;

/// Read the current instant
#[inline(always)]
pub fn now() -> Instant {
    Instant::now()
}

/// Measurement elapsed since `start`
#[inline(always)]
pub fn elapsed(start: Instant) -> Measurement {
    start.elapsed()
}

/// Convert measurement to nanoseconds
pub fn to_nanos(m: Measurement) -> u64 {
    m.as_nanos() as u64
}

/// Time one expression, returning `(elapsed, value)`.
///
/// The value goes through `black_box` so the work cannot be optimised away.
#[macro_export]
macro_rules! measure {
    ($e:expr) => {{
        let start = $crate::utils::bench::now();
        let value = std::hint::black_box($e);
        ($crate::utils::bench::elapsed(start), value)
    }};
}

/// Shuffle `slice` reproducibly from `seed`
pub fn shuffle<T>(slice: &mut [T], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    slice.shuffle(&mut rng);
}

/// Get a seed from current time for randomization
pub fn time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x12345678)
}

/// Wall-clock speedup of `candidate` over `baseline`; `None` if `candidate` took no time.
pub fn speedup(baseline: Measurement, candidate: Measurement) -> Option<f64> {
    let candidate = candidate.as_secs_f64();
    (candidate > 0.0).then(|| baseline.as_secs_f64() / candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut values: Vec<usize> = (0..50).collect();
        shuffle(&mut values, 7);
        let mut sorted = values.clone();
        sorted.sort();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_is_reproducible() {
        let mut first: Vec<usize> = (0..20).collect();
        let mut second = first.clone();
        shuffle(&mut first, 99);
        shuffle(&mut second, 99);
        assert_eq!(first, second);
    }

    #[test]
    fn test_speedup() {
        let s = speedup(Duration::from_millis(40), Duration::from_millis(10)).unwrap();
        assert!((s - 4.0).abs() < 1e-12);
        assert!(speedup(Duration::from_millis(1), Duration::ZERO).is_none());
    }

    #[test]
    fn test_measure_macro() {
        let (elapsed, value) = crate::measure!(6 * 7);
        assert_eq!(value, 42);
        assert!(elapsed < Duration::from_secs(5));
    }
}
