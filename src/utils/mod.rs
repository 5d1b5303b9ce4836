//! Utility modules for timing and reporting.

pub mod bench;
pub mod runner;
pub mod timer;
pub mod tui;

// Re-export commonly used items
pub use bench::{elapsed, now, shuffle, speedup, time_seed, Measurement};
pub use runner::{export_csv, raw_rows, write_csv, RawTimingData};
pub use timer::{measure_variants, TimingConfig, Variant, VariantResult};
