//! Raw timing export.

use super::bench::to_nanos;
use super::timer::VariantResult;
use std::io::Write;
use std::path::Path;

/// One raw sample of one strategy (used for CSV export)
pub struct RawTimingData {
    pub strategy: String,
    pub input_size: usize,
    pub num_workers: usize,
    pub sample: usize,
    pub nanos: u64,
    pub result_sample: Option<f64>,
}

/// Flatten timing results into one row per sample.
pub fn raw_rows(results: &[VariantResult], input_size: usize, num_workers: usize) -> Vec<RawTimingData> {
    results
        .iter()
        .flat_map(|r| {
            r.samples.iter().enumerate().map(move |(sample, m)| RawTimingData {
                strategy: r.name.clone(),
                input_size,
                num_workers,
                sample,
                nanos: to_nanos(*m),
                result_sample: r.result_sample,
            })
        })
        .collect()
}

/// Export timing data to a CSV file
pub fn export_csv(path: &Path, data: &[RawTimingData]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_csv(&mut file, data)
}

/// Write timing data as CSV to any writer
pub fn write_csv<W: Write>(out: &mut W, data: &[RawTimingData]) -> std::io::Result<()> {
    writeln!(out, "strategy,compiler,input_size,workers,sample,time_ns,result")?;

    for entry in data {
        let compiler = if entry.strategy.starts_with("c-") {
            crate::math::dot_product::C_COMPILER_NAME.unwrap_or("Unknown")
        } else {
            ""
        };

        writeln!(
            out,
            "{},{},{},{},{},{},{}",
            entry.strategy,
            compiler,
            entry.input_size,
            entry.num_workers,
            entry.sample,
            entry.nanos,
            entry.result_sample.map(|v| v.to_string()).unwrap_or_default()
        )?;
    }

    Ok(())
}
