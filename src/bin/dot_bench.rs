//! Compare the sequential and the partitioned parallel dot product.
//!
//! Usage:
//!   dot-bench 1000000          # One million elements, one worker per online CPU
//!   dot-bench 1000000 8        # Eight workers
//!   dot-bench 5000 4 --all     # Every registered strategy
//!   dot-bench --list           # List strategies

use anyhow::{bail, Context, Result};
use clap::Parser;
use parallel_dot::config::{online_cpus, ReapPolicy, ReduceConfig, Tolerance};
use parallel_dot::executor::Backend;
use parallel_dot::math::dot_product::bench::{illustrative_example, run_comparison};
use parallel_dot::math::dot_product::VectorStore;
use parallel_dot::registry::{build_registry, parallel_strategy_name, Reducer, REFERENCE};
use parallel_dot::tui;
use parallel_dot::utils::{export_csv, raw_rows, time_seed, TimingConfig};
use std::path::PathBuf;
use tracing::debug;

/// Sequential vs partitioned multi-threaded dot product
#[derive(Parser, Debug)]
#[command(name = "dot-bench")]
#[command(version)]
struct Args {
    /// Number of elements in each vector
    #[arg(allow_negative_numbers = true, required_unless_present = "list")]
    size: Option<i64>,

    /// Number of workers (default: online CPUs)
    #[arg(allow_negative_numbers = true)]
    workers: Option<i64>,

    /// Backend running the parallel workers
    #[arg(short, long, value_enum, default_value_t = Backend::Threads)]
    backend: Backend,

    /// Timed samples per strategy
    #[arg(short, long, default_value_t = 1)]
    runs: usize,

    /// Untimed runs per strategy before sampling
    #[arg(long, default_value_t = 0)]
    warmup: usize,

    /// Seed for the random vectors (default: time-based)
    #[arg(long)]
    seed: Option<u64>,

    /// Absolute agreement bound
    #[arg(long, default_value_t = Tolerance::DEFAULT_ABSOLUTE)]
    tolerance_abs: f64,

    /// Relative agreement bound (default: SIZE * f64::EPSILON)
    #[arg(long)]
    tolerance_rel: Option<f64>,

    /// What to do with workers that cannot be reaped
    #[arg(long, value_enum, default_value_t = ReapPolicy::Fatal)]
    reap_policy: ReapPolicy,

    /// Time every registered strategy
    #[arg(short, long)]
    all: bool,

    /// List available strategies and exit
    #[arg(short, long)]
    list: bool,

    /// Export raw timings to a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn positive(what: &str, value: i64) -> Result<usize> {
    if value <= 0 {
        bail!("{} must be a positive integer, got {}", what, value);
    }
    usize::try_from(value).with_context(|| format!("{} {} is too large", what, value))
}

fn run(args: Args) -> Result<()> {
    let num_workers = match args.workers {
        Some(w) => positive("worker count", w)?,
        None => online_cpus(),
    };

    if args.list {
        let registry = build_registry(&ReduceConfig {
            num_workers,
            ..Default::default()
        })?;
        tui::print_available_strategies(&registry);
        return Ok(());
    }

    let size = positive("vector size", args.size.unwrap_or(0))?;
    let tolerance = Tolerance {
        absolute: args.tolerance_abs,
        relative: args
            .tolerance_rel
            .unwrap_or_else(|| Tolerance::scaled(size).relative),
    };
    let config = ReduceConfig {
        num_workers,
        backend: args.backend,
        reap_policy: args.reap_policy,
        tolerance,
    };
    let seed = args.seed.unwrap_or_else(time_seed);
    debug!(size, num_workers, seed, backend = %config.backend, "starting comparison");

    let store = VectorStore::random(size, seed)
        .with_context(|| format!("failed to initialise vectors of size {}", size))?;
    let registry = build_registry(&config).context("failed to build strategies")?;

    let reducers: Vec<&dyn Reducer> = if args.all {
        registry.all().iter().map(|r| r.as_ref()).collect()
    } else {
        let parallel = parallel_strategy_name(config.backend);
        [REFERENCE, parallel]
            .iter()
            .map(|name| {
                registry
                    .find(name)
                    .with_context(|| format!("strategy '{}' is not registered", name))
            })
            .collect::<Result<_>>()?
    };

    let timing = TimingConfig {
        runs_per_variant: args.runs,
        warmup_iterations: args.warmup,
        schedule_seed: args.seed,
    };

    tui::print_header(size, num_workers, config.backend);
    tui::print_vectors(&store);

    let mut reports = run_comparison(&reducers, &store, &timing, &config.tolerance)
        .context("reduction failed")?;
    tui::sort_reports(&mut reports);
    tui::print_results_table(&reports, timing.runs_per_variant.max(1));
    tui::print_comparisons(&reports, &config.tolerance);

    if let Some(path) = &args.csv {
        let timings: Vec<_> = reports.iter().map(|r| r.timing.clone()).collect();
        export_csv(path, &raw_rows(&timings, size, num_workers))
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Raw timings written to {}", path.display());
        println!();
    }

    if size != 3 {
        tui::print_example(illustrative_example()?);
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
