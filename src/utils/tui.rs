//! Text User Interface (TUI) utilities.
//!
//! Handles formatted output for the CLI.

use crate::config::Tolerance;
use crate::executor::Backend;
use crate::math::dot_product::bench::{Comparison, StrategyReport, EXAMPLE_A, EXAMPLE_B};
use crate::math::dot_product::{VectorStore, C_COMPILER_NAME};
use crate::registry::{ReducerRegistry, REFERENCE};
use terminal_size::{terminal_size, Width};

/// Get the current terminal width, constrained to a reasonable range
fn get_term_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        (w as usize).clamp(40, 200)
    } else {
        80
    }
}

/// Truncate string with ellipsis if it exceeds width (character-wise)
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut result: String = s.chars().take(width.saturating_sub(3)).collect();
        result.push_str("...");
        result
    }
}

fn is_c_strategy(name: &str) -> bool {
    name.starts_with("c-")
}

/// Sorting priority of a strategy. Lower values sort first.
/// Order: reference (0), parallel backends (1), C (2)
fn strategy_sort_key(report: &StrategyReport) -> (u8, String) {
    let name = report.timing.name.to_lowercase();
    if name == REFERENCE {
        (0, String::new())
    } else if is_c_strategy(&name) {
        (2, name)
    } else {
        (1, name)
    }
}

/// Sort reports: reference first, then the parallel backends, then C
pub fn sort_reports(reports: &mut [StrategyReport]) {
    reports.sort_by_key(strategy_sort_key);
}

fn display_name(name: &str) -> String {
    match C_COMPILER_NAME {
        Some(c) if is_c_strategy(name) => format!("{} ({})", name, c),
        _ => name.to_string(),
    }
}

/// Print the application header
pub fn print_header(size: usize, num_workers: usize, backend: Backend) {
    let term_width = get_term_width().min(80); // Cap header at 80
    let title = " Parallel Dot Product ";
    let padding = term_width.saturating_sub(title.len() + 2) / 2;
    let right_padding = term_width.saturating_sub(padding + title.len());

    let border = "═".repeat(term_width);

    println!("╔{}╗", border);
    println!(
        "║{}{}{}║",
        " ".repeat(padding),
        title,
        " ".repeat(right_padding)
    );
    println!("╚{}╝", border);
    println!();
    println!("  Vector size: {}", size);
    println!("  Workers:     {} ({})", num_workers, backend);
    println!();
}

/// Print both vectors when they are short enough
pub fn print_vectors(store: &VectorStore) {
    if let Some(preview) = store.preview() {
        print!("{}", preview);
        println!();
    }
}

/// Print results table. Speedup is relative to the first report.
pub fn print_results_table(reports: &[StrategyReport], runs: usize) {
    if reports.is_empty() {
        return;
    }

    let term_width = get_term_width();
    let fixed_width = 70;
    let name_col_width = term_width.saturating_sub(fixed_width).max(18);
    let table_width = name_col_width + 62 + 5;

    println!("  {} run{} per strategy", runs, if runs == 1 { "" } else { "s" });
    println!("  {}", "─".repeat(table_width));
    println!(
        "  {:<n_width$} {:>20} {:>14} {:>9} {:>8} {:>10}",
        "Strategy",
        "Result",
        "Time (s)",
        "Speedup",
        "CV",
        "Difference",
        n_width = name_col_width
    );
    println!("  {}", "─".repeat(table_width));

    for report in reports {
        let speedup = report
            .speedup
            .map(|s| format!("{:.2}x", s))
            .unwrap_or_else(|| "-".to_string());

        println!(
            "  {:<n_width$} {:>20.6} {:>14.6} {:>9} {:>7.2}% {:>10.2e}",
            truncate(&display_name(&report.timing.name), name_col_width),
            report.value,
            report.timing.avg_time.as_secs_f64(),
            speedup,
            report.timing.cv() * 100.0,
            report.comparison.difference,
            n_width = name_col_width
        );
    }
    println!();
}

/// Verdict line for one comparison against the reference.
pub fn verdict_line(comparison: &Comparison) -> String {
    if comparison.agrees {
        "[OK] Results agree".to_string()
    } else {
        format!(
            "[WARNING] Results differ significantly (bound {:.3e})",
            comparison.bound
        )
    }
}

/// Verdict line for the speedup of a parallel strategy.
pub fn speedup_line(name: &str, speedup: Option<f64>) -> String {
    match speedup {
        Some(s) if s > 1.0 => format!("Speedup ({}): {:.2}x, parallel version was faster", name, s),
        Some(s) => format!("Speedup ({}): {:.2}x, parallel version was not faster", name, s),
        None => format!("Speedup ({}): not measurable", name),
    }
}

/// Print the difference and verdicts of every strategy against the reference
pub fn print_comparisons(reports: &[StrategyReport], tolerance: &Tolerance) {
    let Some(reference) = reports.first() else {
        return;
    };

    println!("Sequential result: {:.6}", reference.value);
    println!(
        "Sequential time:   {:.6} s",
        reference.timing.avg_time.as_secs_f64()
    );
    println!(
        "Tolerance:         absolute {:e}, relative {:e}",
        tolerance.absolute, tolerance.relative
    );
    println!();

    for report in &reports[1..] {
        let name = display_name(&report.timing.name);
        println!("{} result: {:.6}", name, report.value);
        println!(
            "{} time:   {:.6} s",
            name,
            report.timing.avg_time.as_secs_f64()
        );
        println!("Difference: {:.10}", report.comparison.difference);
        println!("{}", verdict_line(&report.comparison));
        if !is_c_strategy(&report.timing.name) {
            println!("{}", speedup_line(&report.timing.name, report.speedup));
        }
        println!();
    }
}

/// Print the fixed illustrative example
pub fn print_example(value: f64) {
    let fmt = |v: &[f64; 3]| {
        v.iter()
            .map(|x| format!("{}", x))
            .collect::<Vec<_>>()
            .join(", ")
    };
    println!("Example:");
    println!("  A = [{}]", fmt(&EXAMPLE_A));
    println!("  B = [{}]", fmt(&EXAMPLE_B));
    println!("  A · B = {:.6}", value);
}

/// Print the list of available strategies
pub fn print_available_strategies(registry: &ReducerRegistry) {
    println!("Available strategies:");
    println!();
    for reducer in registry.all() {
        println!(
            "  {:<20} - {}",
            display_name(reducer.name()),
            reducer.description()
        );
    }
}
