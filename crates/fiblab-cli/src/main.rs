//! FibLab CLI - Fibonacci algorithm comparison lab.
//!
//! A command-line interface over the `fiblab-core` library. Computes single
//! values, compares the four algorithms, runs measurement sweeps and prints
//! their statistics or chart series.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use fiblab_core::config::defaults;
use fiblab_core::{
    measure, measure_all, run_analysis_with_progress, Algorithm, AnalysisConfig, AnalysisReport,
    ChartSeries, FibRange, Metric, ProgressReporter, Summary, TrackingAllocator,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Calculation algorithm selection.
#[derive(Clone, Copy, PartialEq, ValueEnum)]
enum AlgorithmArg {
    /// Recursive: $O(2^n)$ naive recursion.
    Recursive,
    /// DP: $O(n)$ bottom-up table.
    Dp,
    /// Iterative: $O(n)$ with two rolling values.
    Iterative,
    /// Matrix: $O(\log n)$ matrix exponentiation.
    Matrix,
    /// All: Runs all algorithms and compares them.
    All,
}

impl AlgorithmArg {
    fn algorithm(self) -> Option<Algorithm> {
        match self {
            AlgorithmArg::Recursive => Some(Algorithm::Recursive),
            AlgorithmArg::Dp => Some(Algorithm::Dp),
            AlgorithmArg::Iterative => Some(Algorithm::Iterative),
            AlgorithmArg::Matrix => Some(Algorithm::Matrix),
            AlgorithmArg::All => None,
        }
    }
}

/// Series selection for `fiblab series`.
#[derive(Clone, Copy, PartialEq, ValueEnum)]
enum MetricArg {
    Time,
    Memory,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Time => Metric::Time,
            MetricArg::Memory => Metric::Memory,
        }
    }
}

/// CLI arguments structure.
#[derive(Parser)]
#[command(
    name = "fiblab",
    version,
    about = "Fibonacci algorithm comparison lab",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Calculate $F(n)$ (Positional argument).
    #[arg(conflicts_with = "n", allow_negative_numbers = true)]
    number: Option<i64>,

    /// Calculate $F(n)$ using `--n`.
    #[arg(long, conflicts_with = "number", allow_negative_numbers = true)]
    n: Option<i64>,

    /// Algorithm to use for single calculation.
    #[arg(short, long, value_enum, default_value_t = AlgorithmArg::All)]
    algorithm: AlgorithmArg,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Sweep parameters shared by `analyze` and `series`.
#[derive(clap::Args)]
struct SweepArgs {
    /// Largest index to measure.
    #[arg(long, env = "FIBLAB_MAX_N", default_value_t = defaults::MAX_N)]
    max_n: u64,

    /// Largest index the recursive algorithm is measured at.
    #[arg(long, env = "FIBLAB_RECURSIVE_CUTOFF", default_value_t = defaults::RECURSIVE_CUTOFF)]
    cutoff: u64,
}

impl SweepArgs {
    fn config(&self) -> AnalysisConfig {
        AnalysisConfig::new(self.max_n, self.cutoff)
    }
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Measure every algorithm over $0..=\text{max\_n}$ and print statistics.
    Analyze {
        #[command(flatten)]
        sweep: SweepArgs,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Measure every algorithm and print chart series keyed by n as JSON.
    Series {
        #[command(flatten)]
        sweep: SweepArgs,

        /// Print only one series.
        #[arg(long, value_enum)]
        metric: Option<MetricArg>,
    },
    /// Print Fibonacci numbers $F(\text{start}) \dots F(\text{end})$.
    Range {
        /// Start index (inclusive).
        start: u64,
        /// End index (exclusive).
        end: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Some(Commands::Analyze { sweep, json }) => run_analyze(sweep.config(), *json),
        Some(Commands::Series { sweep, metric }) => run_series(sweep.config(), *metric),
        Some(Commands::Range { start, end }) => {
            run_range(*start, *end);
            Ok(())
        }
        None => {
            // Handle Single Calculation (Positional OR --n)
            let n = if let Some(n) = cli.n {
                n
            } else if let Some(number) = cli.number {
                number
            } else {
                // No argument provided, show help
                use clap::CommandFactory;
                Cli::command().print_help()?;
                return Ok(());
            };
            run_single_calculation(n, cli.algorithm)
        }
    }
}

/// Logs go to stderr so JSON on stdout stays parseable. `RUST_LOG` wins over
/// `--verbose` when set.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "fiblab=debug,fiblab_core=debug"
    } else {
        "fiblab=warn,fiblab_core=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Computes F(n) with one algorithm, or compares all four.
///
/// In comparison mode a failing algorithm is listed with its error and the
/// others still run; the command only fails when every algorithm failed.
fn run_single_calculation(n: i64, algorithm: AlgorithmArg) -> anyhow::Result<()> {
    println!("--- Execution Configuration ---");
    println!("FibLab v{}", VERSION);
    println!("Calculating F({})", n);

    if let Some(algorithm) = algorithm.algorithm() {
        println!("Mode: {} only.", algorithm);
        let record = measure(algorithm, n).with_context(|| format!("{} failed", algorithm))?;
        println!();
        println!("F({}) = {}", n, record.result);
        println!(
            "{} ({}) took {}",
            algorithm,
            algorithm.complexity(),
            format_duration(record.time)
        );
        return Ok(());
    }

    println!("Mode: Comparison of all algorithms.");
    println!();

    let mut outcomes = measure_all(n);
    outcomes.sort_by_key(|(_, outcome)| match outcome {
        Ok(record) => (0, record.time),
        Err(_) => (1, Duration::ZERO),
    });

    println!("--- Comparison Summary ---");
    println!("{:<32} {:>10}   Status", "Algorithm", "Duration");
    for (algorithm, outcome) in &outcomes {
        let name = format!("{} ({})", algorithm, algorithm.complexity());
        match outcome {
            Ok(record) => println!(
                "{:<32} {:>10}   ✅ Success",
                name,
                format_duration(record.time)
            ),
            Err(e) => println!("{:<32} {:>10}   ❌ {}", name, "-", e),
        }
    }
    println!();

    let values: Vec<u64> = outcomes
        .iter()
        .filter_map(|(_, outcome)| outcome.as_ref().ok().map(|r| r.result))
        .collect();

    let Some(first) = values.first() else {
        // Every algorithm failed; the first error speaks for all of them.
        if let Some((_, Err(e))) = outcomes.first() {
            return Err(e.clone().into());
        }
        return Ok(());
    };

    if values.iter().all(|v| v == first) {
        println!("Global Status: Success. All valid results are consistent.");
    } else {
        println!("Global Status: WARNING. Results differ!");
    }
    println!("F({}) = {}", n, first);
    Ok(())
}

fn progress_bar(config: &AnalysisConfig) -> (ProgressBar, ProgressReporter) {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Sweep {msg}: {percent:>3}% [{bar:40.green/dim}] ETA: {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█░"),
    );
    pb.set_message(format!("n = 0..={}", config.max_n));
    let pb_clone = pb.clone();
    let reporter: ProgressReporter =
        Box::new(move |p| pb_clone.set_position((p * 100.0).round() as u64));
    (pb, reporter)
}

fn sweep(config: AnalysisConfig) -> anyhow::Result<fiblab_core::AnalysisResults> {
    let (pb, reporter) = progress_bar(&config);
    let results = run_analysis_with_progress(&config, Some(reporter));
    pb.finish_and_clear();
    Ok(results?)
}

/// Runs a sweep and prints its statistics.
fn run_analyze(config: AnalysisConfig, json: bool) -> anyhow::Result<()> {
    let results = sweep(config)?;
    let report = AnalysisReport::from_results(&results);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "--- Statistics Summary (n = 0..={}, recursive cutoff {}) ---",
        config.max_n, config.recursive_cutoff
    );
    println!(
        "{:<24} {:<12} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "Algorithm", "Metric", "Mean", "Median", "Std", "Min", "Max"
    );
    for (algorithm, stats) in &report.statistics {
        print_summary_row(&algorithm.to_string(), "time (ms)", &stats.time, 6);
        print_summary_row("", "memory (B)", &stats.memory, 1);
    }

    println!();
    if report.failures.is_empty() {
        println!("All {} measurements succeeded.", results.len());
    } else {
        println!(
            "{} measurements succeeded, {} failed:",
            results.len(),
            report.failures.len()
        );
        for failure in &report.failures {
            println!("  ❌ {}", failure);
        }
    }
    Ok(())
}

fn print_summary_row(name: &str, metric: &str, s: &Summary, precision: usize) {
    println!(
        "{:<24} {:<12} {:>12.p$} {:>12.p$} {:>12.p$} {:>12.p$} {:>12.p$}",
        name,
        metric,
        s.mean,
        s.median,
        s.std,
        s.min,
        s.max,
        p = precision
    );
}

/// Runs a sweep and prints chart series as JSON.
fn run_series(config: AnalysisConfig, metric: Option<MetricArg>) -> anyhow::Result<()> {
    let results = sweep(config)?;
    let series = ChartSeries::from_results(&results);
    let out = match metric {
        Some(metric) => serde_json::to_string_pretty(series.rows(metric.into()))?,
        None => serde_json::to_string_pretty(&series)?,
    };
    println!("{}", out);
    Ok(())
}

/// Prints F(start)..F(end), stopping at the last value that fits in 64 bits.
fn run_range(start: u64, end: u64) {
    println!("Calculating Range F({})..F({})", start, end);
    let values: Vec<u64> = FibRange::new(start, end).collect();
    for (i, value) in values.iter().enumerate() {
        println!("F({}) = {}", start + i as u64, value);
    }
    println!("Generated {} numbers.", values.len());
    let requested = end.saturating_sub(start);
    if (values.len() as u64) < requested {
        println!("Stopped at F(93), the largest value that fits in 64 bits.");
    }
}

/// Formats a duration into a human-readable string (µs, ms or s).
fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();
    if micros < 1_000 {
        format!("{:.2}µs", duration.as_nanos() as f64 / 1_000.0)
    } else if micros < 1_000_000 {
        format!("{:.2}ms", micros as f64 / 1_000.0)
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_duration_units() {
        assert_eq!(format_duration(Duration::from_nanos(1_500)), "1.50µs");
        assert_eq!(format_duration(Duration::from_micros(2_500)), "2.50ms");
        assert_eq!(format_duration(Duration::from_millis(1_250)), "1.25s");
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
