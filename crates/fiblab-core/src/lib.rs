//! # FibLab Core
//!
//! Four textbook Fibonacci algorithms and the harness that compares them.
//!
//! ## Algorithms
//!
//! - **Recursive**: $O(2^n)$. The recurrence as written; usable only for small $n$.
//! - **Dynamic Programming**: $O(n)$ time and space. Bottom-up table.
//! - **Iterative**: $O(n)$ time, $O(1)$ space. The table reduced to two values.
//! - **Matrix Exponentiation**: $O(\log n)$. Repeated squaring of
//!   $\begin{pmatrix} 1 & 1 \\ 1 & 0 \end{pmatrix}$.
//!
//! All four take a signed index, reject negative input with
//! [`FibError::InvalidArgument`], and compute in checked `u64` arithmetic
//! (F(93) is the largest representable value).
//!
//! ## Pipeline
//!
//! [`measure`] times one call and reads the heap counters of
//! [`TrackingAllocator`]; [`run_analysis`] sweeps every algorithm over
//! `0..=max_n`; [`calculate_statistics`] reduces the sweep to mean, median,
//! standard deviation, min and max; [`ChartSeries`] reshapes it for plotting.
//!
//! ### Basic Example
//!
//! ```rust
//! use fiblab_core::{fibonacci_matrix, fibonacci_recursive};
//!
//! assert_eq!(fibonacci_matrix(20), Ok(6765));
//! assert_eq!(fibonacci_recursive(20), Ok(6765));
//! ```
//!
//! ### Running a Sweep
//!
//! ```rust
//! use fiblab_core::{calculate_statistics, run_analysis, AnalysisConfig};
//!
//! let results = run_analysis(&AnalysisConfig::new(30, 25)).unwrap();
//! for (algorithm, stats) in calculate_statistics(&results) {
//!     println!("{}: mean {:.4} ms", algorithm, stats.time.mean);
//! }
//! ```

pub mod algo;
pub mod allocator;
pub mod analysis;
pub mod config;
pub mod iterators;
pub mod measure;
pub mod progress;
pub mod report;
pub mod series;
pub mod stats;
pub mod types;

// Re-export types
pub use types::{Algorithm, FibError};

// Re-export algorithms
pub use algo::{
    fibonacci_dp, fibonacci_iterative, fibonacci_matrix, fibonacci_recursive, matrix_power,
    multiply_matrix, Matrix2,
};

pub use allocator::TrackingAllocator;
pub use analysis::{run_analysis, run_analysis_with_progress, AnalysisResults, MeasurementFailure};
pub use config::AnalysisConfig;
pub use iterators::{FibIter, FibRange};
pub use measure::{measure, measure_with, MeasurementRecord};
pub use progress::ProgressReporter;
pub use report::AnalysisReport;
pub use series::{ChartSeries, Metric, SeriesRow};
pub use stats::{calculate_statistics, AlgorithmStatistics, StatisticsSummary, Summary};

/// Measures every algorithm once at `n`.
///
/// Used for side-by-side comparisons of a single index. Each entry holds the
/// algorithm and either its record or its error, in [`Algorithm::ALL`] order.
///
/// # Example
///
/// ```rust
/// use fiblab_core::measure_all;
///
/// for (algorithm, outcome) in measure_all(30) {
///     let record = outcome.unwrap();
///     println!("{}: {:?}", algorithm, record.time);
/// }
/// ```
pub fn measure_all(n: i64) -> Vec<(Algorithm, Result<MeasurementRecord, FibError>)> {
    Algorithm::ALL
        .into_iter()
        .map(|algorithm| (algorithm, measure(algorithm, n)))
        .collect()
}
