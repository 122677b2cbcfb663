//! Progress tracking for analysis sweeps.
//!
//! A sweep's cost is dominated by the recursive algorithm, whose work at index
//! $n$ grows like $\varphi^n$. Counting steps linearly would make a progress bar
//! race to 90% and then stall, so each step is weighted by its expected work:
//!
//! - **Recursive step at $n$**: $\varphi^n$ units.
//! - **Any other step**: 1 unit.
//!
//! **Total Work** is the sum of those weights over the whole sweep.

use crate::config::AnalysisConfig;
use crate::Algorithm;

/// Function type for reporting progress updates (0.0 to 1.0).
pub type ProgressReporter = Box<dyn Fn(f64) + Send + Sync>;

/// The golden ratio $\varphi$.
pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Minimum progress increase between two reports.
const REPORT_THRESHOLD: f64 = 0.01;

/// Estimated work units of measuring `algorithm` at index `n`.
#[inline]
pub fn step_work(algorithm: Algorithm, n: u64) -> f64 {
    match algorithm {
        Algorithm::Recursive => GOLDEN_RATIO.powi(n.min(i32::MAX as u64) as i32),
        _ => 1.0,
    }
}

/// Estimated total work units of a sweep.
pub fn calc_total_work(config: &AnalysisConfig) -> f64 {
    (0..=config.max_n)
        .map(|n| {
            let others = (Algorithm::ALL.len() - 1) as f64;
            if n <= config.recursive_cutoff {
                others + step_work(Algorithm::Recursive, n)
            } else {
                others
            }
        })
        .sum()
}

/// Accumulates step work and forwards throttled updates to a reporter.
///
/// The first step and [`ProgressTracker::finish`] always report; in between,
/// a report is sent only when progress has moved by at least 1%.
pub struct ProgressTracker {
    reporter: Option<ProgressReporter>,
    total_work: f64,
    work_done: f64,
    last_reported: Option<f64>,
}

impl ProgressTracker {
    pub fn new(reporter: Option<ProgressReporter>, total_work: f64) -> Self {
        Self {
            reporter,
            total_work,
            work_done: 0.0,
            last_reported: None,
        }
    }

    /// Records a finished step of `work` units.
    pub fn advance(&mut self, work: f64) {
        self.work_done += work;
        let Some(reporter) = &self.reporter else {
            return;
        };
        if self.total_work <= 0.0 {
            return;
        }

        let progress = (self.work_done / self.total_work).clamp(0.0, 1.0);
        let significant = match self.last_reported {
            None => true,
            Some(last) => progress - last >= REPORT_THRESHOLD,
        };
        if significant {
            reporter(progress);
            self.last_reported = Some(progress);
        }
    }

    /// Reports completion unless it has already been reported.
    pub fn finish(&mut self) {
        if let Some(reporter) = &self.reporter {
            if self.last_reported != Some(1.0) {
                reporter(1.0);
                self.last_reported = Some(1.0);
            }
        }
    }
}
