//! Analysis runner: sweeps every algorithm over `0..=max_n`.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::time::Instant;

use crate::config::AnalysisConfig;
use crate::measure::{measure, MeasurementRecord};
use crate::progress::{calc_total_work, step_work, ProgressReporter, ProgressTracker};
use crate::{Algorithm, FibError};

/// A single (algorithm, n) measurement that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MeasurementFailure {
    pub algorithm: Algorithm,
    pub n: u64,
    pub error: FibError,
}

impl Display for MeasurementFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at n={}: {}", self.algorithm, self.n, self.error)
    }
}

/// Records of one sweep, per algorithm, ordered by `n`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResults {
    config: AnalysisConfig,
    records: BTreeMap<Algorithm, Vec<MeasurementRecord>>,
    failures: Vec<MeasurementFailure>,
}

impl AnalysisResults {
    fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            records: Algorithm::ALL.iter().map(|&a| (a, Vec::new())).collect(),
            failures: Vec::new(),
        }
    }

    /// The configuration the sweep ran with.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Successful records of `algorithm`, ordered by `n`.
    pub fn records(&self, algorithm: Algorithm) -> &[MeasurementRecord] {
        self.records
            .get(&algorithm)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterates over `(algorithm, records)` in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (Algorithm, &[MeasurementRecord])> {
        self.records.iter().map(|(a, r)| (*a, r.as_slice()))
    }

    /// Measurements that failed, in sweep order.
    pub fn failures(&self) -> &[MeasurementFailure] {
        &self.failures
    }

    /// Total number of successful records.
    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runs a full sweep.
///
/// For each `n` in `0..=config.max_n`, measures Recursive when
/// `n <= config.recursive_cutoff`, then Dp, Iterative and Matrix. A failing
/// measurement is logged and recorded in [`AnalysisResults::failures`]; the
/// sweep carries on with the next pair.
///
/// # Errors
/// * `FibError::InvalidConfig` if the configuration does not validate.
///
/// # Example
/// ```
/// use fiblab_core::{run_analysis, Algorithm, AnalysisConfig};
///
/// let results = run_analysis(&AnalysisConfig::new(40, 35)).unwrap();
/// assert_eq!(results.records(Algorithm::Recursive).len(), 36);
/// assert_eq!(results.records(Algorithm::Matrix).len(), 41);
/// ```
pub fn run_analysis(config: &AnalysisConfig) -> Result<AnalysisResults, FibError> {
    run_analysis_with_progress(config, None)
}

/// Runs a full sweep, reporting fractional progress to `reporter`.
///
/// Progress is weighted by expected work (see [`crate::progress`]).
pub fn run_analysis_with_progress(
    config: &AnalysisConfig,
    reporter: Option<ProgressReporter>,
) -> Result<AnalysisResults, FibError> {
    config.validate()?;
    tracing::info!(
        max_n = config.max_n,
        recursive_cutoff = config.recursive_cutoff,
        "starting analysis sweep"
    );

    let started = Instant::now();
    let mut tracker = ProgressTracker::new(reporter, calc_total_work(config));
    let mut results = AnalysisResults::new(*config);

    for n in 0..=config.max_n {
        for algorithm in Algorithm::ALL {
            if algorithm == Algorithm::Recursive && n > config.recursive_cutoff {
                continue;
            }
            // validate() bounds max_n far below i64::MAX.
            match measure(algorithm, n as i64) {
                Ok(record) => results.records.entry(algorithm).or_default().push(record),
                Err(error) => {
                    tracing::warn!(algorithm = algorithm.as_str(), n, %error, "measurement failed");
                    results.failures.push(MeasurementFailure {
                        algorithm,
                        n,
                        error,
                    });
                }
            }
            tracker.advance(step_work(algorithm, n));
        }
    }
    tracker.finish();

    tracing::info!(
        records = results.len(),
        failures = results.failures.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "analysis sweep finished"
    );
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn cutoff_equal_to_max_gives_equal_counts() {
        let results = run_analysis(&AnalysisConfig::new(35, 35)).unwrap();
        for algo in Algorithm::ALL {
            assert_eq!(results.records(algo).len(), 36, "{}", algo);
        }
        assert!(results.failures().is_empty());
    }

    #[test]
    fn recursive_stops_at_cutoff() {
        let results = run_analysis(&AnalysisConfig::new(40, 35)).unwrap();
        assert_eq!(results.records(Algorithm::Recursive).len(), 36);
        assert_eq!(results.records(Algorithm::Dp).len(), 41);
        assert_eq!(results.records(Algorithm::Iterative).len(), 41);
        assert_eq!(results.records(Algorithm::Matrix).len(), 41);
        assert_eq!(results.len(), 36 + 3 * 41);
    }

    #[test]
    fn records_are_ordered_and_agree() {
        let results = run_analysis(&AnalysisConfig::new(30, 20)).unwrap();
        for (algo, records) in results.iter() {
            for (i, record) in records.iter().enumerate() {
                assert_eq!(record.n, i as u64, "{} out of order", algo);
                let reference = results.records(Algorithm::Iterative)[i].result;
                assert_eq!(record.result, reference, "{} disagrees at n={}", algo, i);
            }
        }
    }

    #[test]
    fn failures_do_not_abort_the_sweep() {
        let results = run_analysis(&AnalysisConfig::new(100, 10)).unwrap();
        // 0..=93 succeed; 94..=100 overflow for each non-recursive algorithm.
        assert_eq!(results.records(Algorithm::Dp).len(), 94);
        assert_eq!(results.records(Algorithm::Matrix).len(), 94);
        assert_eq!(results.failures().len(), 3 * 7);

        let first = &results.failures()[0];
        assert_eq!(first.n, 94);
        assert_eq!(first.algorithm, Algorithm::Dp);
        assert_eq!(first.error, FibError::Overflow { n: 94 });
        assert!(first.to_string().contains("n=94"));
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(matches!(
            run_analysis(&AnalysisConfig::new(10, 60)),
            Err(FibError::InvalidConfig(_))
        ));
    }

    #[test]
    fn progress_reaches_completion() {
        let last = Arc::new(Mutex::new(0.0));
        let sink = last.clone();
        let reporter: ProgressReporter = Box::new(move |p| *sink.lock().unwrap() = p);
        run_analysis_with_progress(&AnalysisConfig::new(20, 20), Some(reporter)).unwrap();
        assert_eq!(*last.lock().unwrap(), 1.0);
    }
}
