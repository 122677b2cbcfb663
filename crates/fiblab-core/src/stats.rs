//! Statistics summarizer.
//!
//! Reduces the records of a sweep to mean, median, sample standard
//! deviation, min and max, separately for time (milliseconds) and memory
//! (bytes).

use std::collections::BTreeMap;

use crate::analysis::AnalysisResults;
use crate::measure::MeasurementRecord;
use crate::Algorithm;

/// Descriptive statistics of one sample set.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Summary {
    pub mean: f64,
    /// Element at index `len / 2` of the sorted samples (no averaging).
    pub median: f64,
    /// Sample standard deviation (n - 1 divisor); NaN below two samples.
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Summarizes `samples`; `None` when empty.
    ///
    /// The input is not reordered: the median is taken from a sorted copy.
    ///
    /// # Example
    /// ```
    /// use fiblab_core::Summary;
    ///
    /// let s = Summary::from_samples(&[3.0, 1.0, 5.0, 2.0, 4.0]).unwrap();
    /// assert_eq!((s.mean, s.median, s.min, s.max), (3.0, 3.0, 1.0, 5.0));
    /// ```
    pub fn from_samples(samples: &[f64]) -> Option<Summary> {
        if samples.is_empty() {
            return None;
        }

        let count = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / count;

        let std = if samples.len() < 2 {
            f64::NAN
        } else {
            let squared: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
            (squared / (count - 1.0)).sqrt()
        };

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let median = sorted[sorted.len() / 2];

        Some(Summary {
            mean,
            median,
            std,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Time and memory statistics of one algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AlgorithmStatistics {
    /// Over `time_ms()` of each record.
    pub time: Summary,
    /// Over `memory_used` of each record.
    pub memory: Summary,
}

impl AlgorithmStatistics {
    /// Summarizes `records`; `None` when empty.
    pub fn from_records(records: &[MeasurementRecord]) -> Option<AlgorithmStatistics> {
        let times: Vec<f64> = records.iter().map(MeasurementRecord::time_ms).collect();
        let memory: Vec<f64> = records.iter().map(|r| r.memory_used as f64).collect();
        Some(AlgorithmStatistics {
            time: Summary::from_samples(&times)?,
            memory: Summary::from_samples(&memory)?,
        })
    }
}

/// Statistics per algorithm, in reporting order.
pub type StatisticsSummary = BTreeMap<Algorithm, AlgorithmStatistics>;

/// Summarizes every algorithm of a sweep. Algorithms without records are
/// left out.
pub fn calculate_statistics(results: &AnalysisResults) -> StatisticsSummary {
    results
        .iter()
        .filter_map(|(algorithm, records)| {
            AlgorithmStatistics::from_records(records).map(|stats| (algorithm, stats))
        })
        .collect()
}
