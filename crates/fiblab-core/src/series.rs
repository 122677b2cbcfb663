//! Chart-ready series derived from a sweep.
//!
//! A chart plots `n` on the x-axis with one line per algorithm. Each row holds
//! the value of every algorithm at one `n`, with `None` where the algorithm
//! has no record (the recursive algorithm past its cutoff, or a failed
//! measurement).

use crate::analysis::AnalysisResults;
use crate::measure::MeasurementRecord;
use crate::Algorithm;

/// Which measurement a series plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Metric {
    /// Duration in milliseconds.
    #[default]
    Time,
    /// Net live-heap delta in bytes.
    Memory,
}

impl Metric {
    pub fn value(self, record: &MeasurementRecord) -> f64 {
        match self {
            Metric::Time => record.time_ms(),
            Metric::Memory => record.memory_used as f64,
        }
    }
}

/// Values of every algorithm at one index.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SeriesRow {
    pub n: u64,
    pub recursive: Option<f64>,
    pub dp: Option<f64>,
    pub iterative: Option<f64>,
    pub matrix: Option<f64>,
}

impl SeriesRow {
    fn empty(n: u64) -> Self {
        Self {
            n,
            ..Self::default()
        }
    }

    /// Value of `algorithm` in this row.
    pub fn get(&self, algorithm: Algorithm) -> Option<f64> {
        match algorithm {
            Algorithm::Recursive => self.recursive,
            Algorithm::Dp => self.dp,
            Algorithm::Iterative => self.iterative,
            Algorithm::Matrix => self.matrix,
        }
    }

    fn slot(&mut self, algorithm: Algorithm) -> &mut Option<f64> {
        match algorithm {
            Algorithm::Recursive => &mut self.recursive,
            Algorithm::Dp => &mut self.dp,
            Algorithm::Iterative => &mut self.iterative,
            Algorithm::Matrix => &mut self.matrix,
        }
    }
}

/// Time and memory series of a sweep, one row per `n` in `0..=max_n`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChartSeries {
    pub time: Vec<SeriesRow>,
    pub memory: Vec<SeriesRow>,
}

impl ChartSeries {
    /// Builds both series from a sweep.
    pub fn from_results(results: &AnalysisResults) -> Self {
        Self {
            time: build_rows(results, Metric::Time),
            memory: build_rows(results, Metric::Memory),
        }
    }

    /// The rows of `metric`.
    pub fn rows(&self, metric: Metric) -> &[SeriesRow] {
        match metric {
            Metric::Time => &self.time,
            Metric::Memory => &self.memory,
        }
    }
}

fn build_rows(results: &AnalysisResults, metric: Metric) -> Vec<SeriesRow> {
    let mut rows: Vec<SeriesRow> = (0..=results.config().max_n).map(SeriesRow::empty).collect();
    for (algorithm, records) in results.iter() {
        for record in records {
            if let Some(row) = usize::try_from(record.n).ok().and_then(|i| rows.get_mut(i)) {
                *row.slot(algorithm) = Some(metric.value(record));
            }
        }
    }
    rows
}
