use crate::analysis::{AnalysisResults, MeasurementFailure};
use crate::config::AnalysisConfig;
use crate::stats::{calculate_statistics, StatisticsSummary};

/// Everything a consumer prints about a sweep: its parameters, the statistics
/// per algorithm and the measurements that failed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnalysisReport {
    pub config: AnalysisConfig,
    pub statistics: StatisticsSummary,
    pub failures: Vec<MeasurementFailure>,
}

impl AnalysisReport {
    pub fn from_results(results: &AnalysisResults) -> Self {
        Self {
            config: *results.config(),
            statistics: calculate_statistics(results),
            failures: results.failures().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{run_analysis, Algorithm};

    #[test]
    fn report_covers_every_algorithm() {
        let results = run_analysis(&AnalysisConfig::new(15, 10)).unwrap();
        let report = AnalysisReport::from_results(&results);
        assert_eq!(report.config, AnalysisConfig::new(15, 10));
        assert_eq!(
            report.statistics.keys().copied().collect::<Vec<_>>(),
            Algorithm::ALL
        );
        assert!(report.failures.is_empty());
        for stats in report.statistics.values() {
            assert!(stats.time.min <= stats.time.median);
            assert!(stats.time.median <= stats.time.max);
            assert!(stats.time.min >= 0.0);
        }
    }
}
