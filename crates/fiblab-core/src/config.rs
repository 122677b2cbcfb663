//! Configuration constants and sweep parameters.
//!
//! This module centralizes every limit and default so the CLI, the server and
//! the analysis runner agree on them.

use crate::FibError;

/// Default sweep parameters.
pub mod defaults {
    /// Largest index measured by a sweep when none is given.
    pub const MAX_N: u64 = 45;

    /// Largest index at which the naive recursive algorithm is still measured.
    ///
    /// Beyond this point each step costs roughly $\varphi$ times the previous
    /// one, which makes a full sweep take minutes rather than seconds.
    pub const RECURSIVE_CUTOFF: u64 = 35;
}

/// Hard limits.
pub mod limits {
    /// F(93) is the largest Fibonacci number that fits in a `u64`.
    pub const MAX_U64_INDEX: u64 = 93;

    /// The recursive algorithm refuses indices above this.
    ///
    /// F(50) already takes on the order of $4 \times 10^{10}$ calls.
    pub const MAX_RECURSIVE_N: u64 = 50;

    /// Largest `max_n` a sweep accepts.
    ///
    /// Everything past [`MAX_U64_INDEX`] only records overflow failures, so
    /// there is no point in going much further.
    pub const MAX_SWEEP_N: u64 = 1_000;
}

/// Parameters of an analysis sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisConfig {
    /// Sweep covers `0..=max_n`.
    pub max_n: u64,
    /// Recursive is measured only for `n <= recursive_cutoff`.
    pub recursive_cutoff: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_n: defaults::MAX_N,
            recursive_cutoff: defaults::RECURSIVE_CUTOFF,
        }
    }
}

impl AnalysisConfig {
    pub fn new(max_n: u64, recursive_cutoff: u64) -> Self {
        Self {
            max_n,
            recursive_cutoff,
        }
    }

    /// Checks the configuration against [`limits`].
    ///
    /// # Errors
    /// * `FibError::InvalidConfig` if `max_n` exceeds `limits::MAX_SWEEP_N` or
    ///   `recursive_cutoff` exceeds `limits::MAX_RECURSIVE_N`.
    pub fn validate(&self) -> Result<(), FibError> {
        if self.max_n > limits::MAX_SWEEP_N {
            return Err(FibError::InvalidConfig(format!(
                "max_n={} exceeds the sweep limit {}",
                self.max_n,
                limits::MAX_SWEEP_N
            )));
        }
        if self.recursive_cutoff > limits::MAX_RECURSIVE_N {
            return Err(FibError::InvalidConfig(format!(
                "recursive cutoff {} exceeds the recursion limit {}",
                self.recursive_cutoff,
                limits::MAX_RECURSIVE_N
            )));
        }
        Ok(())
    }

    /// Number of indices the recursive algorithm is measured at.
    pub fn recursive_samples(&self) -> u64 {
        self.max_n.min(self.recursive_cutoff) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AnalysisConfig::default();
        assert_eq!(config.max_n, 45);
        assert_eq!(config.recursive_cutoff, 35);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn limits_are_ordered() {
        assert!(defaults::RECURSIVE_CUTOFF <= limits::MAX_RECURSIVE_N);
        assert!(limits::MAX_RECURSIVE_N < limits::MAX_U64_INDEX);
        assert!(limits::MAX_U64_INDEX < limits::MAX_SWEEP_N);
    }

    #[test]
    fn validate_rejects_out_of_range() {
        assert!(matches!(
            AnalysisConfig::new(limits::MAX_SWEEP_N + 1, 10).validate(),
            Err(FibError::InvalidConfig(_))
        ));
        assert!(matches!(
            AnalysisConfig::new(40, limits::MAX_RECURSIVE_N + 1).validate(),
            Err(FibError::InvalidConfig(_))
        ));
    }

    #[test]
    fn recursive_samples_respects_both_bounds() {
        assert_eq!(AnalysisConfig::new(40, 35).recursive_samples(), 36);
        assert_eq!(AnalysisConfig::new(20, 35).recursive_samples(), 21);
        assert_eq!(AnalysisConfig::new(0, 0).recursive_samples(), 1);
    }
}
