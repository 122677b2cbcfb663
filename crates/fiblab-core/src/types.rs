use std::fmt::{self, Display};
use std::str::FromStr;

/// Error type for Fibonacci calculations and sweeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FibError {
    /// The index is negative.
    InvalidArgument { n: i64 },
    /// The computation would exhaust stack, heap or time budget.
    ResourceExhausted {
        algorithm: Algorithm,
        n: i64,
        reason: &'static str,
    },
    /// F(n) does not fit in a `u64`.
    Overflow { n: i64 },
    /// The sweep configuration is out of range.
    InvalidConfig(String),
}

impl Display for FibError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FibError::InvalidArgument { n } => {
                write!(f, "invalid argument: index n={} must be non-negative", n)
            }
            FibError::ResourceExhausted {
                algorithm,
                n,
                reason,
            } => write!(
                f,
                "resource exhausted: {} cannot compute F({}): {}",
                algorithm, n, reason
            ),
            FibError::Overflow { n } => {
                write!(f, "overflow: F({}) does not fit in 64 bits", n)
            }
            FibError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for FibError {}

#[cfg(feature = "serde")]
impl serde::Serialize for FibError {
    /// Serialized as the display string.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

// ============================================================================
// Algorithm Selection
// ============================================================================

/// Fibonacci algorithm selection.
///
/// Shared between the analysis runner, the CLI and the server so that every
/// surface uses the same names (`recursive`, `dp`, `iterative`, `matrix`).
/// The declaration order is the order algorithms are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Algorithm {
    /// Naive recursion: $O(2^n)$ time, $O(n)$ stack.
    Recursive,
    /// Bottom-up table: $O(n)$ time, $O(n)$ space.
    Dp,
    /// Two rolling values: $O(n)$ time, $O(1)$ space.
    #[default]
    Iterative,
    /// Repeated squaring of the 2x2 transition matrix: $O(\log n)$ time.
    Matrix,
}

impl Algorithm {
    /// All algorithms, in reporting order.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Recursive,
        Algorithm::Dp,
        Algorithm::Iterative,
        Algorithm::Matrix,
    ];

    /// Stable lowercase identifier used in maps, query strings and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Recursive => "recursive",
            Algorithm::Dp => "dp",
            Algorithm::Iterative => "iterative",
            Algorithm::Matrix => "matrix",
        }
    }

    /// Asymptotic time complexity, for display.
    pub fn complexity(self) -> &'static str {
        match self {
            Algorithm::Recursive => "O(2^n)",
            Algorithm::Dp | Algorithm::Iterative => "O(n)",
            Algorithm::Matrix => "O(log n)",
        }
    }

    /// Computes F(n) with this algorithm.
    pub fn compute(self, n: i64) -> Result<u64, FibError> {
        match self {
            Algorithm::Recursive => crate::algo::fibonacci_recursive(n),
            Algorithm::Dp => crate::algo::fibonacci_dp(n),
            Algorithm::Iterative => crate::algo::fibonacci_iterative(n),
            Algorithm::Matrix => crate::algo::fibonacci_matrix(n),
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Recursive => write!(f, "Recursive"),
            Algorithm::Dp => write!(f, "Dynamic Programming"),
            Algorithm::Iterative => write!(f, "Iterative"),
            Algorithm::Matrix => write!(f, "Matrix Exponentiation"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|algo| algo.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown algorithm '{}'", s))
    }
}
