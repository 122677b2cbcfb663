//! Algorithm module containing the four Fibonacci strategies.
//!
//! Every entry point takes a signed index so that a negative `n` can be
//! rejected with [`FibError::InvalidArgument`], and returns a checked `u64`.
//!
//! # Strategies
//!
//! - **Recursive (`recursive`)**: the definition as written, $O(2^n)$.
//! - **Dynamic Programming (`dp`)**: bottom-up table, $O(n)$ time and space.
//! - **Iterative (`iterative`)**: the table reduced to two values, $O(1)$ space.
//! - **Matrix Exponentiation (`matrix`)**: repeated squaring, $O(\log n)$.

use crate::FibError;

pub mod dp;
pub mod iterative;
pub mod matrix;
pub mod recursive;

pub use dp::fibonacci_dp;
pub use iterative::fibonacci_iterative;
pub use matrix::{fibonacci_matrix, matrix_power, multiply_matrix, Matrix2};
pub use recursive::fibonacci_recursive;

/// Validates a Fibonacci index.
///
/// # Errors
/// * `FibError::InvalidArgument` if `n` is negative.
#[inline]
pub fn check_index(n: i64) -> Result<u64, FibError> {
    u64::try_from(n).map_err(|_| FibError::InvalidArgument { n })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Algorithm;

    #[test]
    fn check_index_accepts_zero_and_positive() {
        assert_eq!(check_index(0), Ok(0));
        assert_eq!(check_index(93), Ok(93));
        assert_eq!(check_index(i64::MAX), Ok(i64::MAX as u64));
    }

    #[test]
    fn check_index_rejects_negative() {
        assert_eq!(check_index(-1), Err(FibError::InvalidArgument { n: -1 }));
        assert_eq!(
            check_index(i64::MIN),
            Err(FibError::InvalidArgument { n: i64::MIN })
        );
    }

    #[test]
    fn fixed_points_all_algorithms() {
        let expected = [(0, 0u64), (1, 1), (2, 1), (10, 55), (20, 6765)];
        for algo in Algorithm::ALL {
            for (n, value) in expected {
                assert_eq!(
                    algo.compute(n),
                    Ok(value),
                    "{} disagrees at F({})",
                    algo,
                    n
                );
            }
        }
    }

    #[test]
    fn negative_input_is_invalid_for_every_algorithm() {
        for algo in Algorithm::ALL {
            for n in [-1, -2, -45, i64::MIN] {
                assert_eq!(
                    algo.compute(n),
                    Err(FibError::InvalidArgument { n }),
                    "{} accepted n={}",
                    algo,
                    n
                );
            }
        }
    }

    #[test]
    fn algorithms_agree_below_forty() {
        for n in 0..40 {
            let reference = fibonacci_iterative(n).unwrap();
            for algo in Algorithm::ALL {
                assert_eq!(algo.compute(n), Ok(reference), "{} differs at n={}", algo, n);
            }
        }
    }

    #[test]
    fn non_recursive_algorithms_agree_to_u64_limit() {
        for n in 0..=93 {
            let it = fibonacci_iterative(n).unwrap();
            assert_eq!(fibonacci_dp(n), Ok(it), "dp differs at n={}", n);
            assert_eq!(fibonacci_matrix(n), Ok(it), "matrix differs at n={}", n);
        }
    }

    #[test]
    fn overflow_boundary_is_shared() {
        for n in [94, 100, 1_000, 1 << 40, i64::MAX] {
            assert_eq!(fibonacci_dp(n), Err(FibError::Overflow { n }));
            assert_eq!(fibonacci_iterative(n), Err(FibError::Overflow { n }));
            assert_eq!(fibonacci_matrix(n), Err(FibError::Overflow { n }));
        }
    }
}
