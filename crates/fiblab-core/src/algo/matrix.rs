use super::check_index;
use crate::FibError;

/// A 2x2 matrix of `u64`, row-major.
pub type Matrix2 = [[u64; 2]; 2];

/// The identity matrix.
pub const IDENTITY: Matrix2 = [[1, 0], [0, 1]];

/// The Fibonacci transition matrix.
///
/// $\begin{pmatrix} 1 & 1 \\ 1 & 0 \end{pmatrix}^k = \begin{pmatrix} F(k+1) & F(k) \\ F(k) & F(k-1) \end{pmatrix}$
pub const BASE: Matrix2 = [[1, 1], [1, 0]];

/// Multiplies two 2x2 matrices.
///
/// Returns `None` if any entry overflows `u64`.
pub fn multiply_matrix(a: &Matrix2, b: &Matrix2) -> Option<Matrix2> {
    let dot = |x0: u64, y0: u64, x1: u64, y1: u64| {
        x0.checked_mul(y0)?.checked_add(x1.checked_mul(y1)?)
    };
    Some([
        [
            dot(a[0][0], b[0][0], a[0][1], b[1][0])?,
            dot(a[0][0], b[0][1], a[0][1], b[1][1])?,
        ],
        [
            dot(a[1][0], b[0][0], a[1][1], b[1][0])?,
            dot(a[1][0], b[0][1], a[1][1], b[1][1])?,
        ],
    ])
}

/// Raises `matrix` to `exp` by repeated squaring.
///
/// Halves the exponent at each level, squares the half power, and multiplies
/// by `matrix` once more when the exponent is odd. Recursion depth is
/// $O(\log \text{exp})$. Returns `None` on overflow.
///
/// # Example
/// ```
/// use fiblab_core::algo::matrix::{matrix_power, BASE, IDENTITY};
/// assert_eq!(matrix_power(&BASE, 0), Some(IDENTITY));
/// assert_eq!(matrix_power(&BASE, 1), Some(BASE));
/// assert_eq!(matrix_power(&BASE, 10), Some([[89, 55], [55, 34]]));
/// ```
pub fn matrix_power(matrix: &Matrix2, exp: u64) -> Option<Matrix2> {
    if exp == 0 {
        return Some(IDENTITY);
    }
    if exp == 1 {
        return Some(*matrix);
    }

    let half = matrix_power(matrix, exp / 2)?;
    let squared = multiply_matrix(&half, &half)?;
    if exp % 2 == 0 {
        Some(squared)
    } else {
        multiply_matrix(&squared, matrix)
    }
}

/// Computes the nth Fibonacci number as the top-left entry of
/// `BASE^(n-1)`.
///
/// $O(\log n)$ matrix multiplications. Every intermediate entry is at most
/// F(n), so overflow is reported exactly when F(n) itself does not fit.
///
/// # Errors
/// * `FibError::InvalidArgument` if `n` is negative.
/// * `FibError::Overflow` if F(n) does not fit in a `u64`.
///
/// # Example
/// ```
/// use fiblab_core::fibonacci_matrix;
/// assert_eq!(fibonacci_matrix(93), Ok(12_200_160_415_121_876_738));
/// ```
pub fn fibonacci_matrix(n: i64) -> Result<u64, FibError> {
    let index = check_index(n)?;
    if index <= 1 {
        return Ok(index);
    }
    let power = matrix_power(&BASE, index - 1).ok_or(FibError::Overflow { n })?;
    Ok(power[0][0])
}
