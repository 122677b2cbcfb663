use super::check_index;
use crate::FibError;

/// Computes the nth Fibonacci number keeping only the last two values.
///
/// The space-optimized form of [`fibonacci_dp`](super::fibonacci_dp):
/// $O(n)$ time, $O(1)$ space. Overflow is detected at F(94), so even a huge
/// index returns quickly.
///
/// # Errors
/// * `FibError::InvalidArgument` if `n` is negative.
/// * `FibError::Overflow` if F(n) does not fit in a `u64`.
///
/// # Example
/// ```
/// use fiblab_core::fibonacci_iterative;
/// assert_eq!(fibonacci_iterative(50), Ok(12_586_269_025));
/// ```
#[inline]
pub fn fibonacci_iterative(n: i64) -> Result<u64, FibError> {
    let index = check_index(n)?;
    if index <= 1 {
        return Ok(index);
    }

    let mut prev2: u64 = 0;
    let mut prev1: u64 = 1;
    for _ in 2..=index {
        let current = prev1.checked_add(prev2).ok_or(FibError::Overflow { n })?;
        prev2 = prev1;
        prev1 = current;
    }
    Ok(prev1)
}
