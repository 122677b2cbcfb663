use super::check_index;
use crate::config::limits;
use crate::{Algorithm, FibError};

/// Computes the nth Fibonacci number straight from the recurrence
/// $F(n) = F(n-1) + F(n-2)$.
///
/// The call tree has about $\varphi^n$ leaves, so this is only usable for small
/// indices. Indices above `limits::MAX_RECURSIVE_N` are refused rather than
/// left to run for hours. Stack depth is $O(n)$.
///
/// # Errors
/// * `FibError::InvalidArgument` if `n` is negative.
/// * `FibError::ResourceExhausted` if `n > limits::MAX_RECURSIVE_N`.
///
/// # Example
/// ```
/// use fiblab_core::fibonacci_recursive;
/// assert_eq!(fibonacci_recursive(10), Ok(55));
/// ```
pub fn fibonacci_recursive(n: i64) -> Result<u64, FibError> {
    let index = check_index(n)?;
    if index > limits::MAX_RECURSIVE_N {
        return Err(FibError::ResourceExhausted {
            algorithm: Algorithm::Recursive,
            n,
            reason: "exponential call tree exceeds the recursion limit",
        });
    }
    // F(MAX_RECURSIVE_N) fits in u64, so the additions below cannot overflow.
    Ok(fib(index))
}

fn fib(n: u64) -> u64 {
    if n <= 1 {
        return n;
    }
    fib(n - 1) + fib(n - 2)
}
