use super::check_index;
use crate::config::limits;
use crate::{Algorithm, FibError};

/// Computes the nth Fibonacci number by filling a table of `n + 1` entries
/// bottom-up.
///
/// $O(n)$ time and $O(n)$ space. The table is reserved up front with
/// `try_reserve_exact`, so a table that cannot be allocated is reported
/// instead of aborting the process. Indices past
/// [`limits::MAX_U64_INDEX`] fail with `Overflow` before any allocation.
///
/// # Errors
/// * `FibError::InvalidArgument` if `n` is negative.
/// * `FibError::ResourceExhausted` if the table cannot be allocated.
/// * `FibError::Overflow` if F(n) does not fit in a `u64`.
///
/// # Example
/// ```
/// use fiblab_core::fibonacci_dp;
/// assert_eq!(fibonacci_dp(20), Ok(6765));
/// ```
pub fn fibonacci_dp(n: i64) -> Result<u64, FibError> {
    let index = check_index(n)?;
    if index <= 1 {
        return Ok(index);
    }
    if index > limits::MAX_U64_INDEX {
        return Err(FibError::Overflow { n });
    }

    let exhausted = |reason| FibError::ResourceExhausted {
        algorithm: Algorithm::Dp,
        n,
        reason,
    };

    let len = usize::try_from(index)
        .ok()
        .and_then(|i| i.checked_add(1))
        .ok_or_else(|| exhausted("table size exceeds the address space"))?;

    let mut table: Vec<u64> = Vec::new();
    table
        .try_reserve_exact(len)
        .map_err(|_| exhausted("table allocation failed"))?;
    table.push(0);
    table.push(1);

    for i in 2..len {
        let next = table[i - 1]
            .checked_add(table[i - 2])
            .ok_or(FibError::Overflow { n })?;
        table.push(next);
    }

    Ok(table[len - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_cases() {
        assert_eq!(fibonacci_dp(0), Ok(0));
        assert_eq!(fibonacci_dp(1), Ok(1));
        assert_eq!(fibonacci_dp(2), Ok(1));
    }

    #[test]
    fn largest_representable() {
        assert_eq!(fibonacci_dp(93), Ok(12_200_160_415_121_876_738));
        assert_eq!(fibonacci_dp(94), Err(FibError::Overflow { n: 94 }));
    }

    #[test]
    fn huge_index_overflows_without_allocating() {
        for n in [1 << 40, i64::MAX] {
            assert_eq!(fibonacci_dp(n), Err(FibError::Overflow { n }));
        }
    }
}
