use crate::algo::fibonacci_matrix;
use crate::config::limits;

// ============================================================================
// Fibonacci Sequence Iterator
// ============================================================================

/// Iterator over the Fibonacci sequence in `u64`.
///
/// Yields F(0), F(1), ... and ends after F(93), the last value that fits.
///
/// # Performance
/// - **Initialization**: $O(1)$ from the start, $O(\log k)$ via
///   [`FibIter::starting_at`].
/// - **Iteration**: one checked addition per `.next()`.
///
/// # Example
/// ```
/// use fiblab_core::FibIter;
///
/// let first: Vec<u64> = FibIter::new().take(8).collect();
/// assert_eq!(first, [0, 1, 1, 2, 3, 5, 8, 13]);
/// assert_eq!(FibIter::new().count(), 94);
/// ```
#[derive(Debug, Clone)]
pub struct FibIter {
    current: Option<u64>,
    next: Option<u64>,
}

impl FibIter {
    /// Creates an iterator starting at F(0).
    pub fn new() -> Self {
        Self {
            current: Some(0),
            next: Some(1),
        }
    }

    /// Creates an iterator starting at F(`start`).
    ///
    /// The starting pair is computed with matrix exponentiation. Empty when
    /// `start` is past the representable range.
    pub fn starting_at(start: u64) -> Self {
        let at = |k: u64| i64::try_from(k).ok().and_then(|k| fibonacci_matrix(k).ok());
        Self {
            current: at(start),
            next: start.checked_add(1).and_then(at),
        }
    }
}

impl Default for FibIter {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for FibIter {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let value = self.current?;
        self.current = self.next;
        self.next = self.current.and_then(|c| c.checked_add(value));
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match (self.current, self.next) {
            (None, _) => (0, Some(0)),
            (Some(_), None) => (1, Some(1)),
            (Some(_), Some(_)) => (2, Some(limits::MAX_U64_INDEX as usize + 1)),
        }
    }
}

impl std::iter::FusedIterator for FibIter {}

// ============================================================================
// Fibonacci Range Iterator
// ============================================================================

/// Iterator over F(start)..F(end), end exclusive.
///
/// Empty when `start >= end`; stops early at F(93).
///
/// # Example
/// ```
/// use fiblab_core::FibRange;
///
/// let fibs: Vec<u64> = FibRange::new(10, 13).collect();
/// assert_eq!(fibs, [55, 89, 144]);
/// ```
#[derive(Debug, Clone)]
pub struct FibRange {
    inner: FibIter,
    remaining: u64,
}

impl FibRange {
    /// Creates an iterator for the range $[F(\text{start}), F(\text{end}))$.
    pub fn new(start: u64, end: u64) -> Self {
        if start >= end {
            return Self {
                inner: FibIter {
                    current: None,
                    next: None,
                },
                remaining: 0,
            };
        }
        Self {
            inner: FibIter::starting_at(start),
            remaining: end - start,
        }
    }
}

impl Iterator for FibRange {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let value = self.inner.next();
        if value.is_none() {
            self.remaining = 0;
        }
        value
    }
}

impl std::iter::FusedIterator for FibRange {}
