//! Measurement harness: runs one algorithm invocation and records its cost.

use std::hint::black_box;
use std::time::{Duration, Instant};

use crate::algo::check_index;
use crate::{allocator, Algorithm, FibError};

/// One timed and memory-profiled execution of an algorithm at index `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MeasurementRecord {
    pub n: u64,
    /// Wall-clock duration of the call.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "time_ms", serialize_with = "serialize_millis")
    )]
    pub time: Duration,
    /// Live heap bytes after the call minus live heap bytes before it.
    pub memory_used: i64,
    /// Peak live heap growth during the call.
    pub peak_memory: u64,
    /// The computed F(n).
    pub result: u64,
}

impl MeasurementRecord {
    /// Duration in fractional milliseconds, the unit statistics use.
    #[inline]
    pub fn time_ms(&self) -> f64 {
        self.time.as_secs_f64() * 1_000.0
    }
}

#[cfg(feature = "serde")]
fn serialize_millis<S>(time: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(time.as_secs_f64() * 1_000.0)
}

/// Measures a single call of `f(n)`.
///
/// Reads the allocation counters, restarts peak tracking, times the call and
/// reads the counters again. Memory figures are approximate: they include
/// anything else the process allocates meanwhile, and read 0 when
/// [`TrackingAllocator`](crate::TrackingAllocator) is not installed.
///
/// # Errors
/// * `FibError::InvalidArgument` if `n` is negative (before `f` is called).
/// * Any error returned by `f`.
pub fn measure_with<F>(n: i64, f: F) -> Result<MeasurementRecord, FibError>
where
    F: FnOnce(i64) -> Result<u64, FibError>,
{
    let index = check_index(n)?;

    let live_before = allocator::live_bytes();
    allocator::reset_peak();
    let start = Instant::now();
    let outcome = black_box(f(black_box(n)));
    let time = start.elapsed();
    let live_after = allocator::live_bytes();
    let peak = allocator::peak_bytes();

    let result = outcome?;
    Ok(MeasurementRecord {
        n: index,
        time,
        memory_used: live_after as i64 - live_before as i64,
        peak_memory: peak.saturating_sub(live_before) as u64,
        result,
    })
}

/// Measures a single call of `algorithm` at index `n`.
///
/// # Example
/// ```
/// use fiblab_core::{measure, Algorithm};
///
/// let record = measure(Algorithm::Matrix, 20).unwrap();
/// assert_eq!(record.n, 20);
/// assert_eq!(record.result, 6765);
/// ```
pub fn measure(algorithm: Algorithm, n: i64) -> Result<MeasurementRecord, FibError> {
    let record = measure_with(n, |n| algorithm.compute(n))?;
    tracing::debug!(
        algorithm = algorithm.as_str(),
        n,
        elapsed_ns = record.time.as_nanos() as u64,
        memory_used = record.memory_used,
        "measured"
    );
    Ok(record)
}
