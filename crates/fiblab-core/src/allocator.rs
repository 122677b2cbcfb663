//! Heap accounting for the measurement harness.
//!
//! [`TrackingAllocator`] wraps the system allocator and keeps two process-wide
//! counters: bytes currently live and the peak of that figure since the last
//! [`reset_peak`]. A binary opts in with
//!
//! ```ignore
//! #[global_allocator]
//! static GLOBAL: fiblab_core::TrackingAllocator = fiblab_core::TrackingAllocator;
//! ```
//!
//! Without it every counter reads 0 and memory figures in measurements are 0.
//! The counters are shared by all threads, so any concurrent allocation shows
//! up in a measurement.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

static LIVE_BYTES: AtomicUsize = AtomicUsize::new(0);
static PEAK_BYTES: AtomicUsize = AtomicUsize::new(0);

/// Global allocator that counts live heap bytes.
pub struct TrackingAllocator;

#[inline]
fn record_alloc(size: usize) {
    let live = LIVE_BYTES.fetch_add(size, Ordering::Relaxed).wrapping_add(size);
    PEAK_BYTES.fetch_max(live, Ordering::Relaxed);
}

#[inline]
fn record_dealloc(size: usize) {
    LIVE_BYTES.fetch_sub(size, Ordering::Relaxed);
}

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        record_dealloc(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            let old_size = layout.size();
            if new_size > old_size {
                record_alloc(new_size - old_size);
            } else {
                record_dealloc(old_size - new_size);
            }
        }
        new_ptr
    }
}

/// Bytes currently allocated through [`TrackingAllocator`].
#[inline]
pub fn live_bytes() -> usize {
    LIVE_BYTES.load(Ordering::Relaxed)
}

/// Highest [`live_bytes`] value since the last [`reset_peak`].
#[inline]
pub fn peak_bytes() -> usize {
    PEAK_BYTES.load(Ordering::Relaxed)
}

/// Restarts peak tracking from the current live figure.
#[inline]
pub fn reset_peak() {
    PEAK_BYTES.store(LIVE_BYTES.load(Ordering::Relaxed), Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;

    // The unit test binary does not install the allocator.
    #[test]
    fn counters_are_inert_without_installation() {
        reset_peak();
        let before = live_bytes();
        let v = vec![0u8; 4096];
        assert_eq!(live_bytes(), before);
        assert!(peak_bytes() >= live_bytes());
        drop(v);
    }
}
