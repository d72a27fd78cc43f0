//! Heap allocation accounting for benchmark trials.
//!
//! [`CountingAllocator`] wraps the system allocator and bumps global counters
//! on every allocation. A binary (or test crate) opts in with:
//!
//! ```rust,ignore
//! #[global_allocator]
//! static ALLOC: poolbench::harness::CountingAllocator = poolbench::harness::CountingAllocator;
//! ```
//!
//! Without it installed every counter stays at zero.
//!
//! Counters are global, not per thread: a trial's delta includes allocations
//! made by any thread while the trial ran.

use std::alloc::{GlobalAlloc, Layout, System};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static ALLOC_COUNT: AtomicU64 = AtomicU64::new(0);
static ALLOC_BYTES: AtomicU64 = AtomicU64::new(0);
static DEALLOC_COUNT: AtomicU64 = AtomicU64::new(0);

/// System allocator that records allocation calls and bytes.
pub struct CountingAllocator;

#[inline]
fn record_alloc(bytes: usize) {
    ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
    ALLOC_BYTES.fetch_add(bytes as u64, Ordering::Relaxed);
}

// SAFETY: every call is delegated to `System`, which upholds the GlobalAlloc
// contract; the counters are plain relaxed atomics and never allocate.
unsafe impl GlobalAlloc for CountingAllocator {
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

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            // Growth counts as a fresh allocation of the new size.
            record_alloc(new_size);
            DEALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        new_ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        DEALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
    }
}

/// Global allocation counters at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllocStats {
    pub allocs: u64,
    pub bytes: u64,
    pub deallocs: u64,
}

impl AllocStats {
    /// Read the current counters.
    pub fn now() -> Self {
        Self {
            allocs: ALLOC_COUNT.load(Ordering::Relaxed),
            bytes: ALLOC_BYTES.load(Ordering::Relaxed),
            deallocs: DEALLOC_COUNT.load(Ordering::Relaxed),
        }
    }

    /// Counter-wise difference `self - earlier`, saturating at zero.
    pub fn since(&self, earlier: &AllocStats) -> AllocStats {
        AllocStats {
            allocs: self.allocs.saturating_sub(earlier.allocs),
            bytes: self.bytes.saturating_sub(earlier.bytes),
            deallocs: self.deallocs.saturating_sub(earlier.deallocs),
        }
    }
}

impl fmt::Display for AllocStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "allocs: {}, allocated: {} B", self.allocs, self.bytes)
    }
}
