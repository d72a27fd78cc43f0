//! Buffer reuse strategies under comparison.

use std::fmt;

use crate::common::{Error, Result, SizeClass};
use crate::harness::SharedBufferPool;
use crate::pool::{try_alloc_zeroed, SizeClassPool};

/// How each benchmark iteration obtains its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Strategy {
    /// Allocate a fresh heap buffer every iteration.
    Baseline,
    /// Rent from a `SizeClassPool` created for the trial.
    SizeClassPooled,
    /// Rent from the process-wide shared pool.
    SharedPooled,
    /// Use an array on the worker's stack, sized to the count's class.
    Stack,
}

impl Strategy {
    /// Every strategy, baseline first.
    pub const ALL: [Strategy; 4] = [
        Strategy::Baseline,
        Strategy::SizeClassPooled,
        Strategy::SharedPooled,
        Strategy::Stack,
    ];

    /// Short stable name used in reports and logs.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Baseline => "baseline",
            Strategy::SizeClassPooled => "size-class-pooled",
            Strategy::SharedPooled => "shared-pooled",
            Strategy::Stack => "stack",
        }
    }

    /// Whether iterations rent from a pool.
    pub fn is_pooled(self) -> bool {
        matches!(self, Strategy::SizeClassPooled | Strategy::SharedPooled)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a worker gets its bytes for one iteration.
#[derive(Clone, Copy)]
pub(crate) enum BufferSource<'p> {
    Heap,
    Pool(&'p SizeClassPool),
    Shared(&'p SharedBufferPool),
    Stack,
}

impl BufferSource<'_> {
    /// Run `f` over a buffer of exactly `count` bytes, then release it.
    ///
    /// Pooled buffers are rented at class size and sliced down so every
    /// strategy performs the same amount of work.
    #[inline]
    pub(crate) fn with_buffer<R>(self, count: usize, f: impl FnOnce(&mut [u8]) -> R) -> Result<R> {
        match self {
            BufferSource::Heap => {
                let mut bytes = try_alloc_zeroed(count)?;
                Ok(f(&mut bytes))
            }
            BufferSource::Pool(pool) => {
                let mut bytes = pool.rent(count)?;
                let out = f(&mut bytes[..count]);
                pool.give_back(bytes)?;
                Ok(out)
            }
            BufferSource::Shared(pool) => {
                let mut bytes = pool.rent(count)?;
                let out = f(&mut bytes[..count]);
                pool.give_back(bytes)?;
                Ok(out)
            }
            BufferSource::Stack => {
                let class = SizeClass::for_len(count).ok_or(Error::UnsupportedSize(count))?;
                Ok(match class.capacity() {
                    16 => on_stack::<16, _, _>(count, f),
                    32 => on_stack::<32, _, _>(count, f),
                    64 => on_stack::<64, _, _>(count, f),
                    128 => on_stack::<128, _, _>(count, f),
                    256 => on_stack::<256, _, _>(count, f),
                    512 => on_stack::<512, _, _>(count, f),
                    1024 => on_stack::<1024, _, _>(count, f),
                    2048 => on_stack::<2048, _, _>(count, f),
                    4096 => on_stack::<4096, _, _>(count, f),
                    _ => on_stack::<8192, _, _>(count, f),
                })
            }
        }
    }
}

/// Zero an `N`-byte stack array and hand `f` its first `count` bytes.
#[inline]
fn on_stack<const N: usize, R, F: FnOnce(&mut [u8]) -> R>(count: usize, f: F) -> R {
    let mut bytes = [0u8; N];
    f(&mut bytes[..count])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::MAX_CLASS_SIZE;

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = Strategy::ALL.iter().map(|s| s.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Strategy::ALL.len());
    }

    #[test]
    fn test_is_pooled() {
        assert!(!Strategy::Baseline.is_pooled());
        assert!(Strategy::SizeClassPooled.is_pooled());
        assert!(Strategy::SharedPooled.is_pooled());
        assert!(!Strategy::Stack.is_pooled());
    }

    #[test]
    fn test_sources_give_exact_length() {
        let pool = SizeClassPool::new();
        let shared = SharedBufferPool::new();
        for source in [
            BufferSource::Heap,
            BufferSource::Pool(&pool),
            BufferSource::Shared(&shared),
            BufferSource::Stack,
        ] {
            let len = source.with_buffer(2000, |bytes| bytes.len()).unwrap();
            assert_eq!(len, 2000);
        }
        // Pooled buffers went back to their 2048-byte classes.
        assert_eq!(pool.available_total(), 1);
        assert_eq!(shared.retained(), 1);
    }

    #[test]
    fn test_stack_covers_every_class() {
        for count in [0, 1, 16, 17, 100, 1000, 4097, 8192] {
            let len = BufferSource::Stack.with_buffer(count, |bytes| bytes.len()).unwrap();
            assert_eq!(len, count);
        }
    }

    #[test]
    fn test_on_stack_fills_whole_band() {
        assert_eq!(on_stack::<64, _, _>(64, |bytes| bytes.len()), 64);
        assert_eq!(on_stack::<64, _, _>(33, |bytes| bytes.len()), 33);
    }

    #[test]
    fn test_stack_bytes_are_zeroed() {
        let all_zero = BufferSource::Stack
            .with_buffer(300, |bytes| bytes.iter().all(|&b| b == 0))
            .unwrap();
        assert!(all_zero);
    }

    #[test]
    fn test_stack_rejects_oversize() {
        let result = BufferSource::Stack.with_buffer(MAX_CLASS_SIZE + 1, |_| ());
        assert!(matches!(result, Err(Error::UnsupportedSize(_))));
    }

    #[test]
    fn test_heap_unallocatable_count_is_an_error() {
        let result = BufferSource::Heap.with_buffer(usize::MAX, |_| ());
        assert!(matches!(result, Err(Error::UnsupportedSize(usize::MAX))));
    }
}
