//! Process-wide shared buffer pool.
//!
//! A general-purpose pool in the style of a runtime's shared array pool: one
//! global instance, power-of-two classes up to 1 MiB, and a small lock-free
//! bounded queue per class. Buffers returned to a full queue are released.
//! It is deliberately a different design from
//! [`SizeClassPool`](crate::SizeClassPool) so the two can be benchmarked
//! against each other.

use std::sync::OnceLock;

use crossbeam::queue::ArrayQueue;
use tracing::{debug, warn};

use crate::common::{Error, Result};
use crate::pool::{try_alloc_zeroed, PoolStats};

/// Smallest buffer handed out.
pub const SHARED_MIN_LEN: usize = 16;

/// Largest pooled buffer (1 MiB). Larger requests get an exact, unpooled buffer.
pub const SHARED_MAX_LEN: usize = 1024 * 1024;

/// Buffers retained per class.
pub const SHARED_SLOTS_PER_CLASS: usize = 32;

/// Classes 16, 32, ..., 1 MiB.
const SHARED_CLASSES: usize =
    (SHARED_MAX_LEN.trailing_zeros() - SHARED_MIN_LEN.trailing_zeros()) as usize + 1;

static SHARED_BUFFER_POOL: OnceLock<SharedBufferPool> = OnceLock::new();

/// Get the global shared pool.
pub fn shared_buffer_pool() -> &'static SharedBufferPool {
    SHARED_BUFFER_POOL.get_or_init(SharedBufferPool::new)
}

/// Lock-free pool of power-of-two byte buffers with bounded retention.
pub struct SharedBufferPool {
    /// One bounded queue per class, index 0 = 16 bytes.
    classes: Vec<ArrayQueue<Box<[u8]>>>,
    stats: PoolStats,
}

impl SharedBufferPool {
    /// Create an empty pool. Prefer [`shared_buffer_pool`] outside tests.
    pub fn new() -> Self {
        debug!(classes = SHARED_CLASSES, "creating shared buffer pool");
        Self {
            classes: (0..SHARED_CLASSES)
                .map(|_| ArrayQueue::new(SHARED_SLOTS_PER_CLASS))
                .collect(),
            stats: PoolStats::new(),
        }
    }

    /// Rent a buffer of at least `min_len` bytes.
    ///
    /// Pooled buffers are the next power of two (at least 16). Requests above
    /// 1 MiB get a fresh buffer of exactly `min_len` bytes.
    ///
    /// # Errors
    /// `Error::UnsupportedSize` if an oversized request cannot be allocated.
    pub fn rent(&self, min_len: usize) -> Result<Box<[u8]>> {
        let Some(index) = class_index(min_len) else {
            let buf = try_alloc_zeroed(min_len).inspect_err(|_| {
                PoolStats::bump(&self.stats.rejected);
            })?;
            PoolStats::bump(&self.stats.unpooled_rents);
            return Ok(buf);
        };

        PoolStats::bump(&self.stats.rents);
        if let Some(buf) = self.classes[index].pop() {
            PoolStats::bump(&self.stats.reuses);
            return Ok(buf);
        }

        PoolStats::bump(&self.stats.allocations);
        Ok(vec![0u8; SHARED_MIN_LEN << index].into_boxed_slice())
    }

    /// Return a buffer. It is released instead of retained if it is larger
    /// than 1 MiB or its class queue is full.
    ///
    /// # Errors
    /// `Error::InvalidBuffer` if the length is not a power of two of at least
    /// 16 bytes (and at most 1 MiB).
    pub fn give_back(&self, buf: Box<[u8]>) -> Result<()> {
        let len = buf.len();
        if len > SHARED_MAX_LEN {
            PoolStats::bump(&self.stats.unpooled_returns);
            return Ok(());
        }
        if len < SHARED_MIN_LEN || !len.is_power_of_two() {
            PoolStats::bump(&self.stats.rejected);
            warn!(len, "shared pool refusing buffer with a non-pool length");
            return Err(Error::InvalidBuffer(len));
        }

        let index = (len.trailing_zeros() - SHARED_MIN_LEN.trailing_zeros()) as usize;
        match self.classes[index].push(buf) {
            Ok(()) => PoolStats::bump(&self.stats.returns),
            Err(_full) => PoolStats::bump(&self.stats.unpooled_returns),
        }
        Ok(())
    }

    /// Get pool statistics.
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    /// Buffers currently retained across all classes.
    pub fn retained(&self) -> usize {
        self.classes.iter().map(ArrayQueue::len).sum()
    }
}

impl Default for SharedBufferPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Class index for a request, or `None` above [`SHARED_MAX_LEN`].
#[inline]
fn class_index(len: usize) -> Option<usize> {
    if len > SHARED_MAX_LEN {
        return None;
    }
    let cap = len.max(SHARED_MIN_LEN).next_power_of_two();
    Some((cap.trailing_zeros() - SHARED_MIN_LEN.trailing_zeros()) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_index() {
        assert_eq!(SHARED_CLASSES, 17);
        assert_eq!(class_index(0), Some(0));
        assert_eq!(class_index(16), Some(0));
        assert_eq!(class_index(17), Some(1));
        assert_eq!(class_index(8193), Some(10));
        assert_eq!(class_index(SHARED_MAX_LEN), Some(16));
        assert_eq!(class_index(SHARED_MAX_LEN + 1), None);
    }

    #[test]
    fn test_rent_rounds_to_power_of_two() {
        let pool = SharedBufferPool::new();
        assert_eq!(pool.rent(2000).unwrap().len(), 2048);
        assert_eq!(pool.rent(10_000).unwrap().len(), 16384);
        assert_eq!(pool.rent(SHARED_MAX_LEN + 1).unwrap().len(), SHARED_MAX_LEN + 1);
    }

    #[test]
    fn test_reuse_after_return() {
        let pool = SharedBufferPool::new();

        let buf = pool.rent(100).unwrap();
        let ptr = buf.as_ptr();
        pool.give_back(buf).unwrap();
        assert_eq!(pool.retained(), 1);

        assert_eq!(pool.rent(128).unwrap().as_ptr(), ptr);

        let snapshot = pool.stats().snapshot();
        assert_eq!(snapshot.reuses, 1);
        assert_eq!(snapshot.allocations, 1);
    }

    #[test]
    fn test_full_class_releases_extra_buffers() {
        let pool = SharedBufferPool::new();

        let bufs: Vec<_> = (0..SHARED_SLOTS_PER_CLASS + 3)
            .map(|_| pool.rent(64).unwrap())
            .collect();
        for buf in bufs {
            pool.give_back(buf).unwrap();
        }

        assert_eq!(pool.retained(), SHARED_SLOTS_PER_CLASS);
        let snapshot = pool.stats().snapshot();
        assert_eq!(snapshot.returns, SHARED_SLOTS_PER_CLASS as u64);
        assert_eq!(snapshot.unpooled_returns, 3);
    }

    #[test]
    fn test_invalid_length_rejected() {
        let pool = SharedBufferPool::new();
        let result = pool.give_back(vec![0u8; 100].into_boxed_slice());
        assert!(matches!(result, Err(Error::InvalidBuffer(100))));
        assert_eq!(pool.retained(), 0);
    }

    #[test]
    fn test_huge_request_is_an_error() {
        let pool = SharedBufferPool::new();
        assert!(matches!(pool.rent(usize::MAX), Err(Error::UnsupportedSize(_))));
    }

    #[test]
    fn test_global_instance_is_singleton() {
        let a = shared_buffer_pool() as *const SharedBufferPool;
        let b = shared_buffer_pool() as *const SharedBufferPool;
        assert_eq!(a, b);
    }
}
