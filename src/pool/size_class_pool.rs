//! Size-class pool - the core buffer reuse layer.
//!
//! The [`SizeClassPool`] provides:
//! - Power-of-two size classes from 16 to 8192 bytes
//! - One independently locked LIFO bucket per class
//! - Lazy allocation on a class miss, reuse on a hit
//! - Validation of returned buffers against the class table

use tracing::{debug, trace, warn};

use crate::common::config::{OversizePolicy, PoolConfig, MAX_CLASS_SIZE, NUM_CLASSES};
use crate::common::{Error, Result, SizeClass};
use crate::pool::{Bucket, PoolStats, RentedBuffer};

/// Lends byte buffers rounded up to a size class and takes them back for reuse.
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────────────────────────┐
/// │                        SizeClassPool                         │
/// │  rent(n) ── SizeClass::for_len(n) ──┐                        │
/// │                                     ▼                        │
/// │  buckets: [Bucket; 10]                                       │
/// │   [16B] [32B] [64B] [128B] [256B] ... [4096B] [8192B]        │
/// │     │     │                                                  │
/// │   Mutex<Vec<Box<[u8]>>>  (LIFO, one lock per class)          │
/// │                                     ▲                        │
/// │  give_back(buf) ── SizeClass::exact(buf.len()) ──┘           │
/// └──────────────────────────────────────────────────────────────┘
/// ```
///
/// # Thread Safety
/// - `buckets`: each bucket has its own `Mutex`; classes never contend
/// - `stats`: no lock, atomic counters only
/// - fresh allocations happen after the bucket lock is released
///
/// # Ownership
/// Buffers are `Box<[u8]>` moved in and out by value, so a rented buffer has
/// exactly one owner and cannot be returned twice.
///
/// # Usage
/// ```
/// use poolbench::SizeClassPool;
///
/// let pool = SizeClassPool::new();
///
/// let mut buf = pool.rent(17)?;
/// assert_eq!(buf.len(), 32);
/// buf[0] = 0xAB;
/// pool.give_back(buf)?;
///
/// // The same storage comes back for any request that maps to 32 bytes.
/// let again = pool.rent(20)?;
/// assert_eq!(again[0], 0xAB);
/// # Ok::<(), poolbench::Error>(())
/// ```
pub struct SizeClassPool {
    /// One bucket per size class, indexed by `SizeClass::index`.
    buckets: [Bucket; NUM_CLASSES],

    /// Oversize handling.
    config: PoolConfig,

    /// Performance statistics.
    stats: PoolStats,
}

impl SizeClassPool {
    /// Create a pool with the default configuration (oversize requests rejected).
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    /// Create a pool with an explicit configuration.
    ///
    /// All buckets start empty; nothing is preallocated.
    pub fn with_config(config: PoolConfig) -> Self {
        debug!(oversize = ?config.oversize, "creating size-class pool");
        Self {
            buckets: std::array::from_fn(|i| Bucket::new(SizeClass::from_index(i))),
            config,
            stats: PoolStats::new(),
        }
    }

    // ========================================================================
    // Public API: Rent and return
    // ========================================================================

    /// Rent a buffer of at least `size` bytes.
    ///
    /// The buffer's length is the capacity of the smallest class that fits
    /// `size`. The most recently returned buffer of that class is reused if
    /// there is one; otherwise a zeroed buffer is allocated.
    ///
    /// # Errors
    /// - `Error::UnsupportedSize` if `size > 8192` and the pool rejects oversize
    ///   requests. With [`OversizePolicy::Unpooled`] a zeroed buffer of exactly
    ///   `size` bytes is returned instead, or the same error if `size` cannot
    ///   be allocated at all.
    pub fn rent(&self, size: usize) -> Result<Box<[u8]>> {
        let Some(class) = SizeClass::for_len(size) else {
            return self.rent_oversized(size);
        };

        PoolStats::bump(&self.stats.rents);

        if let Some(buf) = self.bucket(class).pop() {
            PoolStats::bump(&self.stats.reuses);
            return Ok(buf);
        }

        // Bucket lock already released by pop().
        PoolStats::bump(&self.stats.allocations);
        trace!(%class, "bucket empty, allocating");
        Ok(vec![0u8; class.capacity()].into_boxed_slice())
    }

    /// Return a rented buffer to the bucket matching its length.
    ///
    /// Contents are left as they are; the next renter of the class sees them.
    ///
    /// # Errors
    /// - `Error::InvalidBuffer` if the length is at most 8192 but not exactly a
    ///   class capacity. No bucket is modified.
    /// - `Error::UnsupportedSize` if the length exceeds 8192 and the pool
    ///   rejects oversize buffers. With [`OversizePolicy::Unpooled`] the buffer
    ///   is simply dropped.
    pub fn give_back(&self, buf: Box<[u8]>) -> Result<()> {
        let len = buf.len();

        if len > MAX_CLASS_SIZE {
            return match self.config.oversize {
                OversizePolicy::Unpooled => {
                    PoolStats::bump(&self.stats.unpooled_returns);
                    Ok(())
                }
                OversizePolicy::Reject => {
                    PoolStats::bump(&self.stats.rejected);
                    warn!(len, "refusing oversized buffer");
                    Err(Error::UnsupportedSize(len))
                }
            };
        }

        let Some(class) = SizeClass::exact(len) else {
            PoolStats::bump(&self.stats.rejected);
            warn!(len, "refusing buffer that matches no size class");
            return Err(Error::InvalidBuffer(len));
        };

        self.bucket(class).push(buf);
        PoolStats::bump(&self.stats.returns);
        Ok(())
    }

    /// Rent a buffer wrapped in a guard that returns it on drop.
    ///
    /// # Errors
    /// Same as [`rent`](Self::rent).
    pub fn rent_guarded(&self, size: usize) -> Result<RentedBuffer<'_>> {
        Ok(RentedBuffer::new(self, self.rent(size)?))
    }

    // ========================================================================
    // Public API: Stats and info
    // ========================================================================

    /// Get pool statistics.
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    /// Get the pool configuration.
    pub fn config(&self) -> PoolConfig {
        self.config
    }

    /// Number of buffers waiting for reuse in `class`.
    pub fn available(&self, class: SizeClass) -> usize {
        self.bucket(class).len()
    }

    /// Total number of buffers waiting for reuse across all classes.
    pub fn available_total(&self) -> usize {
        self.buckets.iter().map(Bucket::len).sum()
    }

    /// Bytes held by all buckets.
    pub fn retained_bytes(&self) -> usize {
        self.buckets.iter().map(Bucket::retained_bytes).sum()
    }

    // ========================================================================
    // Internal
    // ========================================================================

    #[inline]
    pub(crate) fn bucket(&self, class: SizeClass) -> &Bucket {
        &self.buckets[class.index()]
    }

    fn rent_oversized(&self, size: usize) -> Result<Box<[u8]>> {
        match self.config.oversize {
            OversizePolicy::Unpooled => {
                let buf = try_alloc_zeroed(size).inspect_err(|_| {
                    PoolStats::bump(&self.stats.rejected);
                    warn!(size, "oversized request cannot be allocated");
                })?;
                PoolStats::bump(&self.stats.unpooled_rents);
                trace!(size, "serving oversized request outside the buckets");
                Ok(buf)
            }
            OversizePolicy::Reject => {
                PoolStats::bump(&self.stats.rejected);
                warn!(size, max = MAX_CLASS_SIZE, "refusing oversized request");
                Err(Error::UnsupportedSize(size))
            }
        }
    }
}

/// Allocate `len` zeroed bytes, failing instead of aborting when the
/// allocation is impossible.
///
/// # Errors
/// `Error::UnsupportedSize` if `len` overflows the maximum allocation size or
/// the allocator refuses it.
pub(crate) fn try_alloc_zeroed(len: usize) -> Result<Box<[u8]>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::UnsupportedSize(len))?;
    buf.resize(len, 0);
    Ok(buf.into_boxed_slice())
}

impl Default for SizeClassPool {
    fn default() -> Self {
        Self::new()
    }
}
