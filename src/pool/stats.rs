//! Pool statistics tracking.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics tracked by a size-class pool.
///
/// All fields are atomic so worker threads can bump counters without taking
/// any bucket lock. Every access uses `Ordering::Relaxed`: the counters are
/// independent and only need to be atomic, not ordered with each other.
///
/// # Example
/// ```
/// use poolbench::PoolStats;
/// use std::sync::atomic::Ordering;
///
/// let stats = PoolStats::new();
/// stats.reuses.fetch_add(1, Ordering::Relaxed);
/// assert_eq!(stats.reuses.load(Ordering::Relaxed), 1);
/// ```
#[derive(Debug)]
pub struct PoolStats {
    /// Successful rents from a size class.
    pub rents: AtomicU64,

    /// Rents served from a bucket instead of fresh memory.
    pub reuses: AtomicU64,

    /// Rents that had to allocate a new class buffer.
    pub allocations: AtomicU64,

    /// Buffers pushed back onto a bucket.
    pub returns: AtomicU64,

    /// Oversized rents served outside the buckets.
    pub unpooled_rents: AtomicU64,

    /// Returned buffers released instead of retained.
    pub unpooled_returns: AtomicU64,

    /// Rents or returns refused with an error.
    pub rejected: AtomicU64,
}

impl PoolStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            rents: AtomicU64::new(0),
            reuses: AtomicU64::new(0),
            allocations: AtomicU64::new(0),
            returns: AtomicU64::new(0),
            unpooled_rents: AtomicU64::new(0),
            unpooled_returns: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Fraction of class rents served by reuse (0.0 to 1.0).
    pub fn reuse_rate(&self) -> f64 {
        self.snapshot().reuse_rate()
    }

    /// Get a non-atomic copy for display/logging.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            rents: self.rents.load(Ordering::Relaxed),
            reuses: self.reuses.load(Ordering::Relaxed),
            allocations: self.allocations.load(Ordering::Relaxed),
            returns: self.returns.load(Ordering::Relaxed),
            unpooled_rents: self.unpooled_rents.load(Ordering::Relaxed),
            unpooled_returns: self.unpooled_returns.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}

impl Default for PoolStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time copy of [`PoolStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub rents: u64,
    pub reuses: u64,
    pub allocations: u64,
    pub returns: u64,
    pub unpooled_rents: u64,
    pub unpooled_returns: u64,
    pub rejected: u64,
}

impl StatsSnapshot {
    /// Fraction of class rents served by reuse (0.0 to 1.0).
    pub fn reuse_rate(&self) -> f64 {
        let total = self.reuses + self.allocations;
        if total == 0 {
            0.0
        } else {
            self.reuses as f64 / total as f64
        }
    }

    /// Counter-wise difference `self - earlier`, saturating at zero.
    ///
    /// Used to report one trial's activity on a long-lived pool.
    pub fn since(&self, earlier: &StatsSnapshot) -> StatsSnapshot {
        StatsSnapshot {
            rents: self.rents.saturating_sub(earlier.rents),
            reuses: self.reuses.saturating_sub(earlier.reuses),
            allocations: self.allocations.saturating_sub(earlier.allocations),
            returns: self.returns.saturating_sub(earlier.returns),
            unpooled_rents: self.unpooled_rents.saturating_sub(earlier.unpooled_rents),
            unpooled_returns: self.unpooled_returns.saturating_sub(earlier.unpooled_returns),
            rejected: self.rejected.saturating_sub(earlier.rejected),
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ rents: {}, reuses: {}, allocations: {}, returns: {}, reuse_rate: {:.2}% }}",
            self.rents,
            self.reuses,
            self.allocations,
            self.returns,
            self.reuse_rate() * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = PoolStats::new();
        assert_eq!(stats.rents.load(Ordering::Relaxed), 0);
        assert_eq!(stats.allocations.load(Ordering::Relaxed), 0);
        assert_eq!(stats.reuse_rate(), 0.0);
    }

    #[test]
    fn test_stats_reuse_rate() {
        let stats = PoolStats::new();

        stats.reuses.fetch_add(7, Ordering::Relaxed);
        stats.allocations.fetch_add(3, Ordering::Relaxed);

        assert_eq!(stats.reuse_rate(), 0.7);
    }

    #[test]
    fn test_snapshot_since() {
        let stats = PoolStats::new();
        stats.rents.fetch_add(4, Ordering::Relaxed);
        let before = stats.snapshot();

        stats.rents.fetch_add(6, Ordering::Relaxed);
        stats.returns.fetch_add(6, Ordering::Relaxed);

        let delta = stats.snapshot().since(&before);
        assert_eq!(delta.rents, 6);
        assert_eq!(delta.returns, 6);
        assert_eq!(delta.reuses, 0);
    }

    #[test]
    fn test_stats_display() {
        let stats = PoolStats::new();
        stats.rents.fetch_add(100, Ordering::Relaxed);
        stats.reuses.fetch_add(80, Ordering::Relaxed);
        stats.allocations.fetch_add(20, Ordering::Relaxed);

        let display = format!("{}", stats.snapshot());

        assert!(display.contains("rents: 100"));
        assert!(display.contains("allocations: 20"));
        assert!(display.contains("80.00%"));
    }
}
