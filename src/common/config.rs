//! Configuration constants and runtime pool configuration.

/// Number of size classes (buckets) in a pool.
pub const NUM_CLASSES: usize = 10;

/// Capacity of the smallest size class in bytes.
pub const MIN_CLASS_SIZE: usize = 16;

/// Capacity of the largest size class in bytes.
///
/// Requests above this have no class. What happens to them is decided by
/// [`OversizePolicy`].
pub const MAX_CLASS_SIZE: usize = 8192;

/// Capacities of every size class, ascending. Index `i` is bucket `i`.
pub const CLASS_CAPACITIES: [usize; NUM_CLASSES] =
    [16, 32, 64, 128, 256, 512, 1024, 2048, 4096, 8192];

/// What a pool does with sizes larger than [`MAX_CLASS_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OversizePolicy {
    /// Fail with [`Error::UnsupportedSize`](crate::Error::UnsupportedSize)
    /// on both rent and return.
    #[default]
    Reject,

    /// Serve an exact-size buffer that bypasses the buckets, and drop such
    /// buffers when they are returned.
    Unpooled,
}

/// Runtime configuration for a [`SizeClassPool`](crate::SizeClassPool).
///
/// # Example
/// ```
/// use poolbench::common::config::{OversizePolicy, PoolConfig};
///
/// let config = PoolConfig::default().with_oversize(OversizePolicy::Unpooled);
/// assert_eq!(config.oversize, OversizePolicy::Unpooled);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolConfig {
    /// Handling of requests beyond the largest class.
    pub oversize: OversizePolicy,
}

impl PoolConfig {
    /// Set the oversize policy.
    pub fn with_oversize(mut self, oversize: OversizePolicy) -> Self {
        self.oversize = oversize;
        self
    }
}
