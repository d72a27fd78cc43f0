//! Size-class buffer pooling.
//!
//! Buffers are rounded up to one of ten power-of-two classes and recycled
//! through a per-class free list.
//!
//! # Components
//! - [`SizeClassPool`] - The rent/return entry point
//! - [`Bucket`] - Locked LIFO free list for one class
//! - [`RentedBuffer`] - RAII guard that returns on drop
//! - [`PoolStats`] - Reuse statistics

mod bucket;
mod rented;
mod size_class_pool;
mod stats;

pub use bucket::Bucket;
pub use rented::RentedBuffer;
pub use size_class_pool::SizeClassPool;
pub(crate) use size_class_pool::try_alloc_zeroed;
pub use stats::{PoolStats, StatsSnapshot};
