//! poolbench - size-class byte buffer pooling and a benchmark of buffer reuse strategies.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           poolbench                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              Harness (harness/)                          │   │
//! │  │   Config → run_all → run_trial × workers → TrialReport   │   │
//! │  │   Strategies: Baseline | SizeClassPooled |               │   │
//! │  │               SharedPooled (SharedBufferPool) | Stack    │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌──────────────────────────┐  ┌───────────────────────────┐   │
//! │  │   Workload (workload)    │  │      Pool (pool/)         │   │
//! │  │ XorShift64 + average_byte│  │ SizeClassPool + Bucket    │   │
//! │  └──────────────────────────┘  │ RentedBuffer + PoolStats  │   │
//! │                                └───────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │        Common (common/): SizeClass, config, Error        │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (SizeClass, Error, config)
//! - [`pool`] - The size-class buffer pool
//! - [`workload`] - Random fill and byte averaging
//! - [`harness`] - Multi-threaded strategy comparison
//!
//! # Quick Start
//! ```
//! use poolbench::SizeClassPool;
//!
//! let pool = SizeClassPool::new();
//! let buf = pool.rent(1500)?;
//! assert_eq!(buf.len(), 2048);
//! pool.give_back(buf)?;
//! # Ok::<(), poolbench::Error>(())
//! ```

pub mod common;
pub mod harness;
pub mod pool;
pub mod workload;

// Re-export commonly used items at crate root for convenience
pub use common::config::{OversizePolicy, PoolConfig, MAX_CLASS_SIZE};
pub use common::{Error, Result, SizeClass};

pub use pool::{PoolStats, RentedBuffer, SizeClassPool, StatsSnapshot};

#[cfg(test)]
#[global_allocator]
static GLOBAL_ALLOC: harness::CountingAllocator = harness::CountingAllocator;
