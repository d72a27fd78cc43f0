//! Benchmark harness comparing buffer reuse strategies.
//!
//! # Components
//! - [`Strategy`] - Baseline, size-class pool, shared pool, stack
//! - [`run_trial`] / [`run_all`] - Timed multi-threaded trials
//! - [`TrialReport`] / [`summarize`] - Results and per-strategy summaries
//! - [`Config`] - Command line configuration for the `poolbench` binary
//! - [`SharedBufferPool`] - Process-wide pool behind the shared-pooled strategy
//! - [`CountingAllocator`] / [`AllocStats`] - Per-trial heap accounting

mod alloc;
mod config;
mod report;
mod runner;
mod shared;
mod strategy;

pub use alloc::{AllocStats, CountingAllocator};
pub use config::{Config, TrialConfig};
pub use report::{summarize, write_summary, StrategySummary, TrialReport};
pub use runner::{run_all, run_trial};
pub use shared::{shared_buffer_pool, SharedBufferPool, SHARED_MAX_LEN};
pub use strategy::Strategy;
