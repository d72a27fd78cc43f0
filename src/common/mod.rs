//! Common types and utilities shared across poolbench.
//!
//! This module contains the primitives used throughout the codebase:
//! - Configuration constants and [`PoolConfig`](config::PoolConfig)
//! - Error types
//! - The [`SizeClass`] identifier

pub mod config;
pub mod error;
mod size_class;

pub use error::{Error, Result};
pub use size_class::SizeClass;
