//! Benchmark configuration: command line and per-trial parameters.

use clap::Parser;

use crate::common::config::{OversizePolicy, PoolConfig};
use crate::common::{Error, Result};
use crate::harness::Strategy;

/// poolbench - compare byte buffer reuse strategies under concurrent load
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Strategy to run (all strategies when omitted)
    #[arg(short, long, value_enum)]
    pub strategy: Option<Strategy>,

    /// Bytes per buffer
    #[arg(short, long, default_value = "2048")]
    pub count: usize,

    /// Buffers processed per trial
    #[arg(short, long, default_value = "100")]
    pub iterations: usize,

    /// Worker threads per trial
    #[arg(short = 'j', long, default_value = "4")]
    pub concurrency: usize,

    /// Timed trials per strategy
    #[arg(short, long, default_value = "5")]
    pub trials: usize,

    /// Seed for the per-worker random byte generators
    #[arg(long, default_value = "1")]
    pub seed: u64,

    /// How pools treat buffers larger than 8192 bytes
    #[arg(long, value_enum, default_value = "reject")]
    pub oversize: OversizePolicy,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse_args() -> Self {
        Config::parse()
    }

    /// Strategies selected on the command line.
    pub fn strategies(&self) -> Vec<Strategy> {
        match self.strategy {
            Some(strategy) => vec![strategy],
            None => Strategy::ALL.to_vec(),
        }
    }

    /// Parameters shared by every trial.
    pub fn trial_config(&self) -> TrialConfig {
        TrialConfig {
            count: self.count,
            iterations: self.iterations,
            concurrency: self.concurrency,
            seed: self.seed,
            pool: PoolConfig::default().with_oversize(self.oversize),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: None,
            count: 2048,
            iterations: 100,
            concurrency: 4,
            trials: 5,
            seed: 1,
            oversize: OversizePolicy::Reject,
            log_level: "info".to_string(),
        }
    }
}

/// Parameters for a single trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialConfig {
    /// Bytes per buffer.
    pub count: usize,
    /// Buffers processed in the trial.
    pub iterations: usize,
    /// Worker threads sharing the iterations.
    pub concurrency: usize,
    /// Base seed; each worker derives its own from it.
    pub seed: u64,
    /// Configuration of the per-trial pool.
    pub pool: PoolConfig,
}

impl TrialConfig {
    /// Check that the trial can run.
    ///
    /// # Errors
    /// `Error::InvalidConfig` if `iterations` or `concurrency` is zero, or
    /// `count` exceeds `isize::MAX` (no allocation can be that large).
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::InvalidConfig("iterations must be > 0".into()));
        }
        if self.concurrency == 0 {
            return Err(Error::InvalidConfig("concurrency must be > 0".into()));
        }
        if self.count > isize::MAX as usize {
            return Err(Error::InvalidConfig(format!(
                "count {} exceeds the largest possible allocation",
                self.count
            )));
        }
        Ok(())
    }
}

impl Default for TrialConfig {
    fn default() -> Self {
        Config::default().trial_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrialConfig::default();
        assert_eq!(config.count, 2048);
        assert_eq!(config.iterations, 100);
        assert_eq!(config.concurrency, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero() {
        let config = TrialConfig {
            concurrency: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = TrialConfig {
            iterations: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_impossible_count() {
        let config = TrialConfig {
            count: isize::MAX as usize + 1,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = TrialConfig {
            count: isize::MAX as usize,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_cli() {
        let config = Config::parse_from([
            "poolbench",
            "--strategy",
            "size-class-pooled",
            "--count",
            "9000",
            "-j",
            "8",
            "--oversize",
            "unpooled",
        ]);

        assert_eq!(config.strategies(), vec![Strategy::SizeClassPooled]);
        let trial = config.trial_config();
        assert_eq!(trial.count, 9000);
        assert_eq!(trial.concurrency, 8);
        assert_eq!(trial.pool.oversize, OversizePolicy::Unpooled);
    }

    #[test]
    fn test_all_strategies_by_default() {
        let config = Config::parse_from(["poolbench"]);
        assert_eq!(config.strategies(), Strategy::ALL.to_vec());
        assert_eq!(config.trials, 5);
    }
}
