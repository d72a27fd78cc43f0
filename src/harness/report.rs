//! Trial reports and per-strategy summaries.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use crate::common::Result;
use crate::harness::{AllocStats, Strategy};
use crate::pool::StatsSnapshot;

/// Outcome of one timed trial.
#[derive(Debug, Clone)]
pub struct TrialReport {
    /// Strategy that ran.
    pub strategy: Strategy,
    /// Wall-clock time for all workers to drain the iterations.
    pub elapsed: Duration,
    /// Average byte value per iteration, indexed by iteration.
    pub results: Vec<f64>,
    /// Pool activity during the trial, for pooled strategies.
    pub pool_stats: Option<StatsSnapshot>,
    /// Heap allocations made while the trial ran. Zero unless
    /// [`CountingAllocator`](crate::harness::CountingAllocator) is installed.
    pub alloc: AllocStats,
}

impl TrialReport {
    /// Iterations completed per second.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.results.len() as f64 / secs
        }
    }
}

impl fmt::Display for TrialReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<18} {:>12.3?} {:>14.0} iter/s",
            self.strategy.name(),
            self.elapsed,
            self.throughput()
        )?;
        write!(f, "  {}", self.alloc)?;
        if let Some(stats) = &self.pool_stats {
            write!(f, "  {}", stats)?;
        }
        Ok(())
    }
}

/// Aggregate of all trials for one strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategySummary {
    pub strategy: Strategy,
    pub trials: usize,
    pub mean: Duration,
    pub min: Duration,
    /// Mean time relative to the baseline's mean, when a baseline ran.
    pub ratio: Option<f64>,
    /// Mean heap allocations per trial.
    pub mean_allocs: u64,
    /// Mean heap bytes allocated per trial.
    pub mean_bytes: u64,
}

/// Summarize reports per strategy, in first-seen order.
pub fn summarize(reports: &[TrialReport]) -> Vec<StrategySummary> {
    let mut order: Vec<Strategy> = Vec::new();
    for report in reports {
        if !order.contains(&report.strategy) {
            order.push(report.strategy);
        }
    }

    let mut summaries: Vec<StrategySummary> = order
        .into_iter()
        .map(|strategy| {
            let runs: Vec<&TrialReport> = reports.iter().filter(|r| r.strategy == strategy).collect();
            let trials = runs.len();
            let total: Duration = runs.iter().map(|r| r.elapsed).sum();
            let allocs: u64 = runs.iter().map(|r| r.alloc.allocs).sum();
            let bytes: u64 = runs.iter().map(|r| r.alloc.bytes).sum();
            StrategySummary {
                strategy,
                trials,
                mean: total / trials as u32,
                min: runs.iter().map(|r| r.elapsed).min().unwrap_or_default(),
                ratio: None,
                mean_allocs: allocs / trials as u64,
                mean_bytes: bytes / trials as u64,
            }
        })
        .collect();

    let baseline = summaries
        .iter()
        .find(|s| s.strategy == Strategy::Baseline)
        .map(|s| s.mean.as_secs_f64());
    if let Some(base) = baseline.filter(|&b| b > 0.0) {
        for summary in &mut summaries {
            summary.ratio = Some(summary.mean.as_secs_f64() / base);
        }
    }

    summaries
}

/// Write a summary table.
pub fn write_summary(out: &mut impl Write, summaries: &[StrategySummary]) -> Result<()> {
    writeln!(
        out,
        "{:<18} {:>7} {:>14} {:>14} {:>7} {:>12} {:>14}",
        "strategy", "trials", "mean", "min", "ratio", "allocs", "bytes"
    )?;
    for s in summaries {
        let ratio = s
            .ratio
            .map(|r| format!("{:.2}", r))
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "{:<18} {:>7} {:>14.3?} {:>14.3?} {:>7} {:>12} {:>14}",
            s.strategy.name(),
            s.trials,
            s.mean,
            s.min,
            ratio,
            s.mean_allocs,
            s.mean_bytes
        )?;
    }
    Ok(())
}
