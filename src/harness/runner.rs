//! Trial runner: spreads iterations over worker threads.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use tracing::{debug, info};

use crate::common::Result;
use crate::harness::strategy::BufferSource;
use crate::harness::{shared_buffer_pool, AllocStats, Strategy, TrialConfig, TrialReport};
use crate::pool::SizeClassPool;
use crate::workload::{average_byte, XorShift64};

/// Multiplier spreading worker seeds apart.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Run one timed trial of `strategy`.
///
/// `config.concurrency` scoped threads pull iteration indices from a shared
/// counter until all `config.iterations` are claimed. Each iteration fills a
/// buffer of `config.count` random bytes and records its average at
/// `results[index]`.
///
/// # Errors
/// - `Error::InvalidConfig` if iterations or concurrency is zero, or count exceeds `isize::MAX`
/// - `Error::UnsupportedSize` if `count` is too large for the strategy
pub fn run_trial(strategy: Strategy, config: &TrialConfig) -> Result<TrialReport> {
    config.validate()?;

    // One pool per trial; dropped (with every retained buffer) when the trial ends.
    let trial_pool;
    let source = match strategy {
        Strategy::Baseline => BufferSource::Heap,
        Strategy::Stack => BufferSource::Stack,
        Strategy::SharedPooled => BufferSource::Shared(shared_buffer_pool()),
        Strategy::SizeClassPooled => {
            trial_pool = SizeClassPool::with_config(config.pool);
            debug!(oversize = ?trial_pool.config().oversize, "created trial pool");
            BufferSource::Pool(&trial_pool)
        }
    };
    let pool_stats = match source {
        BufferSource::Pool(pool) => Some(pool.stats()),
        BufferSource::Shared(pool) => Some(pool.stats()),
        _ => None,
    };
    let before = pool_stats.map(|stats| stats.snapshot());

    debug!(%strategy, ?config, "starting trial");
    let next = AtomicUsize::new(0);
    let alloc_before = AllocStats::now();
    let start = Instant::now();

    let partials: Vec<Result<Vec<(usize, f64)>>> = thread::scope(|s| {
        let handles: Vec<_> = (0..config.concurrency)
            .map(|worker| {
                let next = &next;
                s.spawn(move || run_worker(source, config, worker, next))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    });

    let elapsed = start.elapsed();
    let alloc = AllocStats::now().since(&alloc_before);

    let mut results = vec![0.0; config.iterations];
    for partial in partials {
        for (index, value) in partial? {
            results[index] = value;
        }
    }

    let pool_stats = match (pool_stats, before) {
        (Some(stats), Some(before)) => Some(stats.snapshot().since(&before)),
        _ => None,
    };

    let report = TrialReport {
        strategy,
        elapsed,
        results,
        pool_stats,
        alloc,
    };
    info!(
        %strategy,
        elapsed = ?report.elapsed,
        throughput = report.throughput(),
        allocs = report.alloc.allocs,
        alloc_bytes = report.alloc.bytes,
        "trial finished"
    );
    Ok(report)
}

/// Run every strategy `trials` times, interleaving strategies per round.
///
/// # Errors
/// Stops at the first failing trial.
pub fn run_all(strategies: &[Strategy], config: &TrialConfig, trials: usize) -> Result<Vec<TrialReport>> {
    let mut reports = Vec::with_capacity(strategies.len() * trials);
    for round in 0..trials {
        debug!(round, "starting round");
        for &strategy in strategies {
            reports.push(run_trial(strategy, config)?);
        }
    }
    Ok(reports)
}

fn run_worker(
    source: BufferSource<'_>,
    config: &TrialConfig,
    worker: usize,
    next: &AtomicUsize,
) -> Result<Vec<(usize, f64)>> {
    let seed = config.seed.wrapping_add((worker as u64 + 1).wrapping_mul(SEED_STRIDE));
    let mut rng = XorShift64::new(seed);
    let mut out = Vec::new();

    loop {
        let index = next.fetch_add(1, Ordering::Relaxed);
        if index >= config.iterations {
            break;
        }
        let avg = source.with_buffer(config.count, |bytes| {
            rng.fill_bytes(bytes);
            average_byte(bytes)
        })?;
        out.push((index, avg));
    }

    Ok(out)
}
