//! Per-trial heap accounting with the counting allocator installed.
//!
//! Kept to a single test so no other test in this binary allocates while a
//! trial is being measured.

use poolbench::harness::{run_trial, CountingAllocator, Strategy, TrialConfig};
use poolbench::PoolConfig;

#[global_allocator]
static GLOBAL_ALLOC: CountingAllocator = CountingAllocator;

#[test]
fn test_pooled_and_stack_allocate_far_less_than_baseline() {
    let config = TrialConfig {
        count: 4096,
        iterations: 500,
        concurrency: 1,
        seed: 7,
        pool: PoolConfig::default(),
    };
    let baseline_floor = (config.iterations * config.count) as u64;

    let baseline = run_trial(Strategy::Baseline, &config).unwrap();
    assert!(baseline.alloc.allocs >= config.iterations as u64);
    assert!(baseline.alloc.bytes >= baseline_floor);

    for strategy in [Strategy::SizeClassPooled, Strategy::SharedPooled, Strategy::Stack] {
        let report = run_trial(strategy, &config).unwrap();
        assert!(
            report.alloc.bytes < baseline_floor / 10,
            "{} allocated {} bytes",
            strategy,
            report.alloc.bytes
        );
        assert!(report.alloc.allocs < config.iterations as u64);
    }
}
