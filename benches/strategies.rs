use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use poolbench::harness::{run_trial, CountingAllocator, Strategy, TrialConfig};
use poolbench::SizeClassPool;

#[global_allocator]
static GLOBAL_ALLOC: CountingAllocator = CountingAllocator;

/// Whole trials per strategy across thread counts, like the CLI runs them.
fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("average_bytes");

    for concurrency in [1usize, 4, 8] {
        let config = TrialConfig {
            count: 2048,
            iterations: 100,
            concurrency,
            ..Default::default()
        };
        group.throughput(Throughput::Elements(config.iterations as u64));

        for strategy in Strategy::ALL {
            group.bench_with_input(
                BenchmarkId::new(strategy.name(), concurrency),
                &config,
                |b, config| {
                    b.iter(|| black_box(run_trial(strategy, config).unwrap()));
                },
            );
        }
    }

    group.finish();
}

/// Single-threaded rent/return round trip against a plain allocation.
fn bench_rent_return(c: &mut Criterion) {
    let mut group = c.benchmark_group("rent_return");
    group.throughput(Throughput::Elements(1));

    for size in [16usize, 512, 2048, 8192] {
        let pool = SizeClassPool::new();
        group.bench_with_input(BenchmarkId::new("pool", size), &size, |b, &size| {
            b.iter(|| {
                let buf = pool.rent(black_box(size)).unwrap();
                pool.give_back(black_box(buf)).unwrap();
            });
        });

        group.bench_with_input(BenchmarkId::new("alloc", size), &size, |b, &size| {
            b.iter(|| black_box(vec![0u8; black_box(size)]));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_strategies, bench_rent_return);
criterion_main!(benches);
