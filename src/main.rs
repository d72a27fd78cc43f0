use std::io::Write;

use poolbench::harness::{run_all, summarize, write_summary, Config, CountingAllocator};

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[global_allocator]
static GLOBAL_ALLOC: CountingAllocator = CountingAllocator;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse_args();

    let log_level = match config.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("poolbench v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: count={}, iterations={}, concurrency={}, trials={}, oversize={:?}",
        config.count, config.iterations, config.concurrency, config.trials, config.oversize
    );

    let strategies = config.strategies();
    let reports = run_all(&strategies, &config.trial_config(), config.trials)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for report in &reports {
        writeln!(out, "{}", report)?;
    }
    writeln!(out)?;
    write_summary(&mut out, &summarize(&reports))?;

    Ok(())
}
