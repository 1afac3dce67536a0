use anyhow::Result;
use callprof::{cli::Cli, global};
use clap::Parser;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Sleep for a fixed time inside one profiled region
#[inline(never)]
fn sleepy(sleep: Duration) -> Result<()> {
    let handle = global::enter()?;
    thread::sleep(sleep);
    global::exit(handle)?;
    Ok(())
}

/// Recurse through one call site, nesting a region per level
#[inline(never)]
fn recurse(depth: u32) -> Result<u64> {
    callprof::profile_scope!();
    if depth == 0 {
        return Ok(1);
    }
    Ok(1 + recurse(depth - 1)?)
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);

    global::initialize()?;

    let sleep = Duration::from_millis(args.sleep_ms);
    for _ in 0..args.calls {
        sleepy(sleep)?;
    }

    if args.depth > 0 {
        let frames = recurse(args.depth)?;
        tracing::debug!(frames, "recursive workload done");
    }

    global::finalize()?;
    Ok(())
}
