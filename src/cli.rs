//! CLI argument parsing for the callprof demo workload

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "callprof")]
#[command(version)]
#[command(
    about = "Run an instrumented workload and print the call-site profile",
    long_about = None
)]
pub struct Cli {
    /// Number of sequential calls to the sleeping function
    #[arg(short = 'n', long = "calls", value_name = "N", default_value = "3")]
    pub calls: u32,

    /// Time each call sleeps, in milliseconds
    #[arg(short = 's', long = "sleep-ms", value_name = "MS", default_value = "10")]
    pub sleep_ms: u64,

    /// Recursion depth of the recursive workload (0 disables it)
    #[arg(short = 'd', long = "depth", value_name = "D", default_value = "0")]
    pub depth: u32,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
