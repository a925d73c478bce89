use clap::Parser;
use std::time::Duration;

use super::defaults::{DEFAULT_CONCURRENCY, DEFAULT_REQUESTS};
use super::parsers::{
    parse_bool_env, parse_duration_arg, parse_positive_u64, parse_positive_usize,
};
use super::types::{DumpDelimiter, OutputFormat, PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Concurrent HTTP load generator - fixed request budget, bounded worker pool, streaming latency stats, and per-request trace dumps."
)]
pub struct WrkArgs {
    /// Fully qualified target URL (query parameters included)
    #[arg(long, short)]
    pub url: Option<String>,

    /// JSON file with a list of requests ({url, method, body}); used when the file exists
    #[arg(long, short)]
    pub file: Option<String>,

    /// Number of concurrent workers
    #[arg(
        long = "concurrent",
        short = 'c',
        alias = "concurrency",
        default_value = DEFAULT_CONCURRENCY,
        value_parser = parse_positive_usize
    )]
    pub concurrent: PositiveUsize,

    /// Total number of requests to send in URL mode
    #[arg(
        long = "requests",
        short = 'n',
        alias = "request",
        default_value = DEFAULT_REQUESTS,
        value_parser = parse_positive_u64
    )]
    pub requests: PositiveU64,

    /// Attach a timestamp query parameter to every request to defeat caches
    #[arg(long)]
    pub unique: bool,

    /// Write one row per request to this file
    #[arg(long)]
    pub dump: Option<String>,

    /// Column delimiter for the dump file
    #[arg(long = "dump-delimiter", default_value = "tab", ignore_case = true)]
    pub dump_delimiter: DumpDelimiter,

    /// Per-request timeout (supports ms/s/m/h); unset keeps the client default
    #[arg(long = "timeout", value_parser = parse_duration_arg)]
    pub request_timeout: Option<Duration>,

    /// Timeout for establishing a new connection (supports ms/s/m/h)
    #[arg(long = "connect-timeout", value_parser = parse_duration_arg)]
    pub connect_timeout: Option<Duration>,

    /// Summary output format
    #[arg(long = "output-format", default_value = "text", ignore_case = true)]
    pub output_format: OutputFormat,

    /// Path to config file (TOML or JSON)
    #[arg(long)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}
