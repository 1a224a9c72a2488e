// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The URLs themselves come from stdin, one per line. Everything else is an
// option, and every option can also be set through an environment variable
// (flags win over the environment, the environment wins over defaults):
//
//   cat urls.txt | js-harvest -c 10 -o scripts.json
//   LIMIT_OF_ATTEMPTS_TO_RETRY=2 js-harvest < urls.txt
// =============================================================================

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{
    ConfigError, FetchConfig, DEFAULT_CONCURRENCY_LIMIT, DEFAULT_OUTPUT_FILE, DEFAULT_RETRY_LIMIT,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

#[derive(Parser, Debug)]
#[command(
    name = "js-harvest",
    version,
    about = "Collects the JavaScript files linked from a set of pages",
    long_about = "js-harvest reads page URLs from stdin, fetches them concurrently, and writes \
                  the .js links it finds as JSON. Links present on every page are grouped \
                  under a single \"root\" entry; each page keeps only the links unique to it."
)]
pub struct Cli {
    /// Print debug messages
    #[arg(short, long, env = "DEFAULT_DEBUGGING")]
    pub verbose: bool,

    /// File the reconciled results are written to
    #[arg(short, long, env = "RESULT_FILE_NAME", default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Also write per-URL fetch results (status, error, links) to this file
    #[arg(long, env = "RAW_RESULT_FILE_NAME")]
    pub raw_output: Option<PathBuf>,

    /// Maximum number of pages fetched at the same time
    #[arg(
        short,
        long,
        env = "SIMULTANEOUS_CONCURRENT_TASKS",
        default_value_t = DEFAULT_CONCURRENCY_LIMIT,
        value_parser = parse_positive
    )]
    pub concurrency: usize,

    /// Attempts per URL before a network failure is reported
    #[arg(
        short,
        long,
        env = "LIMIT_OF_ATTEMPTS_TO_RETRY",
        default_value_t = DEFAULT_RETRY_LIMIT,
        value_parser = parse_positive
    )]
    pub retries: usize,

    /// Per-request timeout in seconds
    #[arg(
        short,
        long,
        env = "TIMEOUT_DEFAULT",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long, env = "USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Accept invalid TLS certificates
    #[arg(long, env = "ACCEPT_INVALID_CERTS")]
    pub insecure: bool,
}

// Accepts integers >= 1, so a zero limit never reaches the engine
fn parse_positive(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

impl Cli {
    pub fn fetch_config(&self) -> Result<FetchConfig, ConfigError> {
        let config = FetchConfig::new(
            self.concurrency,
            self.retries,
            Duration::from_secs(self.timeout),
            self.user_agent.as_str(),
        )?;
        Ok(config.with_invalid_certs(self.insecure))
    }
}
