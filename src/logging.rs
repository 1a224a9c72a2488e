// src/logging.rs
// =============================================================================
// Logger setup. Called once from main before anything else runs.
//
// Level: INFO by default, DEBUG with --verbose, and RUST_LOG (when set)
// overrides both, e.g. RUST_LOG=js_harvest=trace,reqwest=debug.
//
// Every record is printed on a single line. Error chains and reqwest
// messages sometimes contain newlines; folding them keeps one event per
// line for grep and log shippers.
// =============================================================================

use env_logger::{Builder, Env};
use log::{LevelFilter, SetLoggerError};
use std::io::Write;

pub fn init_logger(verbose: bool) -> Result<(), SetLoggerError> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .filter_module("html5ever", LevelFilter::Error)
        .filter_module("selectors", LevelFilter::Warn)
        .filter_module("hyper", LevelFilter::Info)
        .filter_module("reqwest", LevelFilter::Info)
        .parse_env(Env::default())
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}: {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                one_line(&record.args().to_string())
            )
        });

    builder.try_init()
}

fn one_line(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}
