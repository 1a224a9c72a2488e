// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments (and their environment fallbacks)
// 2. Set up logging
// 3. Read URLs from stdin
// 4. Run the scan pipeline
// 5. Write the JSON artifact(s)
// 6. Exit with proper code (0 = success, 2 = error)
//
// Fetch failures are NOT errors at this level: they are recorded per URL in
// the raw artifact. Exit code 2 means the run itself could not complete
// (bad configuration, unreadable stdin, unwritable output...).
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;       // src/cli.rs - command-line parsing
mod config;    // src/config.rs - defaults and validated fetch settings
mod fetch;     // src/fetch/ - bounded, retrying HTTP fetches
mod input;     // src/input.rs - reading URLs from stdin
mod links;     // src/links/ - extension filtering, extraction, reconciliation
mod logging;   // src/logging.rs - env_logger setup
mod output;    // src/output.rs - JSON records and file writing
mod pipeline;  // src/pipeline.rs - the stages wired together

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use fetch::FetchEngine;
use std::time::Instant;
use tokio::io::BufReader;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logger(cli.verbose) {
        eprintln!("Error: failed to initialize logger: {e}");
        std::process::exit(2);
    }

    let started = Instant::now();
    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            log::error!("Failed with: {e:#}");
            2
        }
    };
    log::debug!("Time consumption: {:.3}s", started.elapsed().as_secs_f64());

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<()> {
    log::debug!("Main started");

    let config = cli.fetch_config().context("Invalid configuration")?;
    let engine = FetchEngine::new(config).context("Invalid configuration")?;

    let urls = input::read_urls(BufReader::new(tokio::io::stdin()))
        .await
        .context("Failed to read URLs from stdin")?;

    if urls.is_empty() {
        log::warn!("No URLs on stdin, writing an empty result");
    } else {
        log::info!("Scanning {} URL(s)", urls.len());
    }

    let outcome = pipeline::scan(&engine, urls).await?;

    log::info!(
        "Fetched {} page(s), {} failed, {} reconciled entr{}",
        outcome.fetched.len(),
        outcome.failed(),
        outcome.reconciled.len(),
        if outcome.reconciled.len() == 1 { "y" } else { "ies" }
    );

    if let Some(root) = outcome.reconciled.iter().find(|page| page.is_root()) {
        log::debug!(
            "{} link(s) shared by every page, listed under \"{}\"",
            root.links.len(),
            links::ROOT_URL
        );
    }

    if let Some(path) = &cli.raw_output {
        output::write_json(path, &output::fetch_records(&outcome.fetched))?;
    }

    let records = output::reconciled_records(outcome.reconciled);
    output::write_json(&cli.output, &records)?;
    log::info!("Results saved in {}", cli.output.display());

    Ok(())
}
