//! # pliptab
//!
//! **CLI Binary**
//!
//! Entry point for the `pliptab` command-line application. It runs PLIP over
//! every structure file in a folder and writes one table of interaction
//! counts.
//!
//! ## Responsibilities
//! * Parse command line arguments
//! * Set up logging
//! * Resolve settings and drive the [`pipeline`]
//! * Handle errors and exit codes
//!
//! This crate should contain minimal business logic.

mod error_hints;
pub mod pipeline;

use std::io::IsTerminal;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pliptab_config::Cli;
use pliptab_settings::{RetryPolicy, RunSettings};

pub use pipeline::{FailureKind, FileFailure, RunOutcome, RunSummary};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = resolve_settings(&cli)?;
    let outcome = pipeline::run(&settings)?;

    println!(
        "Combined interaction counts have been written to {}",
        outcome.output.display()
    );
    println!(
        "{} of {} files processed, {} skipped, {} retried",
        outcome.summary.processed(),
        outcome.summary.discovered,
        outcome.summary.skipped.len(),
        outcome.summary.retries
    );
    Ok(())
}

/// Render a top-level error with any hints that apply.
pub fn format_error(err: &anyhow::Error) -> String {
    error_hints::format(err)
}

/// Turn parsed arguments into validated run settings.
pub fn resolve_settings(cli: &Cli) -> Result<RunSettings> {
    let retry = RetryPolicy::new(cli.attempts.clone()).context("Invalid --attempts")?;
    let settings = RunSettings {
        output: cli.output.clone(),
        order: cli.order,
        timeout: cli.timeout.map(Duration::from_secs),
        retry,
        tool: cli.tool.clone(),
        progress: !cli.no_progress,
        ..RunSettings::for_folder(&cli.folder)
    };
    settings.validate().context("Invalid settings")?;
    Ok(settings)
}

/// Diagnostics go to stderr. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}
