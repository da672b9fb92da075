//! scraper CLI - fetch a URL through a cached, blob-backed store
//!
//! Startup is strictly ordered: parse flags, locate the configuration root,
//! merge the runtime configuration, install the logger, then dispatch the
//! command. Nothing is logged before the logger exists.
use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use scraper_core::ConfigPaths;
use std::process;
use tracing::debug;

mod cli;
mod commands;
mod output;
mod utils;

use crate::utils::{LogContext, RuntimeConfig, initialize_logging};
use cli::{Cli, Commands};

/// Execute the scraper CLI with the current process arguments and
/// environment.
///
/// # Errors
///
/// Returns an error if configuration, logging setup, or the command fails.
pub async fn run() -> Result<()> {
    let cli = parse_cli();

    let paths = ConfigPaths::discover().context("failed to resolve config root")?;
    let config = RuntimeConfig::resolve(&paths, &cli.global)?;
    let log = initialize_logging(&config)?;
    debug!(?config, logger = ?log.settings(), "resolved runtime configuration");

    execute_command(cli, &config, &log).await
}

/// Parse the process arguments.
///
/// Help and version requests print to stdout and exit 0; every usage error
/// prints clap's message to stderr and exits 1, like any other failure.
fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            process::exit(usage_exit_code(&err));
        },
    }
}

/// 0 for help/version output, 1 for everything clap rejects.
fn usage_exit_code(err: &clap::Error) -> i32 {
    i32::from(err.use_stderr())
}

async fn execute_command(cli: Cli, config: &RuntimeConfig, log: &LogContext) -> Result<()> {
    match cli.command {
        Some(Commands::Do(args)) => commands::scrape(&args, config, log).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        },
    }
}
