//! Entrypoint for the `scraper` binary.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match scraper_cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        },
    }
}
