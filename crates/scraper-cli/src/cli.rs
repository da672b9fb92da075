//! # CLI Structure and Argument Parsing
//!
//! The CLI follows a command-subcommand pattern built on `clap` derive macros:
//!
//! - **Global options**: storage and logging flags accepted by every command
//! - **Subcommands**: currently `do`, which fetches a single URL
//!
//! ## Usage Patterns
//!
//! ```bash
//! # Fetch a page (served from the bucket on repeat runs)
//! scraper do https://example.com
//!
//! # Headers only, like curl -I
//! scraper do -I https://example.com
//!
//! # Render through a headless browser and replace the cached copy
//! scraper do -B -f https://example.com
//!
//! # Debug logs, written as JSON lines once stderr is redirected
//! scraper -L debug do https://example.com 2> scrape.log
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure for the `scraper` command
#[derive(Parser, Clone, Debug)]
#[command(name = "scraper")]
#[command(version)]
#[command(about = "Scraper is a tool to scrape a url", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Flags shared by every subcommand.
///
/// Storage and logging values are optional here so that the runtime
/// configuration merge can tell "not given" apart from an explicit value.
#[derive(Args, Clone, Debug, Default)]
pub struct GlobalArgs {
    /// Bucket URL; supported protocols (no scheme is rel file path): file|s3://
    /// [default: file://<config root>/bucket]
    #[arg(short = 'b', long, global = true, value_name = "URL")]
    pub bucket_url: Option<String>,

    /// Directory to cache files [default: <config root>/cache]
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Do not use the local cache directory
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Logging level: trace|debug|info|warn|error|fatal|panic [default: fatal]
    #[arg(short = 'L', long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Logging format: auto|console [default: auto]
    #[arg(short = 'F', long, global = true, value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// Logging color: auto|always|never [default: auto]
    #[arg(short = 'c', long, global = true, value_name = "WHEN")]
    pub log_color: Option<String>,

    /// Always log with color (overrides --log-color)
    #[arg(short = 'C', long, global = true)]
    pub log_color_always: bool,
}

/// Available subcommands for the `scraper` CLI
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Do scrapes the given url
    Do(DoArgs),
}

/// Arguments for `scraper do`.
#[derive(Args, Clone, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct DoArgs {
    /// URL to scrape
    #[arg(value_name = "URL")]
    pub url: String,

    /// Use browser automation
    #[arg(short = 'B', long)]
    pub browser: bool,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// Force a refetch, replacing any cached page
    #[arg(short = 'f', long)]
    pub force_refetch: bool,

    /// Include request and response headers in the output
    #[arg(short = 'i', long)]
    pub include: bool,

    /// Send a HEAD request, implies -i
    #[arg(short = 'I', long)]
    pub head: bool,
}
