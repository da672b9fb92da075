//! Runtime configuration merge.
//!
//! Every configuration axis is resolved by one explicit, ordered merge:
//!
//! 1. **Built-in defaults** (`fatal`, `auto`, `auto`, cache enabled)
//! 2. **Configuration root** (default bucket URL and cache directory)
//! 3. **Command-line flags** (highest priority)

use std::path::PathBuf;

use anyhow::Result;
use scraper_core::ConfigPaths;

use crate::cli::GlobalArgs;
use crate::utils::logging::LogLevel;

/// Default log level: only fatal conditions.
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Fatal;
/// Default log format: decided by terminal detection.
pub const DEFAULT_LOG_FORMAT: &str = "auto";
/// Default log color: decided by terminal detection.
pub const DEFAULT_LOG_COLOR: &str = "auto";

/// Fully resolved configuration for one invocation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Bucket URI handed to the blob layer.
    pub bucket_url: String,
    /// Local cache directory.
    pub cache_dir: PathBuf,
    /// Whether the local cache directory is used at all.
    pub cache_enabled: bool,
    /// Minimum log severity.
    pub log_level: LogLevel,
    /// Raw log format (`auto`, `console`, ...); validated by the logger.
    pub log_format: String,
    /// Raw log color (`auto`, `always`, `never`).
    pub log_color: String,
}

impl RuntimeConfig {
    /// Merge defaults, the configuration root and the flags.
    ///
    /// # Errors
    ///
    /// Returns an error when `--log-level` is not a known level.
    pub fn resolve(paths: &ConfigPaths, flags: &GlobalArgs) -> Result<Self> {
        // Layer 1 + 2: defaults and configuration-root-derived paths.
        let mut config = Self {
            bucket_url: paths.default_bucket_url(),
            cache_dir: paths.default_cache_dir(),
            cache_enabled: true,
            log_level: DEFAULT_LOG_LEVEL,
            log_format: DEFAULT_LOG_FORMAT.to_string(),
            log_color: DEFAULT_LOG_COLOR.to_string(),
        };

        // Layer 3: flags.
        if let Some(url) = &flags.bucket_url {
            config.bucket_url.clone_from(url);
        }
        if let Some(dir) = &flags.cache_dir {
            config.cache_dir.clone_from(dir);
        }
        if flags.no_cache {
            config.cache_enabled = false;
        }
        if let Some(level) = &flags.log_level {
            config.log_level = level.parse()?;
        }
        if let Some(format) = &flags.log_format {
            config.log_format.clone_from(format);
        }
        if let Some(color) = &flags.log_color {
            config.log_color.clone_from(color);
        }
        if flags.log_color_always {
            config.log_color = "always".to_string();
        }

        Ok(config)
    }
}
