//! Logging initialization and configuration.
//!
//! The logger is configured along three independent axes:
//!
//! - **Level**: one of `trace`, `debug`, `info`, `warn`, `error`, `fatal`,
//!   `panic`; anything else is rejected
//! - **Format**: `auto` renders for humans when stderr is a terminal and as
//!   JSON lines otherwise; `console` always renders for humans
//! - **Color**: only used for human rendering; `auto` follows stderr
//!   terminal detection, `always` and `never` force it
//!
//! [`LoggerSettings::resolve`] is pure. [`initialize_logging`] installs the
//! resulting dispatcher as the process-wide default exactly once and returns
//! a [`LogContext`] carrying the same dispatcher, so async work can be run
//! under it explicitly.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use tracing::Dispatch;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;

use crate::output::detect::is_stderr_interactive;
use crate::utils::settings::RuntimeConfig;

/// Log severity accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Everything.
    Trace,
    /// Debugging detail.
    Debug,
    /// Progress and status codes.
    Info,
    /// Recoverable oddities.
    Warn,
    /// Failures, including HTTP error statuses.
    Error,
    /// Only unrecoverable conditions.
    Fatal,
    /// Only panics.
    Panic,
}

impl LogLevel {
    /// Filter applied to `tracing` events.
    ///
    /// `tracing` stops at ERROR. Fatal and panic conditions end the process
    /// through the error path rather than as events, so both filter out every
    /// event.
    #[must_use]
    pub const fn level_filter(self) -> LevelFilter {
        match self {
            Self::Trace => LevelFilter::TRACE,
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warn => LevelFilter::WARN,
            Self::Error => LevelFilter::ERROR,
            Self::Fatal | Self::Panic => LevelFilter::OFF,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
            Self::Panic => "panic",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Self::Trace,
            "debug" => Self::Debug,
            "info" => Self::Info,
            "warn" => Self::Warn,
            "error" => Self::Error,
            "fatal" => Self::Fatal,
            "panic" => Self::Panic,
            _ => bail!(
                "invalid log level {s:?} (expected trace|debug|info|warn|error|fatal|panic)"
            ),
        })
    }
}

/// How events are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Console,
    /// One JSON object per line.
    Json,
}

/// Resolved logger configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggerSettings {
    /// Minimum severity.
    pub level: LogLevel,
    /// Rendering.
    pub format: LogFormat,
    /// ANSI colors; always `false` for JSON.
    pub color: bool,
}

impl LoggerSettings {
    /// Resolve the format and color axes against terminal detection.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown format.
    pub fn resolve(
        level: LogLevel,
        format: &str,
        color: &str,
        stderr_is_terminal: bool,
    ) -> Result<Self> {
        let format = resolve_format(format, stderr_is_terminal)?;
        let color = format == LogFormat::Console && resolve_color(color, stderr_is_terminal);
        Ok(Self {
            level,
            format,
            color,
        })
    }
}

fn resolve_format(format: &str, stderr_is_terminal: bool) -> Result<LogFormat> {
    match format.trim().to_ascii_lowercase().as_str() {
        "" | "auto" => Ok(if stderr_is_terminal {
            LogFormat::Console
        } else {
            LogFormat::Json
        }),
        "console" => Ok(LogFormat::Console),
        _ => bail!("unknown log format: {format:?}"),
    }
}

fn resolve_color(color: &str, stderr_is_terminal: bool) -> bool {
    match color.trim().to_ascii_lowercase().as_str() {
        "" | "auto" => stderr_is_terminal,
        "always" => true,
        // "never" and anything unrecognized
        _ => false,
    }
}

/// Build a dispatcher for `settings` writing to stderr.
#[must_use]
pub fn build_dispatch(settings: &LoggerSettings) -> Dispatch {
    build_dispatch_with_writer(settings, std::io::stderr)
}

/// Build a dispatcher for `settings` writing to `writer`.
pub fn build_dispatch_with_writer<W>(settings: &LoggerSettings, writer: W) -> Dispatch
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_max_level(settings.level.level_filter())
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    match settings.format {
        LogFormat::Json => Dispatch::new(builder.with_ansi(false).json().finish()),
        LogFormat::Console => Dispatch::new(builder.with_ansi(settings.color).finish()),
    }
}

/// The installed logger, threaded through command execution.
#[derive(Clone)]
pub struct LogContext {
    dispatch: Dispatch,
    settings: LoggerSettings,
}

impl LogContext {
    /// Dispatcher carrying the configured subscriber.
    #[must_use]
    pub const fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Settings the logger was built from.
    #[must_use]
    pub const fn settings(&self) -> &LoggerSettings {
        &self.settings
    }
}

impl fmt::Debug for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Initialize the logging subsystem from the resolved configuration.
///
/// Nothing is logged before the settings are fully resolved.
///
/// # Errors
///
/// Returns an error for an unknown log format, or if a global subscriber was
/// already installed.
pub fn initialize_logging(config: &RuntimeConfig) -> Result<LogContext> {
    let settings = LoggerSettings::resolve(
        config.log_level,
        &config.log_format,
        &config.log_color,
        is_stderr_interactive(),
    )?;
    let dispatch = build_dispatch(&settings);
    tracing::dispatcher::set_global_default(dispatch.clone())?;
    Ok(LogContext { dispatch, settings })
}
