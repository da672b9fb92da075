//! Error types and handling for scraper-core operations.
//!
//! Every fallible operation in this crate returns [`Result<T>`]. Errors are
//! grouped by the layer that produced them:
//!
//! - **Configuration**: the home directory could not be resolved
//! - **Bucket**: unsupported URI schemes, invalid keys, storage failures
//! - **Request**: malformed URLs or method tokens
//! - **Transport**: network failures, browser detection and execution
//!
//! ```rust
//! use scraper_core::{Error, Request};
//!
//! match Request::new("GET", "not a url") {
//!     Err(Error::InvalidUrl(msg)) => eprintln!("bad url: {msg}"),
//!     Err(e) => eprintln!("other error: {e}"),
//!     Ok(_) => unreachable!(),
//! }
//! ```

use thiserror::Error;

/// The main error type for scraper-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network operation failed.
    ///
    /// Connection failures, TLS errors and transport-level timeouts. A
    /// non-success HTTP status is never reported through this variant.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The user's home directory could not be determined.
    ///
    /// Default configuration paths derive from it, so this is unrecoverable.
    #[error("unable to determine the home directory")]
    HomeDirUnavailable,

    /// URL is malformed or invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP method token is not valid.
    #[error("Invalid method: {0:?}")]
    InvalidMethod(String),

    /// Bucket URI uses a scheme this build cannot open.
    #[error("unsupported bucket scheme: {0}")]
    UnsupportedScheme(String),

    /// Blob key is empty, absolute, or escapes the bucket root.
    #[error("invalid blob key: {0:?}")]
    InvalidKey(String),

    /// Storage operation failed beyond basic file I/O.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization of a stored page failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// No headless browser executable could be found.
    #[error("no headless browser found (tried {0}); set SCRAPER_BROWSER to override")]
    BrowserNotFound(String),

    /// The browser transport cannot perform this request.
    #[error("browser transport does not support method {0}")]
    BrowserUnsupportedMethod(String),

    /// The headless browser ran but did not produce a page.
    #[error("browser fetch of {url} failed: {reason}")]
    BrowserFailed {
        /// URL that was requested.
        url: String,
        /// Reason for the failure.
        reason: String,
    },

    /// Operation timed out.
    #[error("Timeout: {0}")]
    Timeout(String),
}

impl Error {
    /// Short category label, used in structured log fields.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::HomeDirUnavailable => "config",
            Self::InvalidUrl(_) | Self::InvalidMethod(_) => "request",
            Self::UnsupportedScheme(_) | Self::InvalidKey(_) | Self::Storage(_) => "bucket",
            Self::Serialization(_) => "serialization",
            Self::BrowserNotFound(_)
            | Self::BrowserUnsupportedMethod(_)
            | Self::BrowserFailed { .. } => "browser",
            Self::Timeout(_) => "timeout",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
