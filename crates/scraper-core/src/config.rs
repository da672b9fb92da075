//! Configuration root resolution.
//!
//! All default on-disk locations hang off a single platform-specific
//! configuration root:
//!
//! - Linux: `$XDG_CONFIG_HOME/scraper` when set and non-empty, otherwise
//!   `~/.config/scraper`
//! - macOS: `~/Library/Preferences/scraper`
//! - Everything else: `~/.config/scraper`
//!
//! [`config_root`] is a pure function of its inputs; [`ConfigPaths::discover`]
//! feeds it the values of the running process.
//!
//! ```rust
//! use scraper_core::config::{Os, config_root};
//! use std::path::Path;
//!
//! let root = config_root(Os::MacOs, Path::new("/Users/ada"), None);
//! assert_eq!(root, Path::new("/Users/ada/Library/Preferences/scraper"));
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Directory name used under every configuration root.
pub const APP_NAME: &str = "scraper";

/// Environment variable consulted on Linux to relocate the configuration root.
pub const XDG_CONFIG_HOME: &str = "XDG_CONFIG_HOME";

/// Host operating system classification for path resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Linux, the only branch that honours `XDG_CONFIG_HOME`.
    Linux,
    /// macOS.
    MacOs,
    /// Anything else.
    Other,
}

impl Os {
    /// Classification of the OS this binary was compiled for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Other
        }
    }
}

/// Compute the configuration root for `os` and `home`.
///
/// `xdg_config_home` is only looked at on [`Os::Linux`]; an empty value is
/// treated as unset.
#[must_use]
pub fn config_root(os: Os, home: &Path, xdg_config_home: Option<&OsStr>) -> PathBuf {
    match os {
        Os::Linux => match xdg_config_home {
            Some(xdg) if !xdg.is_empty() => Path::new(xdg).join(APP_NAME),
            _ => home.join(".config").join(APP_NAME),
        },
        Os::MacOs => home.join("Library").join("Preferences").join(APP_NAME),
        Os::Other => home.join(".config").join(APP_NAME),
    }
}

/// Default locations derived from the configuration root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    root: PathBuf,
}

impl ConfigPaths {
    /// Wrap an already-resolved configuration root.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the configuration root for the running process.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HomeDirUnavailable`] when the home directory cannot be
    /// determined.
    pub fn discover() -> Result<Self> {
        let dirs = directories::BaseDirs::new().ok_or(Error::HomeDirUnavailable)?;
        let xdg = std::env::var_os(XDG_CONFIG_HOME);
        Ok(Self::new(config_root(
            Os::current(),
            dirs.home_dir(),
            xdg.as_deref(),
        )))
    }

    /// The configuration root itself.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Default bucket URL: `file://{root}/bucket`.
    #[must_use]
    pub fn default_bucket_url(&self) -> String {
        format!("file://{}", self.root.join("bucket").display())
    }

    /// Default local cache directory: `{root}/cache`.
    #[must_use]
    pub fn default_cache_dir(&self) -> PathBuf {
        self.root.join("cache")
    }
}
