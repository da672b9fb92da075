//! Headless browser transport.
//!
//! Pages are rendered by a Chromium-family browser running in headless mode
//! and the serialized DOM becomes the response body:
//!
//! ```text
//! <browser> --headless --disable-gpu --dump-dom <url>
//! ```
//!
//! The executable is taken from `SCRAPER_BROWSER` when set, otherwise the
//! first of [`BROWSER_CANDIDATES`] found on `PATH`. Browsers do not expose the
//! HTTP status of the navigation, so a successful render is reported as 200.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::OnceCell;
use tracing::instrument;

use crate::page::{Headers, PageRequest, PageResponse, push_header};
use crate::transport::Transport;
use crate::{Error, Page, Request, Result};

/// Environment variable naming the browser executable explicitly.
pub const BROWSER_ENV: &str = "SCRAPER_BROWSER";

/// Executables probed on `PATH`, in order.
pub const BROWSER_CANDIDATES: &[&str] =
    &["chromium", "chromium-browser", "google-chrome", "chrome"];

/// Default timeout for a single render (60 seconds).
const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(60);

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Browser transport. Detection happens on first use and is remembered.
#[derive(Debug, Default)]
pub struct BrowserTransport {
    executable: OnceCell<PathBuf>,
    timeout: Option<Duration>,
}

impl BrowserTransport {
    /// Create a transport that detects its browser lazily.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific executable instead of detecting one.
    #[must_use]
    pub fn with_executable(path: impl Into<PathBuf>) -> Self {
        Self {
            executable: OnceCell::new_with(Some(path.into())),
            timeout: None,
        }
    }

    /// Set the timeout for a render.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn executable(&self) -> Result<&Path> {
        self.executable
            .get_or_try_init(detect_browser)
            .await
            .map(PathBuf::as_path)
    }
}

#[async_trait]
impl Transport for BrowserTransport {
    fn name(&self) -> &'static str {
        "browser"
    }

    #[instrument(level = "debug", skip(self, request), fields(url = %request.url()))]
    async fn fetch(&self, request: &Request) -> Result<Page> {
        if *request.method() != reqwest::Method::GET {
            return Err(Error::BrowserUnsupportedMethod(request.method().to_string()));
        }

        let url = request.url().as_str();
        let executable = self.executable().await?;
        let timeout = self.timeout.unwrap_or(DEFAULT_RENDER_TIMEOUT);
        let args = ["--headless", "--disable-gpu", "--dump-dom", url];

        tracing::debug!(
            path = %executable.display(),
            ?args,
            "Executing headless browser"
        );

        let mut command = Command::new(executable);
        command.args(args).kill_on_drop(true);
        let output = match tokio::time::timeout(timeout, command.output()).await {
            Ok(result) => result.map_err(|e| Error::BrowserFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?,
            Err(_) => {
                return Err(Error::Timeout(format!(
                    "browser render of {url} timed out after {}s",
                    timeout.as_secs()
                )));
            },
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(stderr = %stderr.trim(), "headless browser exited with failure");
            return Err(Error::BrowserFailed {
                url: url.to_string(),
                reason: format!("browser exited with {}", output.status),
            });
        }

        let mut sent = Headers::new();
        for (name, values) in request.header() {
            sent.insert(name.clone(), values.clone());
        }
        let mut header = Headers::new();
        push_header(&mut header, "content-type", HTML_CONTENT_TYPE);

        Ok(Page::new(
            PageRequest {
                method: request.method().to_string(),
                url: url.to_string(),
                header: sent,
            },
            PageResponse {
                status_code: 200,
                header,
                body: output.stdout,
            },
        ))
    }
}

/// Find the browser executable to use.
async fn detect_browser() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(BROWSER_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    for candidate in BROWSER_CANDIDATES {
        if let Some(path) = find_on_path(candidate).await {
            return Ok(path);
        }
    }
    Err(Error::BrowserNotFound(BROWSER_CANDIDATES.join(", ")))
}

/// Resolve `name` via `which` (`where` on Windows).
async fn find_on_path(name: &str) -> Option<PathBuf> {
    #[cfg(windows)]
    let which_cmd = "where";
    #[cfg(not(windows))]
    let which_cmd = "which";

    let output = Command::new(which_cmd).arg(name).output().await.ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(PathBuf::from)
}
