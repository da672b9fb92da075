#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

/// Isolated home, bucket and cache directories for one test.
pub struct Sandbox {
    temp: TempDir,
}

#[allow(dead_code)]
impl Sandbox {
    pub fn new() -> Self {
        Self {
            temp: tempfile::tempdir().expect("failed to create sandbox dir"),
        }
    }

    pub fn home(&self) -> PathBuf {
        self.temp.path().join("home")
    }

    pub fn bucket_dir(&self) -> PathBuf {
        self.temp.path().join("bucket")
    }

    pub fn bucket_url(&self) -> String {
        format!("file://{}", self.bucket_dir().display())
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.temp.path().join("cache")
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// A `scraper` command with HOME and XDG_CONFIG_HOME inside the sandbox.
    pub fn cmd(&self) -> Command {
        let home = self.home();
        std::fs::create_dir_all(&home).unwrap();
        let mut cmd = scraper_cmd();
        cmd.env("HOME", &home);
        cmd.env("XDG_CONFIG_HOME", home.join(".config"));
        cmd
    }

    /// Like [`Sandbox::cmd`], with the bucket and cache pinned explicitly.
    pub fn do_cmd(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("-b")
            .arg(self.bucket_url())
            .arg("--cache-dir")
            .arg(self.cache_dir())
            .arg("do");
        cmd
    }
}

/// Create a `scraper` command suitable for integration tests.
#[allow(dead_code)]
pub fn scraper_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("scraper"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env("NO_PROXY", "127.0.0.1,localhost");
    cmd.env_remove("HTTP_PROXY");
    cmd.env_remove("http_proxy");
    cmd.env_remove("SCRAPER_BROWSER");
    cmd
}
