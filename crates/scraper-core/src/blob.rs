//! Blob bucket backing the page cache.
//!
//! A bucket is opened from a URI:
//!
//! | URI                 | Backend                              |
//! |---------------------|--------------------------------------|
//! | `file:///abs/path`  | files under `/abs/path`              |
//! | `relative/path`     | files under `relative/path`          |
//! | `s3://bucket`       | not built; rejected                  |
//!
//! ## Storage Layout
//!
//! ```text
//! <root>/
//!   pages/
//!     http/pg_a1b2c3d4e5f6.json
//!     browser/pg_a1b2c3d4e5f6.json
//! <cache_dir>/            # optional local mirror
//!   pages/
//!     http/pg_a1b2c3d4e5f6.json
//! ```
//!
//! The cache directory is a read-through mirror of the bucket. It is
//! populated when a blob is read from the bucket and written alongside every
//! bucket write. [`BucketOption::NoCache`] disables it, even when a
//! [`BucketOption::CacheDir`] is also supplied.
//!
//! ```rust,no_run
//! use scraper_core::blob::{Bucket, BucketOption};
//!
//! let bucket = Bucket::open(
//!     "file:///tmp/scraper/bucket",
//!     &[BucketOption::CacheDir("/tmp/scraper/cache".into())],
//! )?;
//! bucket.write("pages/hello.json", b"{}")?;
//! assert_eq!(bucket.read("pages/hello.json")?, Some(b"{}".to_vec()));
//! # Ok::<(), scraper_core::Error>(())
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::{Error, Result};

/// Options accepted by [`Bucket::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketOption {
    /// Mirror blobs into this local directory.
    CacheDir(PathBuf),
    /// Disable the local mirror entirely.
    NoCache,
}

/// File-backed blob store with an optional local mirror.
#[derive(Debug, Clone)]
pub struct Bucket {
    root: PathBuf,
    cache_dir: Option<PathBuf>,
}

impl Bucket {
    /// Open (and create if needed) the bucket addressed by `uri`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedScheme`] for any scheme other than `file`
    /// or a bare path, and an I/O error when the root cannot be created.
    pub fn open(uri: &str, opts: &[BucketOption]) -> Result<Self> {
        let root = parse_bucket_uri(uri)?;

        let mut cache_dir = None;
        let mut no_cache = false;
        for opt in opts {
            match opt {
                BucketOption::CacheDir(dir) if !dir.as_os_str().is_empty() => {
                    cache_dir = Some(dir.clone());
                },
                BucketOption::CacheDir(_) => {},
                BucketOption::NoCache => no_cache = true,
            }
        }
        if no_cache {
            cache_dir = None;
        }

        fs::create_dir_all(&root).map_err(|e| {
            Error::Storage(format!(
                "Failed to create bucket root {}: {e}",
                root.display()
            ))
        })?;
        debug!(
            root = %root.display(),
            cache_dir = ?cache_dir.as_ref().map(|d| d.display().to_string()),
            "opened bucket"
        );

        Ok(Self { root, cache_dir })
    }

    /// Bucket root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local mirror directory, if caching is enabled.
    #[must_use]
    pub fn cache_dir(&self) -> Option<&Path> {
        self.cache_dir.as_deref()
    }

    /// Read a blob, preferring the local mirror.
    ///
    /// Returns `Ok(None)` when the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid keys or unreadable files.
    pub fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let rel = validate_key(key)?;

        if let Some(cache) = &self.cache_dir {
            if let Some(bytes) = read_optional(&cache.join(&rel))? {
                debug!(key, "blob served from cache dir");
                return Ok(Some(bytes));
            }
        }

        let Some(bytes) = read_optional(&self.root.join(&rel))? else {
            return Ok(None);
        };

        if let Some(cache) = &self.cache_dir {
            // A failed mirror write only costs a future cache miss.
            if let Err(e) = atomic_write(&cache.join(&rel), &bytes) {
                debug!(key, error = %e, "failed to populate cache dir");
            }
        }
        Ok(Some(bytes))
    }

    /// Write a blob, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid keys or when the write fails.
    pub fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let rel = validate_key(key)?;
        atomic_write(&self.root.join(&rel), bytes)?;
        if let Some(cache) = &self.cache_dir {
            atomic_write(&cache.join(&rel), bytes)?;
        }
        debug!(key, len = bytes.len(), "wrote blob");
        Ok(())
    }
}

/// Map a bucket URI to its root directory.
fn parse_bucket_uri(uri: &str) -> Result<PathBuf> {
    let Some((scheme, rest)) = uri.split_once("://") else {
        if uri.is_empty() {
            return Err(Error::Storage("bucket URL is empty".to_string()));
        }
        return Ok(PathBuf::from(uri));
    };

    match scheme.to_ascii_lowercase().as_str() {
        "file" if !rest.is_empty() => Ok(PathBuf::from(rest)),
        "file" => Err(Error::Storage(format!("bucket URL {uri:?} has no path"))),
        "s3" => Err(Error::UnsupportedScheme(
            "s3 (this build has no S3 backend)".to_string(),
        )),
        other => Err(Error::UnsupportedScheme(other.to_string())),
    }
}

/// Reject keys that are empty, absolute, or climb out of the root.
fn validate_key(key: &str) -> Result<PathBuf> {
    let path = Path::new(key);
    if key.is_empty() {
        return Err(Error::InvalidKey(key.to_string()));
    }
    for component in path.components() {
        match component {
            Component::Normal(_) => {},
            _ => return Err(Error::InvalidKey(key.to_string())),
        }
    }
    Ok(path.to_path_buf())
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Storage(format!(
            "Failed to read {}: {e}",
            path.display()
        ))),
    }
}

/// Temp file + rename so readers never observe a partial blob.
fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::Storage(format!("Failed to create directory: {e}")))?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);
    fs::write(&tmp_path, bytes)
        .map_err(|e| Error::Storage(format!("Failed to write temp blob file: {e}")))?;

    // Handle Windows: remove target before rename
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)
            .map_err(|e| Error::Storage(format!("Failed to remove existing blob: {e}")))?;
    }

    fs::rename(&tmp_path, path)
        .map_err(|e| Error::Storage(format!("Failed to commit blob file: {e}")))?;
    Ok(())
}
