//! # scraper-core
//!
//! Fetch engine for `scraper`: issues a single request against a URL, either
//! over plain HTTP or through a headless browser, and keeps the resulting
//! pages in a blob bucket so repeated fetches are served locally.
//!
//! ## Architecture
//!
//! - **Configuration**: platform-specific configuration root and the default
//!   bucket/cache locations derived from it
//! - **Bucket**: file-backed blob store with an optional local mirror
//! - **Transports**: `reqwest` HTTP fetcher and headless browser renderer
//! - **Scraper**: cache lookup, transport dispatch and write-back
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scraper_core::{Bucket, BucketOption, ConfigPaths, Request, Scraper};
//!
//! # async fn example() -> scraper_core::Result<()> {
//! let paths = ConfigPaths::discover()?;
//! let bucket = Bucket::open(
//!     &paths.default_bucket_url(),
//!     &[BucketOption::CacheDir(paths.default_cache_dir())],
//! )?;
//! let scraper = Scraper::new(bucket)?;
//! let page = scraper
//!     .execute(&Request::new("GET", "https://example.com")?, &[])
//!     .await?;
//! println!("{} bytes", page.response.body.len());
//! # Ok(())
//! # }
//! ```

/// Blob bucket backing the page cache
pub mod blob;
/// Headless browser transport
pub mod browser;
/// Configuration root resolution
pub mod config;
/// Error types and result aliases
pub mod error;
/// HTTP transport
pub mod fetcher;
/// Fetched page model
pub mod page;
/// Outbound request construction
pub mod request;
/// Fetch engine with page cache
pub mod scraper;
/// Transport abstraction
pub mod transport;

// Re-export commonly used types
pub use blob::{Bucket, BucketOption};
pub use browser::BrowserTransport;
pub use config::{ConfigPaths, Os, config_root};
pub use error::{Error, Result};
pub use fetcher::Fetcher;
pub use page::{Headers, Page, PageId, PageRequest, PageResponse};
pub use request::Request;
pub use scraper::{DoOption, Scraper};
pub use transport::Transport;
