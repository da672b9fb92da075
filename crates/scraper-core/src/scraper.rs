//! The fetch engine.
//!
//! [`Scraper::execute`] answers a request from the bucket when it can and
//! otherwise fetches through a [`Transport`], storing successful pages for
//! next time.
//!
//! ```rust,no_run
//! use scraper_core::{Bucket, DoOption, Request, Scraper};
//!
//! # async fn example() -> scraper_core::Result<()> {
//! let bucket = Bucket::open("file:///tmp/scraper/bucket", &[])?;
//! let scraper = Scraper::new(bucket)?;
//! let request = Request::new("GET", "https://example.com")?;
//! let page = scraper.execute(&request, &[DoOption::Replace]).await?;
//! println!("{}", page.response.status_code);
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::blob::Bucket;
use crate::browser::BrowserTransport;
use crate::fetcher::Fetcher;
use crate::page::PageId;
use crate::transport::Transport;
use crate::{Error, Page, Request, Result};

/// Options accepted by [`Scraper::execute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DoOption {
    /// Render the page with a headless browser instead of plain HTTP.
    Browser,
    /// Ignore any cached page, fetch again and replace the cached copy.
    Replace,
}

/// Fetch engine with a bucket-backed page cache.
pub struct Scraper {
    bucket: Bucket,
    http: Box<dyn Transport>,
    browser: Box<dyn Transport>,
}

impl Scraper {
    /// Create a scraper storing pages in `bucket`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(bucket: Bucket) -> Result<Self> {
        Ok(Self::with_transports(
            bucket,
            Box::new(Fetcher::new()?),
            Box::new(BrowserTransport::new()),
        ))
    }

    /// Create a scraper with explicit transports.
    #[must_use]
    pub fn with_transports(
        bucket: Bucket,
        http: Box<dyn Transport>,
        browser: Box<dyn Transport>,
    ) -> Self {
        Self {
            bucket,
            http,
            browser,
        }
    }

    /// The bucket pages are cached in.
    #[must_use]
    pub const fn bucket(&self) -> &Bucket {
        &self.bucket
    }

    /// Execute `request`, consulting the cache unless [`DoOption::Replace`]
    /// is given.
    ///
    /// # Errors
    ///
    /// Returns transport errors and bucket write failures. Pages with an
    /// error status are returned normally and are not cached.
    #[instrument(level = "debug", skip(self, request), fields(method = %request.method(), url = %request.url()))]
    pub async fn execute(&self, request: &Request, opts: &[DoOption]) -> Result<Page> {
        let use_browser = opts.contains(&DoOption::Browser);
        let replace = opts.contains(&DoOption::Replace);

        let transport = if use_browser {
            self.browser.as_ref()
        } else {
            self.http.as_ref()
        };
        let id = PageId::new(request.method().as_str(), request.url().as_str());
        let key = id.blob_key(transport.name());

        if !replace {
            if let Some(page) = self.load_cached(&key)? {
                debug!(%id, transport = transport.name(), "serving cached page");
                return Ok(page);
            }
        }

        debug!(%id, transport = transport.name(), replace, "fetching page");
        let page = transport.fetch(request).await.inspect_err(|e| {
            debug!(%id, transport = transport.name(), category = e.category(), error = %e, "fetch failed");
        })?;

        if page.is_success() {
            let json = serde_json::to_vec_pretty(&page)
                .map_err(|e| Error::Serialization(format!("Failed to serialize page: {e}")))?;
            self.bucket.write(&key, &json)?;
            debug!(%id, "cached page");
        } else {
            debug!(%id, status = page.response.status_code, "not caching error page");
        }

        Ok(page)
    }

    /// Load a cached page; unreadable entries count as a miss.
    fn load_cached(&self, key: &str) -> Result<Option<Page>> {
        let Some(bytes) = self.bucket.read(key)? else {
            return Ok(None);
        };
        match serde_json::from_slice::<Page>(&bytes) {
            Ok(page) => Ok(Some(page)),
            Err(e) => {
                warn!(key, error = %e, "ignoring corrupt cached page");
                Ok(None)
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::page::{Headers, PageRequest, PageResponse};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Transport returning a canned status and counting calls.
    struct Canned {
        name: &'static str,
        status: u16,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Transport for Canned {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch(&self, request: &Request) -> Result<Page> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(Page::new(
                PageRequest {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    header: Headers::new(),
                },
                PageResponse {
                    status_code: self.status,
                    header: Headers::new(),
                    body: format!("{} #{n}", self.name).into_bytes(),
                },
            ))
        }
    }

    struct Failing;

    #[async_trait]
    impl Transport for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn fetch(&self, _request: &Request) -> Result<Page> {
            Err(Error::Timeout("canned".to_string()))
        }
    }

    struct Harness {
        _temp: TempDir,
        scraper: Scraper,
        http_calls: Arc<AtomicUsize>,
        browser_calls: Arc<AtomicUsize>,
    }

    fn harness(status: u16) -> Harness {
        let temp = TempDir::new().unwrap();
        let uri = format!("file://{}", temp.path().join("bucket").display());
        let bucket = Bucket::open(&uri, &[]).unwrap();
        let http_calls = Arc::new(AtomicUsize::new(0));
        let browser_calls = Arc::new(AtomicUsize::new(0));
        let scraper = Scraper::with_transports(
            bucket,
            Box::new(Canned {
                name: "http",
                status,
                calls: Arc::clone(&http_calls),
            }),
            Box::new(Canned {
                name: "browser",
                status,
                calls: Arc::clone(&browser_calls),
            }),
        );
        Harness {
            _temp: temp,
            scraper,
            http_calls,
            browser_calls,
        }
    }

    fn body(page: &Page) -> String {
        String::from_utf8(page.response.body.clone()).unwrap()
    }

    #[tokio::test]
    async fn test_second_request_is_served_from_cache() {
        let h = harness(200);
        let req = Request::new("GET", "https://example.com/").unwrap();

        let first = h.scraper.execute(&req, &[]).await.unwrap();
        let second = h.scraper.execute(&req, &[]).await.unwrap();

        assert_eq!(h.http_calls.load(Ordering::SeqCst), 1);
        assert_eq!(body(&first), "http #1");
        assert_eq!(second, first);
        assert!(
            h.scraper
                .bucket()
                .read(&first.id.blob_key("http"))
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_replace_refetches_and_overwrites() {
        let h = harness(200);
        let req = Request::new("GET", "https://example.com/").unwrap();

        h.scraper.execute(&req, &[]).await.unwrap();
        let replaced = h
            .scraper
            .execute(&req, &[DoOption::Replace])
            .await
            .unwrap();
        assert_eq!(body(&replaced), "http #2");

        let cached = h.scraper.execute(&req, &[]).await.unwrap();
        assert_eq!(body(&cached), "http #2");
        assert_eq!(h.http_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_browser_option_selects_browser_transport() {
        let h = harness(200);
        let req = Request::new("GET", "https://example.com/").unwrap();

        let page = h
            .scraper
            .execute(&req, &[DoOption::Browser, DoOption::Replace])
            .await
            .unwrap();
        assert_eq!(body(&page), "browser #1");
        assert_eq!(h.http_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.browser_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_error_pages_are_not_cached() {
        let h = harness(404);
        let req = Request::new("GET", "https://example.com/missing").unwrap();

        let page = h.scraper.execute(&req, &[]).await.unwrap();
        assert_eq!(page.response.status_code, 404);
        h.scraper.execute(&req, &[]).await.unwrap();
        assert_eq!(h.http_calls.load(Ordering::SeqCst), 2);
        assert!(
            h.scraper
                .bucket()
                .read(&page.id.blob_key("http"))
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_head_and_get_are_cached_separately() {
        let h = harness(200);
        let get = Request::new("GET", "https://example.com/").unwrap();
        let head = Request::new("HEAD", "https://example.com/").unwrap();

        h.scraper.execute(&get, &[]).await.unwrap();
        let head_page = h.scraper.execute(&head, &[]).await.unwrap();
        assert_eq!(head_page.request.method, "HEAD");
        assert_eq!(h.http_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_is_refetched() {
        let h = harness(200);
        let req = Request::new("GET", "https://example.com/").unwrap();
        let key = PageId::new("GET", "https://example.com/").blob_key("http");
        h.scraper.bucket().write(&key, b"not json").unwrap();

        let page = h.scraper.execute(&req, &[]).await.unwrap();
        assert_eq!(body(&page), "http #1");
        assert_eq!(h.http_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_browser_does_not_reuse_http_page() {
        let h = harness(200);
        let req = Request::new("GET", "https://example.com/").unwrap();

        let plain = h.scraper.execute(&req, &[]).await.unwrap();
        assert_eq!(body(&plain), "http #1");

        let rendered = h.scraper.execute(&req, &[DoOption::Browser]).await.unwrap();
        assert_eq!(body(&rendered), "browser #1");
        assert_eq!(h.browser_calls.load(Ordering::SeqCst), 1);

        // Each transport is now served from its own cache entry.
        let again = h.scraper.execute(&req, &[DoOption::Browser]).await.unwrap();
        assert_eq!(body(&again), "browser #1");
        let plain_again = h.scraper.execute(&req, &[]).await.unwrap();
        assert_eq!(body(&plain_again), "http #1");
        assert_eq!(h.http_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.browser_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_is_propagated() {
        let temp = TempDir::new().unwrap();
        let req = Request::new("GET", "https://example.com/").unwrap();
        let scraper = Scraper::with_transports(
            Bucket::open(&format!("file://{}", temp.path().display()), &[]).unwrap(),
            Box::new(Failing),
            Box::new(Failing),
        );
        let err = scraper.execute(&req, &[]).await.unwrap_err();
        assert_eq!(err.category(), "timeout");
    }

    #[test]
    fn test_do_option_serializes_for_logs() {
        let json = serde_json::to_string(&[DoOption::Browser, DoOption::Replace]).unwrap();
        assert_eq!(json, r#"["browser","replace"]"#);
    }
}
