//! `scraper do`: fetch one URL and print it.

use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use scraper_core::{Bucket, DoOption, Page, Request, Scraper};
use tracing::instrument::WithSubscriber;
use tracing::{error, info};

use crate::cli::DoArgs;
use crate::output::{RenderOptions, render_page};
use crate::utils::LogContext;
use crate::utils::options::{bucket_options, do_options};
use crate::utils::settings::RuntimeConfig;

/// What the user asked `do` to fetch, after flag interactions are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchIntent {
    /// URL exactly as given on the command line.
    pub url: String,
    /// Effective method; `-I` forces `HEAD`.
    pub method: String,
    /// Fetch engine options, in flag order.
    pub opts: Vec<DoOption>,
    /// How the page is printed.
    pub render: RenderOptions,
}

impl FetchIntent {
    /// Apply flag interactions to the raw `do` arguments.
    #[must_use]
    pub fn from_args(args: &DoArgs) -> Self {
        let method = if args.head {
            "HEAD".to_string()
        } else {
            args.method.clone()
        };
        let is_head = method == "HEAD";
        Self {
            url: args.url.clone(),
            method,
            opts: do_options(args.browser, args.force_refetch),
            render: RenderOptions {
                include_headers: args.include || args.head,
                is_head,
            },
        }
    }
}

/// Execute `do` against the configured bucket, writing the page to stdout.
pub async fn execute(args: &DoArgs, config: &RuntimeConfig, log: &LogContext) -> Result<()> {
    let scraper = new_scraper(config).context("failed to create scraper")?;
    let intent = FetchIntent::from_args(args);

    let page = fetch(&scraper, &intent)
        .with_subscriber(log.dispatch().clone())
        .await?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_page(&mut out, &page, intent.render).context("failed to write output")?;
    out.flush().context("failed to write output")?;
    Ok(())
}

fn new_scraper(config: &RuntimeConfig) -> Result<Scraper> {
    let bucket = Bucket::open(&config.bucket_url, &bucket_options(config))
        .context("failed to create bucket")?;
    Scraper::new(bucket).context("failed to create scraper")
}

/// Build the request, run it and classify the response status.
///
/// Cancelled by Ctrl-C while the fetch is in flight.
pub async fn fetch(scraper: &Scraper, intent: &FetchIntent) -> Result<Page> {
    let request =
        Request::new(&intent.method, &intent.url).context("failed to create request")?;

    info!(opts = ?intent.opts, "scraping {}", intent.url);
    let page = tokio::select! {
        result = scraper.execute(&request, &intent.opts) => {
            result.context("failed to scrape")?
        },
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for ctrl-c")?;
            bail!("interrupted");
        },
    };

    let status = page.response.status_code;
    if status >= 400 {
        error!("non-200 status code: {status}");
    } else {
        info!("status code: {status}");
    }
    Ok(page)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use scraper_core::page::push_header;
    use scraper_core::{Headers, PageRequest, PageResponse, Transport};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn args(extra: impl FnOnce(&mut DoArgs)) -> DoArgs {
        let mut args = DoArgs {
            url: "https://example.com/".to_string(),
            browser: false,
            method: "GET".to_string(),
            force_refetch: false,
            include: false,
            head: false,
        };
        extra(&mut args);
        args
    }

    struct Echo {
        status: u16,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Transport for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        async fn fetch(&self, request: &Request) -> scraper_core::Result<Page> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut header = Headers::new();
            push_header(&mut header, "content-type", "text/plain");
            Ok(Page::new(
                PageRequest {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    header: request.header().clone(),
                },
                PageResponse {
                    status_code: self.status,
                    header,
                    body: format!("{} {}", request.method(), request.url()).into_bytes(),
                },
            ))
        }
    }

    fn scraper(temp: &TempDir, status: u16) -> (Scraper, Arc<AtomicUsize>) {
        let uri = format!("file://{}", temp.path().display());
        let bucket = Bucket::open(&uri, &[]).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let scraper = Scraper::with_transports(
            bucket,
            Box::new(Echo {
                status,
                calls: Arc::clone(&calls),
            }),
            Box::new(Echo {
                status,
                calls: Arc::clone(&calls),
            }),
        );
        (scraper, calls)
    }

    #[test]
    fn test_intent_defaults() {
        let intent = FetchIntent::from_args(&args(|_| {}));
        assert_eq!(intent.method, "GET");
        assert!(intent.opts.is_empty());
        assert!(!intent.render.include_headers);
        assert!(!intent.render.is_head);
    }

    #[test]
    fn test_head_overrides_method_and_implies_include() {
        let intent = FetchIntent::from_args(&args(|a| {
            a.method = "POST".to_string();
            a.head = true;
        }));
        assert_eq!(intent.method, "HEAD");
        assert!(intent.render.include_headers);
        assert!(intent.render.is_head);
    }

    #[test]
    fn test_explicit_head_method_does_not_imply_include() {
        let intent = FetchIntent::from_args(&args(|a| a.method = "HEAD".to_string()));
        assert_eq!(intent.method, "HEAD");
        assert!(!intent.render.include_headers);
        assert!(intent.render.is_head);
    }

    #[test]
    fn test_intent_options() {
        let intent = FetchIntent::from_args(&args(|a| {
            a.browser = true;
            a.force_refetch = true;
        }));
        assert_eq!(intent.opts, vec![DoOption::Browser, DoOption::Replace]);
    }

    #[tokio::test]
    async fn test_fetch_returns_page_and_caches() {
        let temp = TempDir::new().unwrap();
        let (scraper, calls) = scraper(&temp, 200);
        let intent = FetchIntent::from_args(&args(|_| {}));

        let page = fetch(&scraper, &intent).await.unwrap();
        assert_eq!(page.response.status_code, 200);
        assert_eq!(page.response.body, b"GET https://example.com/");

        fetch(&scraper, &intent).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let refetch = FetchIntent::from_args(&args(|a| a.force_refetch = true));
        fetch(&scraper, &refetch).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_error_status_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        let (scraper, _) = scraper(&temp, 404);
        let page = fetch(&scraper, &FetchIntent::from_args(&args(|_| {})))
            .await
            .unwrap();
        assert_eq!(page.response.status_code, 404);
    }

    #[tokio::test]
    async fn test_invalid_request_is_wrapped() {
        let temp = TempDir::new().unwrap();
        let (scraper, calls) = scraper(&temp, 200);

        let bad_method = FetchIntent::from_args(&args(|a| a.method = "GE T".to_string()));
        let err = fetch(&scraper, &bad_method).await.unwrap_err();
        assert!(format!("{err:#}").starts_with("failed to create request: "));

        let bad_url = FetchIntent::from_args(&args(|a| a.url = "not a url".to_string()));
        let err = fetch(&scraper, &bad_url).await.unwrap_err();
        assert!(format!("{err:#}").starts_with("failed to create request: "));

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_bad_bucket_scheme_is_wrapped() {
        let config = RuntimeConfig {
            bucket_url: "ftp://example.com/bucket".to_string(),
            cache_dir: std::path::PathBuf::new(),
            cache_enabled: false,
            log_level: crate::utils::logging::LogLevel::Fatal,
            log_format: "auto".to_string(),
            log_color: "auto".to_string(),
        };
        let err = new_scraper(&config).err().unwrap();
        let msg = format!("{err:#}");
        assert!(msg.starts_with("failed to create bucket: "), "{msg}");
        assert!(msg.contains("ftp"), "{msg}");
    }
}
