use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, USER_AGENT};
use std::time::Duration;
use tracing::{debug, info};

use crate::page::{Headers, PageRequest, PageResponse, push_header};
use crate::transport::Transport;
use crate::{Error, Page, Request, Result};

/// User agent sent with every HTTP request.
pub const DEFAULT_USER_AGENT: &str = concat!("scraper/", env!("CARGO_PKG_VERSION"));

const DEFAULT_ACCEPT: &str = "*/*";

/// Plain HTTP transport backed by `reqwest`
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a new fetcher with configured HTTP client
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Creates a new fetcher with a custom request timeout (primarily for tests)
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for Fetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, request: &Request) -> Result<Page> {
        let url = request.url().as_str();

        // Headers are recorded in the page exactly as sent.
        let mut sent = Headers::new();
        push_header(&mut sent, USER_AGENT.as_str(), DEFAULT_USER_AGENT);
        push_header(&mut sent, ACCEPT.as_str(), DEFAULT_ACCEPT);
        for (name, values) in request.header() {
            let entry = sent.entry(name.clone()).or_default();
            entry.clear();
            entry.extend(values.iter().cloned());
        }

        let mut builder = self.client.request(request.method().clone(), url);
        for (name, values) in &sent {
            for value in values {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }

        debug!(method = %request.method(), url, "sending request");
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let header = collect_headers(response.headers());

        let body = if request.is_head() {
            Vec::new()
        } else {
            response.bytes().await?.to_vec()
        };

        info!("Fetched {} bytes from {} (status {})", body.len(), url, status);

        Ok(Page::new(
            PageRequest {
                method: request.method().to_string(),
                url: url.to_string(),
                header: sent,
            },
            PageResponse {
                status_code: status,
                header,
                body,
            },
        ))
    }
}

fn collect_headers(map: &HeaderMap) -> Headers {
    let mut headers = Headers::new();
    for (name, value) in map {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        push_header(&mut headers, name.as_str(), value);
    }
    headers
}

// Note: Default is not implemented as Fetcher::new() can fail.
// Use Fetcher::new() directly and handle the Result.
