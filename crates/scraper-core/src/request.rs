//! Outbound request construction.

use reqwest::Method;
use url::Url;

use crate::page::{Headers, push_header};
use crate::{Error, Result};

/// A request to be executed by the [`Scraper`](crate::Scraper).
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    header: Headers,
}

impl Request {
    /// Build a request from a method token and an absolute URL.
    ///
    /// The method is used verbatim (methods are case-sensitive tokens).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMethod`] for an empty or non-token method and
    /// [`Error::InvalidUrl`] when the URL does not parse or is not http(s).
    pub fn new(method: &str, url: &str) -> Result<Self> {
        if method.is_empty() {
            return Err(Error::InvalidMethod(method.to_string()));
        }
        let method = Method::from_bytes(method.as_bytes())
            .map_err(|_| Error::InvalidMethod(method.to_string()))?;
        let url = Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
        match url.scheme() {
            "http" | "https" => {},
            other => {
                return Err(Error::InvalidUrl(format!(
                    "{url}: unsupported scheme {other:?}"
                )));
            },
        }
        Ok(Self {
            method,
            url,
            header: Headers::new(),
        })
    }

    /// Add a header to send with the request.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        push_header(&mut self.header, name, value);
        self
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Target URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Caller-supplied headers.
    #[must_use]
    pub const fn header(&self) -> &Headers {
        &self.header
    }

    /// Whether the request is a `HEAD`.
    #[must_use]
    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }
}
