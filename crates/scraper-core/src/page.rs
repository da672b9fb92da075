//! Fetched pages and their durable identifiers.
//!
//! A [`Page`] is the request/response pair produced by one fetch. Pages are
//! stored in the bucket as JSON under `pages/<transport>/<PageId>.json`; the response body
//! is base64-encoded so arbitrary bytes survive the round trip.
//!
//! ```rust
//! use scraper_core::page::{PageId, canonical_header_name};
//!
//! let id = PageId::new("GET", "https://example.com/");
//! assert!(id.as_str().starts_with("pg_"));
//! assert_eq!(canonical_header_name("content-type"), "Content-Type");
//! ```

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Header mapping: canonical name to the ordered list of its values.
pub type Headers = BTreeMap<String, Vec<String>>;

/// Durable page identifier: `pg_<sha256_12>`.
///
/// Derived from the method and URL of the request so that a `HEAD` and a
/// `GET` of the same URL are cached independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(String);

impl PageId {
    /// Create a `PageId` for a request.
    #[must_use]
    pub fn new(method: &str, url: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(method.as_bytes());
        hasher.update(b" ");
        hasher.update(url.as_bytes());
        let result = hasher.finalize();
        let hex = result.iter().take(6).fold(String::new(), |mut acc, b| {
            // write! to String is infallible
            let _ = write!(acc, "{b:02x}");
            acc
        });
        Self(format!("pg_{hex}"))
    }

    /// Get the string representation, including the `pg_` prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bucket key under which the page fetched by `transport` is stored.
    ///
    /// Each transport has its own namespace, so a browser render never
    /// answers a plain HTTP request for the same URL or the other way round.
    #[must_use]
    pub fn blob_key(&self, transport: &str) -> String {
        format!("pages/{transport}/{}.json", self.0)
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The request half of a page, as it was sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// HTTP method.
    pub method: String,
    /// Absolute request URL.
    pub url: String,
    /// Request headers sent by the transport.
    #[serde(default)]
    pub header: Headers,
}

/// The response half of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers.
    #[serde(default)]
    pub header: Headers,
    /// Raw response body.
    #[serde(with = "body_base64", default)]
    pub body: Vec<u8>,
}

/// Request/response pair returned by one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Stable identifier of the request.
    pub id: PageId,
    /// What was sent.
    pub request: PageRequest,
    /// What came back.
    pub response: PageResponse,
    /// When the transport produced this page.
    pub fetched_at: DateTime<Utc>,
}

impl Page {
    /// Assemble a page, stamping it with the current time.
    #[must_use]
    pub fn new(request: PageRequest, response: PageResponse) -> Self {
        Self {
            id: PageId::new(&request.method, &request.url),
            request,
            response,
            fetched_at: Utc::now(),
        }
    }

    /// Whether the response status is below 400.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.response.status_code < 400
    }
}

/// Canonical MIME form of a header name: first letter and every letter after
/// a hyphen upper-cased, everything else lower-cased.
#[must_use]
pub fn canonical_header_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        upper = c == '-';
    }
    out
}

/// Append a header value under its canonical name.
pub fn push_header(headers: &mut Headers, name: &str, value: impl Into<String>) {
    headers
        .entry(canonical_header_name(name))
        .or_default()
        .push(value.into());
}

mod body_base64 {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(body: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(body))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
