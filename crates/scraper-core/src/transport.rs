//! The seam between the scraper and the things that actually fetch.

use async_trait::async_trait;

use crate::{Page, Request, Result};

/// Something that can turn a [`Request`] into a [`Page`].
///
/// Implementations report transport failures as errors; an HTTP error status
/// is a successful fetch whose page carries that status.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Short name used in log fields.
    fn name(&self) -> &'static str;

    /// Perform the request.
    async fn fetch(&self, request: &Request) -> Result<Page>;
}
