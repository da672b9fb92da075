//! Flag to option mapping for the fetch engine and the bucket.

use scraper_core::{BucketOption, DoOption};

use crate::utils::settings::RuntimeConfig;

/// Fetch options for `do`, in a stable order.
#[must_use]
pub fn do_options(browser: bool, force_refetch: bool) -> Vec<DoOption> {
    let mut opts = Vec::with_capacity(2);
    if browser {
        opts.push(DoOption::Browser);
    }
    if force_refetch {
        opts.push(DoOption::Replace);
    }
    opts
}

/// Bucket options derived from the runtime configuration.
///
/// Both options may be present; the bucket lets `NoCache` win.
#[must_use]
pub fn bucket_options(config: &RuntimeConfig) -> Vec<BucketOption> {
    let mut opts = Vec::with_capacity(2);
    if !config.cache_dir.as_os_str().is_empty() {
        opts.push(BucketOption::CacheDir(config.cache_dir.clone()));
    }
    if !config.cache_enabled {
        opts.push(BucketOption::NoCache);
    }
    opts
}
