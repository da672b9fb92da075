//! Command implementations for the scraper CLI

mod scrape;

pub use scrape::execute as scrape;
