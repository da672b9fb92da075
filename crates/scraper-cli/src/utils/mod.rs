//! Utility modules for the scraper CLI

pub mod logging;
pub mod options;
pub mod settings;

pub use logging::{LogContext, initialize_logging};
pub use settings::RuntimeConfig;
