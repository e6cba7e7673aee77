//! Varebot: a patient product-catalog harvester
//!
//! This crate crawls a retailer's public sitemap hierarchy to discover product
//! pages, fetches each page with a retrying backoff policy, and extracts a
//! configurable set of fields from the embedded page data block.

pub mod config;
pub mod crawler;
pub mod output;
pub mod record;

use thiserror::Error;

/// Main error type for varebot operations
#[derive(Debug, Error)]
pub enum VarebotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Sitemap index unreachable: {url} ({reason})")]
    IndexUnreachable { url: String, reason: String },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid sitemap URL '{url}': {source}")]
    InvalidSitemapUrl {
        url: String,
        source: url::ParseError,
    },
}

/// Result type alias for varebot operations
pub type Result<T> = std::result::Result<T, VarebotError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{CrawlConfig, Settings};
pub use record::{ProductField, ProductRecord};
