//! Configuration module for varebot
//!
//! This module handles the optional TOML settings file and the per-run crawl
//! configuration assembled from the command line.
//!
//! # Example
//!
//! ```no_run
//! use varebot::config::{load_settings, CrawlConfig};
//! use varebot::record::ProductField;
//! use std::path::Path;
//!
//! let settings = load_settings(Path::new("settings.toml")).unwrap();
//! let config = CrawlConfig::new(
//!     "https://example.com/sitemap.xml",
//!     vec![ProductField::FullName],
//!     settings,
//! )
//! .unwrap();
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CrawlConfig, ExtractSettings, FetchSettings, OutputSettings, Settings, UserAgentSettings,
};

// Re-export parser functions
pub use parser::{default_settings, load_settings};
