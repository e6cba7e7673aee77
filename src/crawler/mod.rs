//! Crawler module for product discovery and extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry and exponential backoff
//! - Sitemap traversal (index → product sitemaps → product URLs)
//! - Embedded metadata extraction from product pages
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod sitemap;

pub use coordinator::{crawl, Coordinator, CrawlOutcome};
pub use extractor::Extractor;
pub use fetcher::{build_http_client, FetchResult, Fetcher, RetryPolicy, Sleeper, TokioSleeper};
pub use sitemap::SitemapWalker;
