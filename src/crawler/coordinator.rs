//! Crawl coordination
//!
//! Drives the sitemap walker and the metadata extractor over every
//! discovered product URL, assembles the record sequence, and keeps the
//! diagnostic counters. Strictly sequential: one URL in flight at a time,
//! with retry state scoped inside each fetch.

use crate::config::CrawlConfig;
use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::sitemap::SitemapWalker;
use crate::record::ProductRecord;
use crate::Result;

/// What a finished crawl produced
#[derive(Debug, Default)]
pub struct CrawlOutcome {
    /// One record per successfully fetched product page, in discovery order
    pub records: Vec<ProductRecord>,

    /// Product sitemaps found in the index
    pub sitemaps_discovered: usize,

    /// Product URLs found across all sitemaps (duplicates included)
    pub products_discovered: usize,

    /// Product pages that could not be fetched and were skipped
    pub products_skipped: usize,
}

/// Main crawl coordinator
pub struct Coordinator {
    config: CrawlConfig,
    fetcher: Fetcher,
}

impl Coordinator {
    /// Creates a coordinator, building the HTTP client from settings
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let fetcher = Fetcher::new(&config.settings)?;
        Ok(Self { config, fetcher })
    }

    /// Runs the crawl to completion
    ///
    /// 1. Resolve the index sitemap into product sitemap URLs (fatal if the
    ///    index is unreachable; nothing can be discovered without it)
    /// 2. Walk each sitemap for product page URLs
    /// 3. Extract the configured fields from every product page
    ///
    /// Per-URL failures below the index are contained: they are logged,
    /// counted, and never abort the run.
    pub async fn run(&self) -> Result<CrawlOutcome> {
        let walker = SitemapWalker::new(&self.fetcher);
        let extractor = Extractor::new(&self.fetcher, &self.config.fields, &self.config.settings);

        let sitemap_urls = walker
            .product_sitemap_urls(self.config.root_sitemap_url.as_str())
            .await?;
        tracing::info!("Found {} product sitemaps", sitemap_urls.len());

        let mut outcome = CrawlOutcome {
            sitemaps_discovered: sitemap_urls.len(),
            ..Default::default()
        };

        for sitemap_url in &sitemap_urls {
            let product_urls = walker.product_urls(sitemap_url).await;
            tracing::info!(
                "Found {} products in sitemap: {}",
                product_urls.len(),
                sitemap_url
            );
            outcome.products_discovered += product_urls.len();

            for product_url in &product_urls {
                match extractor.extract(product_url).await {
                    Some(record) => {
                        tracing::debug!("Fetched metadata for product: {}", record.display_name());
                        outcome.records.push(record);
                    }
                    None => outcome.products_skipped += 1,
                }
            }
        }

        tracing::info!(
            "Crawl complete: {} sitemaps, {} products discovered, {} records extracted, {} skipped",
            outcome.sitemaps_discovered,
            outcome.products_discovered,
            outcome.records.len(),
            outcome.products_skipped
        );

        Ok(outcome)
    }
}

/// Runs a complete crawl with the given configuration
///
/// # Example
///
/// ```no_run
/// use varebot::config::{CrawlConfig, Settings};
/// use varebot::crawler::crawl;
/// use varebot::record::ProductField;
///
/// # async fn example() -> varebot::Result<()> {
/// let config = CrawlConfig::new(
///     "https://shop.example/sitemap.xml",
///     vec![ProductField::FullName],
///     Settings::default(),
/// )?;
/// let outcome = crawl(config).await?;
/// println!("{} records", outcome.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: CrawlConfig) -> Result<CrawlOutcome> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
