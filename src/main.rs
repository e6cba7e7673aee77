//! Varebot main entry point
//!
//! This is the command-line interface for the varebot product harvester.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use varebot::config::{default_settings, load_settings, CrawlConfig};
use varebot::crawler::crawl;
use varebot::output::write_report;
use varebot::record::ProductField;

/// Varebot: a patient product-catalog harvester
///
/// Varebot walks a retailer's sitemap index down to its product sitemaps,
/// fetches every product page with a retrying backoff policy, and writes the
/// requested metadata fields to a timestamped CSV report.
#[derive(Parser, Debug)]
#[command(name = "varebot")]
#[command(version = "1.0.0")]
#[command(about = "A patient product-catalog harvester", long_about = None)]
struct Cli {
    /// Root sitemap index URL
    #[arg(value_name = "SITEMAP_URL")]
    sitemap_url: String,

    /// Extract the gross unit price of the product
    #[arg(short = 'g', long)]
    gross_unit_price: bool,

    /// Extract the product's full name
    #[arg(short = 'n', long)]
    full_name: bool,

    /// Extract the description from the supplier
    #[arg(short = 'd', long)]
    description_from_supplier: bool,

    /// Extract the language name
    #[arg(short = 'l', long)]
    language_name: bool,

    /// Path to an optional TOML settings file
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// The field set selected by the boolean flags, possibly empty
    fn requested_fields(&self) -> Vec<ProductField> {
        let mut fields = Vec::new();
        if self.gross_unit_price {
            fields.push(ProductField::GrossUnitPrice);
        }
        if self.full_name {
            fields.push(ProductField::FullName);
        }
        if self.description_from_supplier {
            fields.push(ProductField::DescriptionFromSupplier);
        }
        if self.language_name {
            fields.push(ProductField::LanguageName);
        }
        fields
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let settings = match &cli.settings {
        Some(path) => {
            tracing::info!("Loading settings from: {}", path.display());
            load_settings(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?
        }
        None => default_settings()?,
    };

    let fields = cli.requested_fields();
    if fields.is_empty() {
        tracing::warn!("No field flags given; records will carry no values (see --help)");
    }

    let report_dir = PathBuf::from(&settings.output.report_dir);
    let config = CrawlConfig::new(&cli.sitemap_url, fields, settings)
        .context("invalid crawl configuration")?;

    let outcome = crawl(config).await.context("crawl failed")?;

    tracing::info!(
        "Processed {} of {} discovered products ({} skipped)",
        outcome.records.len(),
        outcome.products_discovered,
        outcome.products_skipped
    );

    if outcome.records.is_empty() {
        tracing::warn!("No product data to save");
        return Ok(());
    }

    let path = write_report(&outcome.records, &report_dir).context("failed to write report")?;
    tracing::info!("Product data has been saved to {}", path.display());

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("varebot=info,warn"),
            1 => EnvFilter::new("varebot=debug,info"),
            2 => EnvFilter::new("varebot=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
