//! Product metadata extractor
//!
//! Fetches a product page and pulls the requested fields out of the embedded
//! data block: a `<script type="application/json">` element carrying the
//! page's structured data. Fields are captured with targeted patterns over
//! the raw block text rather than a full JSON parse, so a malformed or
//! partial payload still yields every field that is individually intact.

use crate::config::Settings;
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::record::{ProductField, ProductRecord};
use regex::Regex;
use scraper::{Html, Selector};

/// Extracts requested metadata fields from product pages
pub struct Extractor<'a> {
    fetcher: &'a Fetcher,
    fields: Vec<ProductField>,
    patterns: Vec<(ProductField, Regex)>,
    data_script_id: Option<String>,
    retry_pages: bool,
}

impl<'a> Extractor<'a> {
    /// Creates an extractor for the requested field set
    ///
    /// Patterns are compiled once here, for the requested fields only.
    pub fn new(fetcher: &'a Fetcher, fields: &[ProductField], settings: &Settings) -> Self {
        let patterns = fields
            .iter()
            .filter_map(|f| field_pattern(*f).map(|re| (*f, re)))
            .collect();

        Self {
            fetcher,
            fields: fields.to_vec(),
            patterns,
            data_script_id: settings.extract.data_script_id.clone(),
            retry_pages: settings.fetch.retry_product_pages,
        }
    }

    /// Fetches a product page and extracts the requested fields
    ///
    /// Returns `None` when the page cannot be fetched; the caller skips the
    /// URL and continues. A fetched page always yields a record carrying the
    /// full requested field set, with `None` for anything that did not match
    /// (a missing field is data, not an error).
    pub async fn extract(&self, url: &str) -> Option<ProductRecord> {
        let result = if self.retry_pages {
            self.fetcher.fetch(url).await
        } else {
            self.fetcher.get_once(url).await
        };

        let body = match result {
            FetchResult::Success { body, .. } => body,
            result => {
                tracing::warn!(
                    "Failed to fetch product page {}: {}",
                    url,
                    result.failure_note()
                );
                return None;
            }
        };

        Some(self.extract_from_html(&body))
    }

    /// Extracts the requested fields from already-fetched page HTML
    pub fn extract_from_html(&self, html: &str) -> ProductRecord {
        let mut record = ProductRecord::with_fields(&self.fields);

        let document = Html::parse_document(html);
        let block = match self.embedded_block(&document) {
            Some(block) => block,
            None => {
                tracing::debug!("No embedded data block in page");
                return record;
            }
        };

        for (field, pattern) in &self.patterns {
            let value = pattern
                .captures(&block)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string());
            record.set(*field, value);
        }

        record
    }

    /// Locates the embedded data block and returns its raw text
    ///
    /// The id-qualified selector is tried first when an id is configured;
    /// pages with several JSON-typed scripts make the type-only selector
    /// ambiguous. First match wins either way.
    fn embedded_block(&self, document: &Html) -> Option<String> {
        if let Some(id) = &self.data_script_id {
            let qualified = format!(r#"script[id="{}"][type="application/json"]"#, id);
            if let Some(selector) = Selector::parse(&qualified).ok() {
                if let Some(element) = document.select(&selector).next() {
                    return Some(element.text().collect());
                }
            }
        }

        if let Ok(selector) = Selector::parse(r#"script[type="application/json"]"#) {
            if let Some(element) = document.select(&selector).next() {
                return Some(element.text().collect());
            }
        }

        None
    }
}

/// Compiles the extraction pattern for one field
///
/// Price fields capture digits and decimal points. Text fields capture a
/// quoted string up to the first unescaped quote; the alternation class
/// steps over escape pairs and matches newlines.
fn field_pattern(field: ProductField) -> Option<Regex> {
    let pattern = if field.is_price() {
        format!(r#""{}":"([\d.]+)""#, field.key())
    } else {
        format!(r#""{}":"((?:[^"\\]|\\.)*)""#, field.key())
    };

    Regex::new(&pattern).ok()
}
