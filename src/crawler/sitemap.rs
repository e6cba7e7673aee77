//! Sitemap walker
//!
//! Resolves the two-level sitemap hierarchy: the index sitemap lists
//! per-category sitemaps, which in turn list product page URLs. All fetches
//! go through the retrying [`Fetcher`]; parsing is a lenient event scan that
//! collects `<loc>` elements wherever they appear, so both `<sitemapindex>`
//! and `<urlset>` documents (and slightly malformed ones) are handled.

use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::VarebotError;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Substring that marks an index entry as a product sitemap
const PRODUCT_SITEMAP_MARKER: &str = "/products";

/// Walks the sitemap hierarchy down to product page URLs
pub struct SitemapWalker<'a> {
    fetcher: &'a Fetcher,
}

impl<'a> SitemapWalker<'a> {
    /// Creates a walker over the given fetcher
    pub fn new(fetcher: &'a Fetcher) -> Self {
        Self { fetcher }
    }

    /// Resolves the index sitemap into per-category product sitemap URLs
    ///
    /// Keeps every `<loc>` entry whose text contains `/products`. An
    /// unreachable index makes product discovery impossible, so it is
    /// surfaced as an error and aborts the run.
    pub async fn product_sitemap_urls(&self, index_url: &str) -> Result<Vec<String>, VarebotError> {
        let body = match self.fetcher.fetch(index_url).await {
            FetchResult::Success { body, .. } => body,
            result => {
                return Err(VarebotError::IndexUnreachable {
                    url: index_url.to_string(),
                    reason: result.failure_note(),
                })
            }
        };

        Ok(product_sitemap_entries(&body))
    }

    /// Resolves one product sitemap into product page URLs
    ///
    /// Every `<loc>` entry is taken verbatim; duplicates are preserved (a
    /// product may legitimately appear once per referencing sitemap, and
    /// callers needing uniqueness dedupe downstream). A sitemap that fails to
    /// fetch contributes nothing and does not abort the walk of its siblings.
    pub async fn product_urls(&self, sitemap_url: &str) -> Vec<String> {
        match self.fetcher.fetch(sitemap_url).await {
            FetchResult::Success { body, .. } => location_entries(&body),
            result => {
                tracing::warn!("Skipping sitemap {}: {}", sitemap_url, result.failure_note());
                Vec::new()
            }
        }
    }
}

/// `<loc>` entries of an index document that point at product sitemaps
fn product_sitemap_entries(xml: &str) -> Vec<String> {
    location_entries(xml)
        .into_iter()
        .filter(|loc| loc.contains(PRODUCT_SITEMAP_MARKER))
        .collect()
}

/// Collects the text of every `<loc>` element in the document
///
/// Nesting is deliberately ignored. A parse error mid-document logs a warning
/// and yields whatever was collected up to that point.
fn location_entries(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut in_loc = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"loc" => in_loc = true,
            Ok(Event::End(e)) if e.local_name().as_ref() == b"loc" => in_loc = false,
            Ok(Event::Text(text)) if in_loc => {
                if let Ok(value) = text.unescape() {
                    entries.push(value.into_owned());
                }
            }
            Ok(Event::CData(data)) if in_loc => {
                entries.push(String::from_utf8_lossy(&data.into_inner()).into_owned());
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(
                    "Sitemap XML parse error at byte {}: {}",
                    reader.buffer_position(),
                    e
                );
                break;
            }
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const INDEX_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>https://shop.example/sitemaps/products-1.xml</loc></sitemap>
  <sitemap><loc>https://shop.example/sitemaps/products-2.xml</loc></sitemap>
  <sitemap><loc>https://shop.example/sitemaps/recipes.xml</loc></sitemap>
  <sitemap><loc>https://shop.example/sitemaps/stores.xml</loc></sitemap>
</sitemapindex>"#;

    #[test]
    fn test_index_keeps_only_product_sitemaps() {
        let entries = product_sitemap_entries(INDEX_XML);
        assert_eq!(
            entries,
            vec![
                "https://shop.example/sitemaps/products-1.xml",
                "https://shop.example/sitemaps/products-2.xml",
            ]
        );
    }

    #[test]
    fn test_urlset_entries_taken_verbatim() {
        let xml = r#"<urlset>
            <url><loc>https://shop.example/products/1-melk/</loc><lastmod>2024-01-01</lastmod></url>
            <url><loc>https://shop.example/products/2-brunost/</loc></url>
        </urlset>"#;
        assert_eq!(
            location_entries(xml),
            vec![
                "https://shop.example/products/1-melk/",
                "https://shop.example/products/2-brunost/",
            ]
        );
    }

    #[test]
    fn test_duplicates_are_preserved() {
        let xml = r#"<urlset>
            <url><loc>https://shop.example/products/1/</loc></url>
            <url><loc>https://shop.example/products/1/</loc></url>
        </urlset>"#;
        assert_eq!(location_entries(xml).len(), 2);
    }

    #[test]
    fn test_entities_are_unescaped() {
        let xml = "<urlset><url><loc>https://shop.example/products?a=1&amp;b=2</loc></url></urlset>";
        assert_eq!(
            location_entries(xml),
            vec!["https://shop.example/products?a=1&b=2"]
        );
    }

    #[test]
    fn test_cdata_location() {
        let xml = "<urlset><url><loc><![CDATA[https://shop.example/products/3/]]></loc></url></urlset>";
        assert_eq!(
            location_entries(xml),
            vec!["https://shop.example/products/3/"]
        );
    }

    #[test]
    fn test_empty_document_yields_nothing() {
        assert!(location_entries("").is_empty());
        assert!(location_entries("<urlset></urlset>").is_empty());
    }

    #[test]
    fn test_truncated_document_keeps_earlier_entries() {
        let xml = r#"<urlset>
            <url><loc>https://shop.example/products/1/</loc></url>
            <url><loc>https://shop.example/products/2/</loc></url"#;
        let entries = location_entries(xml);
        assert_eq!(entries[0], "https://shop.example/products/1/");
    }

    #[tokio::test]
    async fn test_walker_resolves_index_over_http() {
        let server = MockServer::start().await;
        let index = format!(
            r#"<sitemapindex>
                <sitemap><loc>{0}/sitemaps/products-1.xml</loc></sitemap>
                <sitemap><loc>{0}/sitemaps/stores.xml</loc></sitemap>
            </sitemapindex>"#,
            server.uri()
        );
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(index))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(&Settings::default()).unwrap();
        let walker = SitemapWalker::new(&fetcher);
        let sitemaps = walker
            .product_sitemap_urls(&format!("{}/sitemap.xml", server.uri()))
            .await
            .unwrap();

        assert_eq!(
            sitemaps,
            vec![format!("{}/sitemaps/products-1.xml", server.uri())]
        );
    }

    #[tokio::test]
    async fn test_walker_unreachable_index_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(&Settings::default()).unwrap();
        let walker = SitemapWalker::new(&fetcher);
        let result = walker
            .product_sitemap_urls(&format!("{}/sitemap.xml", server.uri()))
            .await;

        assert!(matches!(result, Err(VarebotError::IndexUnreachable { .. })));
    }

    #[tokio::test]
    async fn test_walker_failed_category_sitemap_contributes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sitemaps/products-1.xml"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(&Settings::default()).unwrap();
        let walker = SitemapWalker::new(&fetcher);
        let urls = walker
            .product_urls(&format!("{}/sitemaps/products-1.xml", server.uri()))
            .await;

        assert!(urls.is_empty());
    }
}
