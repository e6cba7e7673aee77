use crate::record::ProductField;
use crate::ConfigError;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Run-wide settings, loadable from an optional TOML file
///
/// Every section and key has a default, so an absent file or a partial file
/// both produce a usable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub fetch: FetchSettings,

    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentSettings,

    #[serde(default)]
    pub extract: ExtractSettings,

    #[serde(default)]
    pub output: OutputSettings,
}

/// Fetch retry and timeout behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FetchSettings {
    /// First backoff wait in seconds; doubles after every retryable failure
    #[serde(rename = "initial-backoff-secs", default = "default_initial_backoff")]
    pub initial_backoff_secs: u64,

    /// Total attempts per URL before giving up
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Whole-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Whether product-page fetches get the retry/backoff treatment too.
    /// Off reproduces the legacy behavior where only sitemap fetches were
    /// retried and a product page failed on the first bad response.
    #[serde(rename = "retry-product-pages", default = "default_retry_product_pages")]
    pub retry_product_pages: bool,
}

fn default_initial_backoff() -> u64 {
    1
}

fn default_max_attempts() -> u32 {
    5
}

fn default_request_timeout() -> u64 {
    30
}

fn default_retry_product_pages() -> bool {
    true
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            initial_backoff_secs: default_initial_backoff(),
            max_attempts: default_max_attempts(),
            request_timeout_secs: default_request_timeout(),
            retry_product_pages: default_retry_product_pages(),
        }
    }
}

impl FetchSettings {
    /// The initial backoff as a [`Duration`]
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_secs(self.initial_backoff_secs)
    }

    /// The request timeout as a [`Duration`]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Identity sent with every request so the target can recognize and
/// rate-limit the crawler
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserAgentSettings {
    #[serde(rename = "bot-name", default = "default_bot_name")]
    pub bot_name: String,

    #[serde(rename = "task-name", default = "default_task_name")]
    pub task_name: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(rename = "contact-email", default = "default_contact_email")]
    pub contact_email: String,
}

fn default_bot_name() -> String {
    "mono-bot".to_string()
}

fn default_task_name() -> String {
    "iamengineertask".to_string()
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_contact_email() -> String {
    "varebot@example.com".to_string()
}

impl Default for UserAgentSettings {
    fn default() -> Self {
        Self {
            bot_name: default_bot_name(),
            task_name: default_task_name(),
            version: default_version(),
            contact_email: default_contact_email(),
        }
    }
}

impl UserAgentSettings {
    /// Composes the User-Agent header value
    ///
    /// Format: `bot-name task-name/version (contact-email)`
    pub fn header_value(&self) -> String {
        format!(
            "{} {}/{} ({})",
            self.bot_name, self.task_name, self.version, self.contact_email
        )
    }
}

/// Embedded-data block location behavior
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractSettings {
    /// Id of the data script element, when the target page carries one
    /// (e.g. "__NEXT_DATA__"). When set, the id-qualified selector is tried
    /// first and the type-only selector is the fallback.
    #[serde(rename = "data-script-id", default)]
    pub data_script_id: Option<String>,
}

/// Report output behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSettings {
    /// Directory the timestamped CSV report is written into
    #[serde(rename = "report-dir", default = "default_report_dir")]
    pub report_dir: String,
}

fn default_report_dir() -> String {
    ".".to_string()
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            report_dir: default_report_dir(),
        }
    }
}

/// Everything one crawl run needs, fixed at startup
///
/// The field set and root URL come from the command line, the rest from
/// [`Settings`]. Immutable for the duration of the run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// The root sitemap index URL
    pub root_sitemap_url: Url,

    /// Fields to extract for every product; may be empty
    pub fields: Vec<ProductField>,

    /// Retry, identity, extraction and output settings
    pub settings: Settings,
}

impl CrawlConfig {
    /// Builds a crawl configuration, validating the root URL up front
    ///
    /// A malformed root URL makes product discovery impossible, so it is
    /// rejected here, before any network traffic.
    pub fn new(
        root_sitemap_url: &str,
        fields: Vec<ProductField>,
        settings: Settings,
    ) -> Result<Self, ConfigError> {
        let root_sitemap_url =
            Url::parse(root_sitemap_url).map_err(|source| ConfigError::InvalidSitemapUrl {
                url: root_sitemap_url.to_string(),
                source,
            })?;

        Ok(Self {
            root_sitemap_url,
            fields,
            settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_user_agent_header() {
        let ua = UserAgentSettings::default();
        assert_eq!(
            ua.header_value(),
            "mono-bot iamengineertask/1.0 (varebot@example.com)"
        );
    }

    #[test]
    fn test_default_fetch_settings() {
        let fetch = FetchSettings::default();
        assert_eq!(fetch.initial_backoff(), Duration::from_secs(1));
        assert_eq!(fetch.max_attempts, 5);
    }

    #[test]
    fn test_crawl_config_rejects_malformed_url() {
        let result = CrawlConfig::new("not a url", vec![], Settings::default());
        assert!(matches!(
            result,
            Err(ConfigError::InvalidSitemapUrl { .. })
        ));
    }

    #[test]
    fn test_crawl_config_accepts_https_url() {
        let config = CrawlConfig::new(
            "https://example.com/sitemap.xml",
            vec![ProductField::FullName],
            Settings::default(),
        )
        .unwrap();
        assert_eq!(config.root_sitemap_url.as_str(), "https://example.com/sitemap.xml");
        assert_eq!(config.fields, vec![ProductField::FullName]);
    }
}
