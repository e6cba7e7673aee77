//! HTTP fetcher with retry and exponential backoff
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the identifying user agent string
//! - GET requests with a retrying backoff policy
//! - Respecting server-supplied Retry-After delays
//! - Error classification (retryable vs. terminal)

use crate::config::Settings;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// HTTP 200 with the response body
    Success {
        /// HTTP status code
        status_code: u16,
        /// Response body
        body: String,
    },

    /// Non-retryable HTTP status; surfaced immediately
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network-level failure on a single-attempt fetch
    NetworkError {
        /// Error description
        error: String,
    },

    /// Retryable failures continued past the attempt ceiling
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
    },
}

impl FetchResult {
    /// Returns true for a successful fetch
    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success { .. })
    }

    /// Short human-readable description of a failed fetch, for diagnostics
    pub fn failure_note(&self) -> String {
        match self {
            FetchResult::Success { status_code, .. } => format!("HTTP {}", status_code),
            FetchResult::HttpError { status_code } => format!("HTTP {}", status_code),
            FetchResult::NetworkError { error } => error.clone(),
            FetchResult::RetriesExhausted { attempts } => {
                format!("gave up after {} attempts", attempts)
            }
        }
    }
}

/// Retry behavior for a single URL
///
/// The backoff starts at `initial_backoff` and doubles after every retryable
/// failure; there is no jitter and no cap within the attempt ceiling, so the
/// baseline wait sequence is 1, 2, 4, 8, 16 seconds.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Wait before the first retry
    pub initial_backoff: Duration,

    /// Total attempts per URL before giving up
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_secs(1),
            max_attempts: 5,
        }
    }
}

/// Wait primitive used between retry attempts
///
/// Production code sleeps on the tokio timer; tests inject a recording
/// implementation so the backoff sequence can be asserted without delays.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer
#[derive(Debug, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Builds an HTTP client with the identifying user agent and timeouts
///
/// # Arguments
///
/// * `user_agent` - The User-Agent header value sent with every request
/// * `timeout` - Whole-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.to_string())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// HTTP fetcher with a per-URL retry/backoff policy
///
/// One fetcher (and one underlying client) serves the whole run; retry state
/// lives in local variables of each `fetch` call, so backoff is scoped to a
/// single URL and never shared across requests.
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl Fetcher {
    /// Creates a fetcher from run settings
    pub fn new(settings: &Settings) -> Result<Self, reqwest::Error> {
        Self::with_sleeper(settings, Arc::new(TokioSleeper))
    }

    /// Creates a fetcher with an explicit wait primitive
    ///
    /// The seam tests use to observe backoff waits instead of serving them.
    pub fn with_sleeper(
        settings: &Settings,
        sleeper: Arc<dyn Sleeper>,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(
            &settings.user_agent.header_value(),
            settings.fetch.request_timeout(),
        )?;

        let policy = RetryPolicy {
            initial_backoff: settings.fetch.initial_backoff(),
            max_attempts: settings.fetch.max_attempts,
        };

        Ok(Self {
            client,
            policy,
            sleeper,
        })
    }

    /// Fetches a URL, retrying transient failures with exponential backoff
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 200 | Return success immediately |
    /// | HTTP 429 / 5xx | Wait max(Retry-After, backoff), double backoff, retry |
    /// | Network error / timeout | Wait backoff, double backoff, retry |
    /// | Any other status | Return failure immediately (non-retryable) |
    ///
    /// After `max_attempts` retryable failures the fetch gives up and returns
    /// [`FetchResult::RetriesExhausted`]; callers treat that as "skip and
    /// continue", never as fatal to the whole crawl.
    pub async fn fetch(&self, url: &str) -> FetchResult {
        let mut backoff = self.policy.initial_backoff;
        let mut retries: u32 = 0;

        while retries < self.policy.max_attempts {
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::OK {
                        match response.text().await {
                            Ok(body) => {
                                return FetchResult::Success {
                                    status_code: status.as_u16(),
                                    body,
                                }
                            }
                            Err(e) => {
                                // Body transfer broke off mid-stream; counts
                                // as a network failure.
                                tracing::warn!(
                                    "Error reading body from {}: {}, retrying in {}s",
                                    url,
                                    e,
                                    backoff.as_secs()
                                );
                                self.sleeper.sleep(backoff).await;
                                backoff *= 2;
                                retries += 1;
                                continue;
                            }
                        }
                    }

                    if is_retryable_status(status) {
                        let wait = retry_wait(retry_after(&response), backoff);
                        tracing::warn!(
                            "Received {} from {}, retrying after {}s",
                            status.as_u16(),
                            url,
                            wait.as_secs()
                        );
                        self.sleeper.sleep(wait).await;
                        backoff *= 2;
                        retries += 1;
                        continue;
                    }

                    tracing::warn!("Giving up on {}: HTTP {}", url, status.as_u16());
                    return FetchResult::HttpError {
                        status_code: status.as_u16(),
                    };
                }
                Err(e) => {
                    tracing::warn!("Error fetching {}: {}, retrying in {}s", url, e, backoff.as_secs());
                    self.sleeper.sleep(backoff).await;
                    backoff *= 2;
                    retries += 1;
                }
            }
        }

        tracing::error!(
            "Failed to fetch {} after {} attempts",
            url,
            self.policy.max_attempts
        );
        FetchResult::RetriesExhausted { attempts: retries }
    }

    /// Fetches a URL with a single attempt and no backoff
    ///
    /// Same client, same headers as [`Fetcher::fetch`]; any non-200 status or
    /// network failure is returned to the caller immediately.
    pub async fn get_once(&self, url: &str) -> FetchResult {
        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();

                if status != StatusCode::OK {
                    return FetchResult::HttpError {
                        status_code: status.as_u16(),
                    };
                }

                match response.text().await {
                    Ok(body) => FetchResult::Success {
                        status_code: status.as_u16(),
                        body,
                    },
                    Err(e) => FetchResult::NetworkError {
                        error: e.to_string(),
                    },
                }
            }
            Err(e) => FetchResult::NetworkError {
                error: e.to_string(),
            },
        }
    }
}

/// HTTP 429 and every 5xx are worth retrying; everything else is not
fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Seconds value of the Retry-After header, when present and well-formed
fn retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// The wait before the next attempt: the server hint when it exceeds the
/// current backoff, the backoff otherwise
fn retry_wait(retry_after: Option<Duration>, backoff: Duration) -> Duration {
    match retry_after {
        Some(hint) if hint > backoff => hint,
        _ => backoff,
    }
}
