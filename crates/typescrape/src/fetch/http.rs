//! Async HTTP page source wrapping reqwest.
//!
//! Handles redirects and timeouts. Transport errors, 5xx and 429 go through
//! the retry policy before they reach the scraper; other 4xx fail at once.

use super::{retry, PageSource, RetryPolicy};
use crate::error::FetchError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("typescrape/", env!("CARGO_PKG_VERSION"));

/// HTTP client for documentation pages.
#[derive(Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    policy: RetryPolicy,
}

impl HttpSource {
    /// Create a client with the given per-request timeout and user agent.
    pub fn new(timeout_ms: u64, user_agent: &str, policy: RetryPolicy) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client, policy })
    }

    async fn get_once(&self, url: &Url) -> Result<String, FetchError> {
        debug!(%url, "fetching page");
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        resp.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        retry(
            self.policy,
            url.as_str(),
            || self.get_once(url),
            FetchError::is_retryable,
        )
        .await
    }
}
