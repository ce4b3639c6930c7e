//! Page fetching: URL in, HTML document text out.
//!
//! The scraper only sees the [`PageSource`] trait. [`HttpSource`] talks to
//! the network (with [`retry`]), [`DiskCache`] memoizes any source on disk,
//! and [`MemorySource`] serves fixed pages for tests and offline runs.

pub mod cache;
pub mod http;
pub mod retry;

pub use cache::DiskCache;
pub use http::HttpSource;
pub use retry::{retry, RetryPolicy};

use crate::error::FetchError;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

/// Anything that can turn a URL into an HTML document.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// Fixed set of pages held in memory, counting every fetch.
#[derive(Debug, Default)]
pub struct MemorySource {
    pages: HashMap<String, String>,
    total: AtomicUsize,
    per_url: DashMap<String, usize>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `body` under `url`.
    pub fn with_page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), body.into());
        self
    }

    /// Total number of fetches served (hits and misses).
    pub fn fetch_count(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    /// Number of fetches for one URL.
    pub fn fetches_of(&self, url: &str) -> usize {
        self.per_url.get(url).map(|n| *n).unwrap_or(0)
    }
}

#[async_trait]
impl PageSource for MemorySource {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        self.total.fetch_add(1, Ordering::SeqCst);
        *self.per_url.entry(url.to_string()).or_insert(0) += 1;
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::Missing {
                url: url.to_string(),
            })
    }
}
