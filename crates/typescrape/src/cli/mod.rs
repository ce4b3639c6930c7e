//! CLI subcommand implementations for the typescrape binary.

pub mod cache_cmd;
pub mod generate_cmd;
pub mod inspect_cmd;
pub mod output;

use crate::config::Config;
use crate::fetch::{DiskCache, HttpSource, PageSource};
use anyhow::{Context, Result};
use tracing::debug;

/// Page source for a CLI run: HTTP with retries, behind the disk cache
/// unless `no_cache` is set.
pub fn build_source(config: &Config, no_cache: bool) -> Result<Box<dyn PageSource>> {
    let http = HttpSource::new(config.timeout_ms, &config.user_agent, config.retry_policy())
        .context("failed to build HTTP client")?;
    if no_cache {
        debug!("page cache disabled");
        return Ok(Box::new(http));
    }

    let dir = config.cache_dir();
    let cached = DiskCache::new(http, dir.clone())
        .with_context(|| format!("failed to open page cache at {}", dir.display()))?;
    debug!(cache_dir = %dir.display(), "page cache enabled");
    Ok(Box::new(cached))
}
