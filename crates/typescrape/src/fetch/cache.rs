//! Page caching: memoize fetched documents on disk.
//!
//! Each page is stored as `<cache_dir>/<base64url(sha256(url))>.html`, so
//! entry names have a fixed length whatever the URL. A hit never
//! touches the wrapped source; unreadable or unwritable entries are logged
//! and treated as misses.

use super::PageSource;
use crate::error::FetchError;
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use url::Url;

/// Page cache backed by the filesystem.
pub struct DiskCache<S> {
    inner: S,
    /// Base directory for cached pages.
    cache_dir: PathBuf,
}

impl<S> DiskCache<S> {
    /// Wrap `inner`, creating `cache_dir` if needed.
    pub fn new(inner: S, cache_dir: PathBuf) -> Result<Self, FetchError> {
        fs::create_dir_all(&cache_dir).map_err(|source| FetchError::Io {
            path: cache_dir.clone(),
            source,
        })?;
        Ok(Self { inner, cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// File that holds (or would hold) the page for `url`.
    pub fn entry_path(&self, url: &Url) -> PathBuf {
        self.cache_dir.join(entry_name(url))
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

fn entry_name(url: &Url) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_str().as_bytes());
    format!("{}.html", URL_SAFE_NO_PAD.encode(hasher.finalize()))
}

/// Remove every cached page under `cache_dir`. Returns the number of
/// entries removed; a missing directory counts as empty.
pub fn clear(cache_dir: &Path) -> Result<usize, FetchError> {
    let entries = match fs::read_dir(cache_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(source) => {
            return Err(FetchError::Io {
                path: cache_dir.to_path_buf(),
                source,
            })
        }
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("html") {
            fs::remove_file(&path).map_err(|source| FetchError::Io {
                path: path.clone(),
                source,
            })?;
            removed += 1;
        }
    }
    Ok(removed)
}

#[async_trait]
impl<S: PageSource> PageSource for DiskCache<S> {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let path = self.entry_path(url);
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => {
                debug!(%url, "cache hit");
                return Ok(body);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(%url, path = %path.display(), error = %e, "unreadable cache entry"),
        }

        let body = self.inner.fetch(url).await?;
        if let Err(e) = tokio::fs::write(&path, &body).await {
            warn!(%url, path = %path.display(), error = %e, "failed to write cache entry");
        }
        Ok(body)
    }
}
