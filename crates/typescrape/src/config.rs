//! Configuration loading and resolution.

use crate::emit::{EmitOptions, DEFAULT_PLACEHOLDER};
use crate::error::ConfigError;
use crate::fetch::http::DEFAULT_USER_AGENT;
use crate::fetch::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "TYPESCRAPE_CONFIG";

/// Config file picked up from the working directory.
pub const LOCAL_CONFIG: &str = "typescrape.toml";

/// Runtime settings, read from TOML. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page cache directory. Defaults to `~/.typescrape/cache`.
    pub cache_dir: Option<PathBuf>,
    /// Fetch attempts per page.
    pub retries: u32,
    /// Delay before the second attempt; doubles after that.
    pub retry_delay_ms: u64,
    /// Per-request timeout.
    pub timeout_ms: u64,
    /// Top-level pages scraped at once.
    pub concurrency: usize,
    pub user_agent: String,
    /// Type unioned onto every leaf scalar.
    pub placeholder_type: String,
    /// Module the placeholder type is imported from.
    pub placeholder_import: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: None,
            retries: 3,
            retry_delay_ms: 500,
            timeout_ms: 30_000,
            concurrency: 8,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            placeholder_type: DEFAULT_PLACEHOLDER.to_string(),
            placeholder_import: None,
        }
    }
}

impl Config {
    /// Load the config file found by [`resolve_config_path`], or the
    /// defaults when there is none.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match resolve_config_path(explicit) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(default_cache_dir)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries, Duration::from_millis(self.retry_delay_ms))
    }

    pub fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            placeholder: self.placeholder_type.clone(),
            placeholder_import: self.placeholder_import.clone(),
        }
    }
}

/// Resolve the config file path: explicit flag, then `TYPESCRAPE_CONFIG`,
/// then `./typescrape.toml` if it exists.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    let local = PathBuf::from(LOCAL_CONFIG);
    if local.exists() {
        return Some(local);
    }

    None
}

fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".typescrape")
        .join("cache")
}
