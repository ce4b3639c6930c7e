//! Error types for fetching, scraping, emitting and configuration.

use std::path::PathBuf;

/// Failures of the page fetch layer.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("no page registered for {url}")]
    Missing { url: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Whether another attempt may succeed: transport failures, 5xx and 429.
    /// Other 4xx answers are permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request { .. } => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Missing { .. } | Self::Client(_) | Self::Io { .. } => false,
        }
    }
}

/// Errors that fail the scrape of one page (and so its whole session).
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("no title element on {url}")]
    MissingTitle { url: String },

    #[error("type `{text}` on {url} names a nested type but carries no link")]
    UnlinkedType { url: String, text: String },

    #[error("invalid link `{href}` on {url}: {source}")]
    InvalidUrl {
        url: String,
        href: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// The schema model and the emitter disagree about what a field can hold.
#[derive(thiserror::Error, Debug)]
pub enum EmitError {
    #[error("field `{field}` of `{schema}` carries an unexpected `{tag}` descriptor")]
    UnexpectedDescriptor {
        schema: String,
        field: String,
        tag: &'static str,
    },
}

/// Errors loading a configuration file.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Anything that can go wrong turning one page into declaration text.
#[derive(thiserror::Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Emit(#[from] EmitError),
}
