//! Error taxonomy for the scrape → resolve → dispatch pipeline.
//!
//! Each stage has its own error type so callers (and tests) can tell which
//! stage aborted a flow. [`Error`] wraps all of them for the orchestrator.

use thiserror::Error;

/// Expected element or attribute missing from the loaded watch page.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("no element matches selector `{selector}`")]
    MissingElement { selector: &'static str },

    #[error("element `{selector}` has no text")]
    EmptyText { selector: &'static str },

    #[error("no episode links match `{selector}`")]
    NoEpisodes { selector: &'static str },
}

/// Expected element missing from a fetched download page.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no title for download page {url}")]
    MissingTitle { url: String },

    #[error("no url for download page {url}")]
    MissingMediaUrl { url: String },
}

impl ResolveError {
    /// The download page this error refers to.
    pub fn url(&self) -> &str {
        match self {
            ResolveError::MissingTitle { url } | ResolveError::MissingMediaUrl { url } => url,
        }
    }
}

/// Network or RPC failure.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Curl {
        url: String,
        #[source]
        source: curl::Error,
    },

    #[error("{url} returned HTTP {code}")]
    Status { url: String, code: u32 },

    #[error("websocket: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("aria2 returned error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("malformed RPC response: {0}")]
    Protocol(String),

    #[error("RPC call timed out after {0} s")]
    Timeout(u64),

    #[error("RPC connection closed before a response arrived")]
    Closed,
}

/// Stored settings or derived endpoint are unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("stored settings are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid RPC address `{address}`: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported RPC scheme `{0}` (expected ws, wss, http or https)")]
    UnsupportedScheme(String),
}

/// Any failure that aborts a flow.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("value store: {0}")]
    Store(#[from] sqlx::Error),

    #[error("worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
