//! Error handling - taxonomy for the daemon boundary and registries

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// mmbot error hierarchy
#[derive(Debug, Error)]
pub enum Error {
    /// Missing strategy, price, or registry entry
    #[error("not found: {0}")]
    NotFound(String),

    /// Required RPC field absent or of the wrong shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The daemon answered with an `error` field instead of a result
    #[error("daemon error: {0}")]
    Remote(String),

    /// The RPC call itself failed (connection refused, timeout)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Price source has no usable quote
    #[error("price source unavailable: {0}")]
    Unavailable(String),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Daemon process lifecycle errors
    #[error("daemon process error: {0}")]
    Daemon(String),
}

impl Error {
    /// True for failures that indicate the daemon or its feeds are
    /// unreachable, as opposed to a bad request or missing entry.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Unavailable(_))
    }
}
