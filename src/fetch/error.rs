use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Could not determine system cache directory")]
    CacheDirResolution,

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Cache path exists but is not a directory: '{0}'")]
    CacheDirNotADirectory(PathBuf),

    #[error("Failed to read cache file '{0}'")]
    CacheRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cache file '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode cache data from '{0}'")]
    CacheDecode(PathBuf, #[source] Box<bincode::error::DecodeError>),

    #[error("Failed to encode cache data")]
    CacheEncode(#[source] Box<bincode::error::EncodeError>),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body from {0}")]
    ResponseBody(String, #[source] reqwest::Error),

    #[error("Giving up on {url} after {attempts} attempts")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        #[source]
        source: Box<FetchError>,
    },

    #[error("Failed to parse JSON response from {url}")]
    JsonParse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl FetchError {
    /// `true` for failures a later attempt might not hit: connection problems,
    /// timeouts and the statuses listed in [`crate::fetch::retry::RETRY_STATUSES`].
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::NetworkRequest(_, e) => e.is_connect() || e.is_timeout(),
            FetchError::ResponseBody(_, e) => e.is_timeout(),
            FetchError::HttpStatus { status, .. } => {
                crate::fetch::retry::is_retryable_status(*status)
            }
            _ => false,
        }
    }

    /// `true` for errors of the cache layer rather than the network.
    pub fn is_cache(&self) -> bool {
        matches!(
            self,
            FetchError::CacheDirResolution
                | FetchError::CacheDirCreation(..)
                | FetchError::CacheDirNotADirectory(_)
                | FetchError::CacheRead(..)
                | FetchError::CacheWrite(..)
                | FetchError::CacheDecode(..)
                | FetchError::CacheEncode(_)
        )
    }
}
