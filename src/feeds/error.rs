use thiserror::Error;

/// Why a feed could not produce its payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("{url} returned {status}")]
    Status { url: String, status: u16 },

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("invalid payload: {0}")]
    Parse(String),

    #[error("result series is empty")]
    EmptySeries,

    #[error("no results loaded for {0}")]
    MissingCacheEntry(String),
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::Parse(err.to_string())
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            FeedError::Status {
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            FeedError::Parse(err.to_string())
        } else {
            FeedError::Network(err.to_string())
        }
    }
}
