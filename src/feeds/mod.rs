pub mod error;
pub mod http;
pub mod orchestrator;
pub mod state;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::SourceConfig;
use crate::models::{ReferenceKey, Release, ResultSeries, ResultSnapshot};

pub use error::FeedError;
pub use orchestrator::Orchestrator;
pub use state::FeedState;

/// Identifies one logical data feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeedId {
    Info,
    Latest(ReferenceKey),
    Series(ReferenceKey),
    Releases,
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedId::Info => f.write_str("info"),
            FeedId::Latest(key) => write!(f, "{} latest", key),
            FeedId::Series(key) => write!(f, "{} results", key),
            FeedId::Releases => f.write_str("releases"),
        }
    }
}

/// Where result payloads come from.
#[async_trait]
pub trait ResultSource: Send + Sync {
    /// Opaque metadata about the test262 checkout.
    async fn info(&self) -> Result<serde_json::Value, FeedError>;

    /// Most recent full run for a branch or tag.
    async fn latest(&self, key: &ReferenceKey) -> Result<ResultSnapshot, FeedError>;

    /// Summary history for a branch or tag.
    async fn series(&self, key: &ReferenceKey) -> Result<ResultSeries, FeedError>;

    /// Published releases, newest first.
    async fn releases(&self) -> Result<Vec<Release>, FeedError>;

    /// Display name for this source (e.g. the base URL).
    fn name(&self) -> &str;
}

/// Construct the result source for the given configuration.
pub fn connect(config: &SourceConfig) -> Result<Arc<dyn ResultSource>, FeedError> {
    Ok(Arc::new(http::HttpSource::new(config)?))
}
