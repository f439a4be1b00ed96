use std::sync::Arc;

use tokio::sync::mpsc;

use crate::app::DataEvent;
use crate::models::{ReferenceKey, Release, resolve};

use super::{FeedError, FeedId, ResultSource};

/// Which feeds a releases listing unlocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    /// Newest release, whose history backs the "latest version" region.
    pub latest_version: Option<ReferenceKey>,
    /// Tags whose latest run should be fetched.
    pub tags: Vec<ReferenceKey>,
}

pub fn plan_releases(releases: &[Release]) -> ReleasePlan {
    let latest_version = releases
        .first()
        .map(|release| ReferenceKey::tag(&release.tag_name));

    let tags = releases
        .iter()
        .filter(|release| {
            let keep = resolve(&release.tag_name).has_data();
            if !keep {
                tracing::debug!(tag = %release.tag_name, "no results published for tag");
            }
            keep
        })
        .map(|release| ReferenceKey::tag(&release.tag_name))
        .collect();

    ReleasePlan {
        latest_version,
        tags,
    }
}

/// Issues every fetch and reports progress as [`DataEvent`]s.
///
/// Each feed runs in its own task; the tasks never touch shared state.
#[derive(Clone)]
pub struct Orchestrator {
    source: Arc<dyn ResultSource>,
    branch: ReferenceKey,
    tx: mpsc::UnboundedSender<DataEvent>,
}

impl Orchestrator {
    pub fn new(
        source: Arc<dyn ResultSource>,
        branch: ReferenceKey,
        tx: mpsc::UnboundedSender<DataEvent>,
    ) -> Self {
        Self { source, branch, tx }
    }

    /// Start the independent top-level feeds.
    pub fn start(&self) {
        tracing::info!(source = self.source.name(), branch = %self.branch, "starting feeds");
        self.spawn_info();
        self.spawn_latest(self.branch.clone());
        self.spawn_series(self.branch.clone());
        self.spawn_releases();
    }

    fn spawn_info(&self) {
        let this = self.requested(FeedId::Info);
        tokio::spawn(async move {
            match this.source.info().await {
                Ok(info) => this.send(DataEvent::InfoLoaded(info)),
                Err(error) => this.fail(FeedId::Info, error),
            }
        });
    }

    fn spawn_latest(&self, key: ReferenceKey) {
        let this = self.requested(FeedId::Latest(key.clone()));
        tokio::spawn(async move {
            match this.source.latest(&key).await {
                Ok(snapshot) => {
                    tracing::info!(reference = %key, commit = %snapshot.commit, "latest results loaded");
                    this.send(DataEvent::LatestLoaded { key, snapshot });
                }
                Err(error) => this.fail(FeedId::Latest(key), error),
            }
        });
    }

    fn spawn_series(&self, key: ReferenceKey) {
        let this = self.requested(FeedId::Series(key.clone()));
        tokio::spawn(async move {
            match this.source.series(&key).await {
                Ok(series) => {
                    tracing::info!(reference = %key, runs = series.len(), "result history loaded");
                    this.send(DataEvent::SeriesLoaded { key, series });
                }
                Err(error) => this.fail(FeedId::Series(key), error),
            }
        });
    }

    fn spawn_releases(&self) {
        let this = self.requested(FeedId::Releases);
        tokio::spawn(async move {
            match this.source.releases().await {
                Ok(releases) => {
                    let plan = plan_releases(&releases);
                    tracing::info!(
                        releases = releases.len(),
                        fetched = plan.tags.len(),
                        "releases loaded"
                    );
                    this.send(DataEvent::ReleasesLoaded { releases });
                    this.fan_out(plan);
                }
                Err(error) => this.fail(FeedId::Releases, error),
            }
        });
    }

    fn fan_out(&self, plan: ReleasePlan) {
        if let Some(key) = plan.latest_version {
            self.spawn_series(key);
        }
        for key in plan.tags {
            self.spawn_latest(key);
        }
    }

    /// Announce a feed and hand back a handle for its task.
    fn requested(&self, feed: FeedId) -> Self {
        self.send(DataEvent::Requested(feed));
        self.clone()
    }

    fn fail(&self, feed: FeedId, error: FeedError) {
        tracing::warn!(%feed, %error, "feed failed");
        self.send(DataEvent::Failed { feed, error });
    }

    fn send(&self, event: DataEvent) {
        // The receiver is gone only while shutting down.
        let _ = self.tx.send(event);
    }
}
