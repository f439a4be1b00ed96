use crate::{
    app::{App, Region},
    feeds::{FeedError, FeedId, FeedState},
    models::{ReferenceKey, Release, ResultSeries, ResultSnapshot, ResultsTree},
};

/// Events streamed from feed tasks and background builds into the app.
#[derive(Debug)]
pub enum DataEvent {
    /// A feed was started.
    Requested(FeedId),
    InfoLoaded(serde_json::Value),
    LatestLoaded {
        key: ReferenceKey,
        snapshot: ResultSnapshot,
    },
    SeriesLoaded {
        key: ReferenceKey,
        series: ResultSeries,
    },
    ReleasesLoaded {
        releases: Vec<Release>,
    },
    Failed {
        feed: FeedId,
        error: FeedError,
    },
    /// A detail tree finished building.
    DetailReady {
        generation: u64,
        key: ReferenceKey,
        tree: ResultsTree,
    },
}

/// Fold one event into the app. This is the only writer of the latest cache.
pub fn handle_data_event(app: &mut App, event: DataEvent) {
    match event {
        DataEvent::Requested(feed) => {
            match &feed {
                FeedId::Info => {
                    app.info.request();
                }
                FeedId::Releases => {
                    app.releases.request();
                }
                FeedId::Series(key) => {
                    if let Some(region) = region_for(app, key) {
                        region.series.request();
                    }
                }
                FeedId::Latest(key @ ReferenceKey::Tag(_)) => {
                    if !app.tags.contains(key) {
                        app.tags.push(key.clone());
                    }
                }
                FeedId::Latest(ReferenceKey::Branch(_)) => {}
            }
            app.feeds.entry(feed).or_default().request();
        }

        DataEvent::InfoLoaded(info) => {
            app.info.succeed(info);
            settle(app, FeedId::Info, None);
        }

        DataEvent::LatestLoaded { key, snapshot } => {
            if app.latest.insert(key.clone(), snapshot).is_some() {
                tracing::debug!(reference = %key, "replaced cached results");
            }
            settle(app, FeedId::Latest(key), None);
            app.refresh_info_links();
        }

        DataEvent::SeriesLoaded { key, series } => {
            if let Err(err) = series.latest() {
                tracing::warn!(reference = %key, %err, "series has no runs");
            }
            if let Some(region) = region_for(app, &key) {
                region.series.succeed(series);
            }
            settle(app, FeedId::Series(key), None);
            app.refresh_info_links();
        }

        DataEvent::ReleasesLoaded { releases } => {
            app.version = match releases.first() {
                Some(newest) => Region::for_key(ReferenceKey::tag(&newest.tag_name)),
                None => Region::default(),
            };
            app.releases.succeed(releases);
            settle(app, FeedId::Releases, None);
            app.refresh_info_links();
        }

        DataEvent::Failed { feed, error } => {
            match &feed {
                FeedId::Info => {
                    app.info.fail(error.clone());
                }
                FeedId::Releases => {
                    app.releases.fail(error.clone());
                }
                FeedId::Series(key) => {
                    if let Some(region) = region_for(app, key) {
                        region.series.fail(error.clone());
                    }
                }
                FeedId::Latest(_) => {}
            }
            settle(app, feed, Some(error));
        }

        DataEvent::DetailReady {
            generation,
            key,
            tree,
        } => {
            app.install_detail(generation, key, tree);
        }
    }
}

/// Summary region displaying `key`, if any.
fn region_for<'a>(app: &'a mut App, key: &ReferenceKey) -> Option<&'a mut Region> {
    if app.branch.key.as_ref() == Some(key) {
        Some(&mut app.branch)
    } else if app.version.key.as_ref() == Some(key) {
        Some(&mut app.version)
    } else {
        None
    }
}

fn settle(app: &mut App, feed: FeedId, error: Option<FeedError>) {
    let state = app.feeds.entry(feed).or_insert(FeedState::Requested);
    match error {
        Some(error) => state.fail(error),
        None => state.succeed(()),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_app;
    use crate::feeds::orchestrator::tests::snapshot;

    fn main_key() -> ReferenceKey {
        ReferenceKey::branch("master")
    }

    fn releases(tags: &[&str]) -> Vec<Release> {
        tags.iter()
            .map(|tag| Release {
                tag_name: tag.to_string(),
            })
            .collect()
    }

    fn series(commit: &str) -> ResultSeries {
        ResultSeries(vec![snapshot("old"), snapshot(commit)])
    }

    #[test]
    fn info_link_waits_for_cached_data_in_either_order() {
        // Series first, then latest.
        let (mut app, _rx) = test_app();
        handle_data_event(&mut app, DataEvent::Requested(FeedId::Series(main_key())));
        handle_data_event(&mut app, DataEvent::Requested(FeedId::Latest(main_key())));
        handle_data_event(
            &mut app,
            DataEvent::SeriesLoaded {
                key: main_key(),
                series: series("abc"),
            },
        );
        assert!(!app.branch.info_link);
        handle_data_event(
            &mut app,
            DataEvent::LatestLoaded {
                key: main_key(),
                snapshot: snapshot("abc"),
            },
        );
        assert!(app.branch.info_link);

        // Latest first, then series.
        let (mut app, _rx) = test_app();
        handle_data_event(&mut app, DataEvent::Requested(FeedId::Series(main_key())));
        handle_data_event(&mut app, DataEvent::Requested(FeedId::Latest(main_key())));
        handle_data_event(
            &mut app,
            DataEvent::LatestLoaded {
                key: main_key(),
                snapshot: snapshot("abc"),
            },
        );
        assert!(app.branch.info_link);
        handle_data_event(
            &mut app,
            DataEvent::SeriesLoaded {
                key: main_key(),
                series: series("abc"),
            },
        );
        assert!(app.branch.info_link);
        assert_eq!(app.branch.series.value().map(|s| s.len()), Some(2));
    }

    #[test]
    fn info_link_is_announced_once() {
        let (mut app, _rx) = test_app();
        for commit in ["a", "b"] {
            handle_data_event(
                &mut app,
                DataEvent::LatestLoaded {
                    key: main_key(),
                    snapshot: snapshot(commit),
                },
            );
        }
        assert!(!app.branch.refresh_info_link(&app.latest));
        assert_eq!(app.latest.get(&main_key()).unwrap().commit, "b");
    }

    #[test]
    fn version_region_uses_its_own_key() {
        let (mut app, _rx) = test_app();
        handle_data_event(&mut app, DataEvent::Requested(FeedId::Releases));
        handle_data_event(
            &mut app,
            DataEvent::ReleasesLoaded {
                releases: releases(&["v1.2.0", "v1.1.0", "v0.9.0"]),
            },
        );
        assert_eq!(app.version.key, Some(ReferenceKey::tag("v1.2.0")));

        // Data for the branch must not light up the version region.
        handle_data_event(
            &mut app,
            DataEvent::LatestLoaded {
                key: main_key(),
                snapshot: snapshot("abc"),
            },
        );
        assert!(app.branch.info_link);
        assert!(!app.version.info_link);

        handle_data_event(
            &mut app,
            DataEvent::LatestLoaded {
                key: ReferenceKey::tag("v1.2.0"),
                snapshot: snapshot("rel"),
            },
        );
        assert!(app.version.info_link);
    }

    #[test]
    fn tag_data_cached_before_releases_still_offers_link() {
        let (mut app, _rx) = test_app();
        handle_data_event(
            &mut app,
            DataEvent::LatestLoaded {
                key: ReferenceKey::tag("v1.2.0"),
                snapshot: snapshot("rel"),
            },
        );
        handle_data_event(
            &mut app,
            DataEvent::ReleasesLoaded {
                releases: releases(&["v1.2.0"]),
            },
        );
        assert!(app.version.info_link);
    }

    #[test]
    fn empty_releases_leave_version_region_without_key() {
        let (mut app, _rx) = test_app();
        handle_data_event(&mut app, DataEvent::Requested(FeedId::Releases));
        handle_data_event(
            &mut app,
            DataEvent::ReleasesLoaded {
                releases: Vec::new(),
            },
        );
        assert!(app.version.key.is_none());
        assert_eq!(app.releases.value().map(Vec::len), Some(0));
    }

    #[test]
    fn failures_only_mark_their_region() {
        let (mut app, _rx) = test_app();
        handle_data_event(&mut app, DataEvent::Requested(FeedId::Series(main_key())));
        handle_data_event(&mut app, DataEvent::Requested(FeedId::Releases));
        handle_data_event(
            &mut app,
            DataEvent::Failed {
                feed: FeedId::Series(main_key()),
                error: FeedError::Timeout("slow".into()),
            },
        );

        assert!(matches!(
            app.branch.series,
            FeedState::Failed(FeedError::Timeout(_))
        ));
        assert!(app.releases.is_pending());
        assert_eq!(app.feed_progress(), (1, 2));
        assert!(app.loading());
    }

    #[test]
    fn tag_requests_populate_versions_list() {
        let (mut app, _rx) = test_app();
        for tag in ["v1.2.0", "v1.1.0", "v1.2.0"] {
            handle_data_event(
                &mut app,
                DataEvent::Requested(FeedId::Latest(ReferenceKey::tag(tag))),
            );
        }
        assert_eq!(
            app.tags,
            vec![ReferenceKey::tag("v1.2.0"), ReferenceKey::tag("v1.1.0")]
        );
    }
}
