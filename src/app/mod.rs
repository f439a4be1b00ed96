use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    app::notifier::Notifier,
    config::{Config, SourceConfig},
    feeds::{FeedId, FeedState},
    models::{
        AccordionPolicy, LatestCache, ReferenceKey, Release, ResultSeries, ResultSnapshot,
        ResultsTree, Row, TreeOptions, TestRow,
    },
};

pub mod actions;
pub mod events;
pub mod notifier;

pub use actions::{handle_action, trigger_action};
pub use events::{DataEvent, handle_data_event};
pub use notifier::NotificationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Overview,
    Results,
    Detail,
}

/// A summary card backed by one result series.
#[derive(Debug, Default)]
pub struct Region {
    /// Unknown for the version region until releases are listed.
    pub key: Option<ReferenceKey>,
    pub series: FeedState<ResultSeries>,
    /// Set once the latest run for `key` is cached.
    pub info_link: bool,
}

impl Region {
    fn for_key(key: ReferenceKey) -> Self {
        Self {
            key: Some(key),
            ..Self::default()
        }
    }

    /// Offer the info link if its data exists. Returns true only the first time.
    fn refresh_info_link(&mut self, cache: &LatestCache) -> bool {
        if self.info_link {
            return false;
        }
        self.info_link = self.key.as_ref().is_some_and(|key| cache.contains(key));
        self.info_link
    }
}

/// Snapshot handed to a background task for tree building.
#[derive(Debug)]
pub struct PendingRender {
    pub generation: u64,
    pub key: ReferenceKey,
    pub snapshot: Arc<ResultSnapshot>,
}

pub struct DetailView {
    pub key: ReferenceKey,
    pub tree: ResultsTree,
}

/// Settings the UI needs after startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub source: SourceConfig,
    pub accordion: AccordionPolicy,
    pub browser_command: Option<String>,
}

impl Settings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            source: config.source.clone(),
            accordion: config.view.accordion(),
            browser_command: config.browser.command.clone(),
        }
    }

    pub fn tree_options(&self) -> TreeOptions {
        TreeOptions {
            source_base_url: self
                .source
                .test_source_base_url
                .trim_end_matches('/')
                .to_string(),
            accordion: self.accordion,
        }
    }
}

pub struct App {
    pub settings: Settings,
    /// Reserved metadata; stored but not interpreted.
    pub info: FeedState<serde_json::Value>,
    pub releases: FeedState<Vec<Release>>,
    pub latest: LatestCache,
    pub branch: Region,
    pub version: Region,
    /// Tags whose latest run was requested, newest first.
    pub tags: Vec<ReferenceKey>,
    /// Progress of every feed that has been started.
    pub feeds: BTreeMap<FeedId, FeedState<()>>,
    pub detail: Option<DetailView>,
    /// Key of the detail view being built, if any.
    pub detail_loading: Option<ReferenceKey>,
    pub render_generation: u64,
    pub pending_renders: Vec<PendingRender>,
    /// Link queued for the main loop to open.
    pub pending_open: Option<String>,
    pub active_panel: Panel,
    pub selected_overview_index: usize,
    pub selected_row_index: usize,
    pub rows_scroll_offset: usize,
    pub rows_viewport_height: usize,
    pub detail_scroll_offset: u16,
    pub event_tx: mpsc::UnboundedSender<DataEvent>,
    pub should_quit: bool,
    pub filter_active: bool,
    pub filter: tui_input::Input,
    pub spinner_tick: usize,
    pub notifier: Notifier,
}

impl App {
    pub fn new(settings: Settings) -> (Self, mpsc::UnboundedReceiver<DataEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let branch = Region::for_key(ReferenceKey::branch(&settings.source.branch));
        let app = Self {
            settings,
            info: FeedState::Idle,
            releases: FeedState::Idle,
            latest: LatestCache::new(),
            branch,
            version: Region::default(),
            tags: Vec::new(),
            feeds: BTreeMap::new(),
            detail: None,
            detail_loading: None,
            render_generation: 0,
            pending_renders: Vec::new(),
            pending_open: None,
            active_panel: Panel::Overview,
            selected_overview_index: 0,
            selected_row_index: 0,
            rows_scroll_offset: 0,
            rows_viewport_height: 0,
            detail_scroll_offset: 0,
            event_tx,
            should_quit: false,
            filter_active: false,
            filter: tui_input::Input::default(),
            spinner_tick: 0,
            notifier: Notifier::new(),
        };
        (app, event_rx)
    }

    /// References listed in the overview: the branch, the newest release, every
    /// other tag, then anything cached that the releases listing did not name.
    pub fn overview_keys(&self) -> Vec<ReferenceKey> {
        let mut keys: Vec<ReferenceKey> = self.branch.key.iter().cloned().collect();
        if let Some(version) = &self.version.key {
            keys.push(version.clone());
        }
        for tag in &self.tags {
            if !keys.contains(tag) {
                keys.push(tag.clone());
            }
        }
        let mut unlisted: Vec<&ReferenceKey> =
            self.latest.keys().filter(|key| !keys.contains(*key)).collect();
        unlisted.sort();
        keys.extend(unlisted.into_iter().cloned());
        keys
    }

    pub fn selected_overview_key(&self) -> Option<ReferenceKey> {
        self.overview_keys()
            .get(self.selected_overview_index)
            .cloned()
    }

    /// Queue a detail view for `key`, superseding any view still being built.
    pub fn request_details(&mut self, key: ReferenceKey) {
        match self.latest.get(&key) {
            Ok(snapshot) => {
                self.render_generation += 1;
                tracing::debug!(reference = %key, generation = self.render_generation, "detail requested");
                self.detail_loading = Some(key.clone());
                self.pending_renders.push(PendingRender {
                    generation: self.render_generation,
                    key,
                    snapshot,
                });
            }
            Err(err) => {
                tracing::warn!(%err, "detail requested before data arrived");
                self.notifier.error(err.to_string());
            }
        }
    }

    /// Install a built tree unless a newer request superseded it.
    pub fn install_detail(&mut self, generation: u64, key: ReferenceKey, tree: ResultsTree) -> bool {
        if generation != self.render_generation {
            tracing::debug!(reference = %key, generation, "discarding stale detail view");
            return false;
        }
        self.detail = Some(DetailView { key, tree });
        self.detail_loading = None;
        self.selected_row_index = 0;
        self.rows_scroll_offset = 0;
        self.detail_scroll_offset = 0;
        self.filter = tui_input::Input::default();
        self.active_panel = Panel::Results;
        true
    }

    /// Re-check every region's info link against the cache.
    fn refresh_info_links(&mut self) {
        for region in [&mut self.branch, &mut self.version] {
            if region.refresh_info_link(&self.latest)
                && let Some(key) = &region.key
            {
                self.notifier.ready(key.clone());
            }
        }
    }

    /// Returns visible rows of the detail tree respecting the current filter query.
    pub fn visible_rows(&self) -> Vec<(Row, usize)> {
        let Some(detail) = &self.detail else {
            return Vec::new();
        };
        let filter_query = self.filter.value();

        if filter_query.is_empty() {
            detail.tree.visible_rows()
        } else {
            detail.tree.visible_rows_filtered(filter_query)
        }
    }

    pub fn selected_row(&self) -> Option<Row> {
        self.visible_rows()
            .get(self.selected_row_index)
            .map(|&(row, _)| row)
    }

    pub fn selected_test(&self) -> Option<&TestRow> {
        let Some(Row::Test { suite, index }) = self.selected_row() else {
            return None;
        };
        self.detail.as_ref()?.tree.test(suite, index)
    }

    /// Number of started feeds and how many of them have settled.
    pub fn feed_progress(&self) -> (usize, usize) {
        let settled = self.feeds.values().filter(|f| f.is_settled()).count();
        (settled, self.feeds.len())
    }

    pub fn loading(&self) -> bool {
        self.feeds.values().any(FeedState::is_pending) || self.detail_loading.is_some()
    }

    fn adjust_rows_scroll(&mut self) {
        if self.rows_viewport_height == 0 {
            return;
        }
        if self.selected_row_index < self.rows_scroll_offset {
            self.rows_scroll_offset = self.selected_row_index;
        } else if self.selected_row_index >= self.rows_scroll_offset + self.rows_viewport_height {
            self.rows_scroll_offset = self.selected_row_index - self.rows_viewport_height + 1;
        }
    }
}

#[cfg(test)]
pub(crate) fn test_app() -> (App, mpsc::UnboundedReceiver<DataEvent>) {
    App::new(Settings::from_config(&Config::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::orchestrator::tests::snapshot;

    #[test]
    fn overview_lists_branch_version_then_tags() {
        let (mut app, _rx) = test_app();
        app.version.key = Some(ReferenceKey::tag("v0.17"));
        app.tags = vec![ReferenceKey::tag("v0.17"), ReferenceKey::tag("v0.16")];
        assert_eq!(
            app.overview_keys(),
            vec![
                ReferenceKey::branch("master"),
                ReferenceKey::tag("v0.17"),
                ReferenceKey::tag("v0.16"),
            ]
        );
    }

    #[test]
    fn overview_appends_cached_references_missing_from_releases() {
        let (mut app, _rx) = test_app();
        app.tags = vec![ReferenceKey::tag("v0.17")];
        app.latest.insert(ReferenceKey::branch("master"), snapshot("a"));
        app.latest.insert(ReferenceKey::tag("v0.17"), snapshot("b"));
        app.latest.insert(ReferenceKey::tag("v0.9"), snapshot("c"));
        app.latest.insert(ReferenceKey::tag("v0.10"), snapshot("d"));

        assert_eq!(
            app.overview_keys(),
            vec![
                ReferenceKey::branch("master"),
                ReferenceKey::tag("v0.17"),
                ReferenceKey::tag("v0.10"),
                ReferenceKey::tag("v0.9"),
            ]
        );
    }

    #[test]
    fn details_for_missing_key_notify_instead_of_rendering() {
        let (mut app, _rx) = test_app();
        app.request_details(ReferenceKey::branch("master"));
        assert!(app.pending_renders.is_empty());
        assert_eq!(
            app.notifier.recent().map(|n| n.kind),
            Some(NotificationKind::Error)
        );
    }

    #[test]
    fn stale_detail_views_are_discarded() {
        let (mut app, _rx) = test_app();
        let main = ReferenceKey::branch("master");
        let tag = ReferenceKey::tag("v0.17");
        app.latest.insert(main.clone(), snapshot("main"));
        app.latest.insert(tag.clone(), snapshot("tag"));

        app.request_details(main.clone());
        app.request_details(tag.clone());
        let renders: Vec<_> = app.pending_renders.drain(..).collect();
        assert_eq!(renders.len(), 2);

        let options = app.settings.tree_options();
        let newer = &renders[1];
        assert!(app.install_detail(
            newer.generation,
            newer.key.clone(),
            ResultsTree::new(Arc::clone(&newer.snapshot), options.clone()),
        ));
        let older = &renders[0];
        assert!(!app.install_detail(
            older.generation,
            older.key.clone(),
            ResultsTree::new(Arc::clone(&older.snapshot), options),
        ));

        let detail = app.detail.as_ref().unwrap();
        assert_eq!(detail.key, tag);
        assert_eq!(detail.tree.snapshot().commit, "tag");
        assert!(app.detail_loading.is_none());
    }
}
