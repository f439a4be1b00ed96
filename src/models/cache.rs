use std::collections::HashMap;
use std::sync::Arc;

use super::reference::ReferenceKey;
use super::result::ResultSnapshot;
use crate::feeds::FeedError;

/// Latest snapshot per branch/tag for the current session.
///
/// Entries are only ever added or replaced.
#[derive(Debug, Default)]
pub struct LatestCache {
    entries: HashMap<ReferenceKey, Arc<ResultSnapshot>>,
}

impl LatestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a snapshot, replacing and returning any previous value for the key.
    pub fn insert(
        &mut self,
        key: ReferenceKey,
        snapshot: ResultSnapshot,
    ) -> Option<Arc<ResultSnapshot>> {
        self.entries.insert(key, Arc::new(snapshot))
    }

    pub fn get(&self, key: &ReferenceKey) -> Result<Arc<ResultSnapshot>, FeedError> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| FeedError::MissingCacheEntry(key.to_string()))
    }

    pub fn contains(&self, key: &ReferenceKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Cached references in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &ReferenceKey> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
