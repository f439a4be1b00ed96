use std::sync::Arc;

use super::result::{ResultSnapshot, SuiteResult, TestCase};
use super::status::TestOutcome;
use crate::format;

/// Group key shared by the top-level suites.
pub const ROOT_GROUP: &str = "info";

/// Expand/collapse behaviour among siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccordionPolicy {
    /// Opening a suite closes every other open suite under the same parent.
    pub per_level: bool,
}

impl Default for AccordionPolicy {
    fn default() -> Self {
        Self { per_level: true }
    }
}

#[derive(Debug, Clone)]
pub struct TreeOptions {
    /// Prefix for test source links, without a trailing slash.
    pub source_base_url: String,
    pub accordion: AccordionPolicy,
}

/// Counters exactly as stated by the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    pub passed: u64,
    pub ignored: u64,
    /// `None` when `passed + ignored` exceeds `total`.
    pub failed: Option<u64>,
    pub total: u64,
}

impl Counters {
    pub fn of(suite: &SuiteResult) -> Self {
        Self {
            passed: suite.passed,
            ignored: suite.ignored,
            failed: suite.failed(),
            total: suite.total,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.failed.is_some()
    }

    pub fn formatted(&self) -> FormattedCounters {
        FormattedCounters {
            passed: format::count(self.passed),
            ignored: format::count(self.ignored),
            failed: format::maybe_count(self.failed),
            total: format::count(self.total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedCounters {
    pub passed: String,
    pub ignored: String,
    pub failed: String,
    pub total: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRow {
    pub name: String,
    pub outcome: TestOutcome,
    pub link: String,
}

/// Display-ready view of one suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderableNode {
    /// Parent id followed by the suite name.
    pub id: String,
    /// Id of the parent; siblings share it.
    pub group: String,
    pub name: String,
    /// Path of the suite inside the test262 checkout, e.g. `test/language/expressions`.
    pub namespace: String,
    pub counters: Counters,
    pub formatted: FormattedCounters,
    pub expanded: bool,
    /// Whether the suite has sub-suites or direct tests to show.
    pub expandable: bool,
}

/// Render a single suite. Children are left for [`ResultsTree::expand`].
pub fn render(node: &SuiteResult, parent_id: &str, namespace: &str) -> RenderableNode {
    let counters = Counters::of(node);
    if !counters.is_consistent() {
        tracing::warn!(
            suite = %namespace,
            passed = node.passed,
            ignored = node.ignored,
            total = node.total,
            "suite counters exceed total"
        );
    }
    RenderableNode {
        id: format!("{}{}", parent_id, node.name),
        group: parent_id.to_string(),
        name: node.name.clone(),
        namespace: namespace.to_string(),
        counters,
        formatted: counters.formatted(),
        expanded: false,
        expandable: node.has_children(),
    }
}

/// Build the leaf rows for the direct tests of a suite.
pub fn render_tests(tests: &[TestCase], namespace: &str, source_base_url: &str) -> Vec<TestRow> {
    tests
        .iter()
        .map(|test| TestRow {
            name: test.name.clone(),
            outcome: TestOutcome::from_passed(test.passed),
            link: format!("{}/{}/{}.js", source_base_url, namespace, test.name),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Suite(usize),
    Test { suite: usize, index: usize },
}

#[derive(Debug)]
struct Entry {
    node: RenderableNode,
    parent: Option<usize>,
    /// Index path from the snapshot's top-level suites down to this suite.
    source: Vec<usize>,
    children: Vec<usize>,
    tests: Vec<TestRow>,
    materialized: bool,
}

/// Lazily materialized suite tree for one snapshot.
#[derive(Debug)]
pub struct ResultsTree {
    snapshot: Arc<ResultSnapshot>,
    options: TreeOptions,
    nodes: Vec<Entry>,
    root_ids: Vec<usize>,
}

impl ResultsTree {
    pub fn new(snapshot: Arc<ResultSnapshot>, options: TreeOptions) -> Self {
        let mut tree = Self {
            snapshot: Arc::clone(&snapshot),
            options,
            nodes: Vec::new(),
            root_ids: Vec::new(),
        };
        for (i, suite) in snapshot.results.suites.iter().enumerate() {
            let namespace = format!("test/{}", suite.name);
            let id = tree.push(render(suite, ROOT_GROUP, &namespace), None, vec![i]);
            tree.root_ids.push(id);
        }
        tree
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> &ResultSnapshot {
        &self.snapshot
    }

    #[cfg(test)]
    pub fn roots(&self) -> &[usize] {
        &self.root_ids
    }

    pub fn get(&self, id: usize) -> Option<&RenderableNode> {
        self.nodes.get(id).map(|e| &e.node)
    }

    pub fn parent(&self, id: usize) -> Option<usize> {
        self.nodes.get(id).and_then(|e| e.parent)
    }

    /// Materialized child suites. Empty until the node has been expanded once.
    #[cfg(test)]
    pub fn children(&self, id: usize) -> &[usize] {
        self.nodes.get(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// Materialized direct tests. Empty until the node has been expanded once.
    pub fn tests(&self, id: usize) -> &[TestRow] {
        self.nodes.get(id).map(|e| e.tests.as_slice()).unwrap_or(&[])
    }

    pub fn test(&self, suite: usize, index: usize) -> Option<&TestRow> {
        self.tests(suite).get(index)
    }

    /// Suite names from the root down to `id`.
    pub fn breadcrumbs(&self, id: usize) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let Some(entry) = self.nodes.get(cur) else {
                break;
            };
            names.push(entry.node.name.as_str());
            current = entry.parent;
        }
        names.reverse();
        names
    }

    /// Open a suite. Returns false if it has nothing to show.
    pub fn expand(&mut self, id: usize) -> bool {
        if !self.nodes.get(id).is_some_and(|e| e.node.expandable) {
            return false;
        }
        self.materialize(id);
        if self.options.accordion.per_level {
            for sibling in self.siblings(id) {
                self.nodes[sibling].node.expanded = false;
            }
        }
        self.nodes[id].node.expanded = true;
        true
    }

    pub fn collapse(&mut self, id: usize) {
        if let Some(entry) = self.nodes.get_mut(id) {
            entry.node.expanded = false;
        }
    }

    /// Toggle the expanded state of a node. Returns the new state.
    pub fn toggle_expanded(&mut self, id: usize) -> bool {
        match self.nodes.get(id) {
            Some(entry) if entry.node.expanded => {
                self.collapse(id);
                false
            }
            Some(_) => self.expand(id),
            None => false,
        }
    }

    pub fn collapse_all(&mut self) {
        for entry in &mut self.nodes {
            entry.node.expanded = false;
        }
    }

    /// Flat list of visible rows with their depth, respecting expanded state.
    pub fn visible_rows(&self) -> Vec<(Row, usize)> {
        let mut result = Vec::new();
        for &root_id in &self.root_ids {
            self.collect_visible(root_id, 0, &mut result);
        }
        result
    }

    /// Visible rows below top-level suites whose name contains `query` (case-insensitive).
    pub fn visible_rows_filtered(&self, query: &str) -> Vec<(Row, usize)> {
        let query_lower = query.to_lowercase();
        let mut result = Vec::new();
        for &root_id in &self.root_ids {
            if self.nodes[root_id]
                .node
                .name
                .to_lowercase()
                .contains(&query_lower)
            {
                self.collect_visible(root_id, 0, &mut result);
            }
        }
        result
    }

    fn collect_visible(&self, id: usize, depth: usize, result: &mut Vec<(Row, usize)>) {
        result.push((Row::Suite(id), depth));
        let entry = &self.nodes[id];
        if entry.node.expanded {
            for index in 0..entry.tests.len() {
                result.push((Row::Test { suite: id, index }, depth + 1));
            }
            for &child_id in &entry.children {
                self.collect_visible(child_id, depth + 1, result);
            }
        }
    }

    fn siblings(&self, id: usize) -> Vec<usize> {
        let peers = match self.nodes[id].parent {
            Some(parent) => &self.nodes[parent].children,
            None => &self.root_ids,
        };
        peers.iter().copied().filter(|&peer| peer != id).collect()
    }

    fn materialize(&mut self, id: usize) {
        if self.nodes[id].materialized {
            return;
        }
        let snapshot = Arc::clone(&self.snapshot);
        let source = self.nodes[id].source.clone();
        let Some(suite) = suite_at(&snapshot, &source) else {
            return;
        };

        let parent_id = self.nodes[id].node.id.clone();
        let namespace = self.nodes[id].node.namespace.clone();
        self.nodes[id].tests =
            render_tests(&suite.tests, &namespace, &self.options.source_base_url);

        let mut children = Vec::with_capacity(suite.suites.len());
        for (i, child) in suite.suites.iter().enumerate() {
            let child_namespace = format!("{}/{}", namespace, child.name);
            let mut child_source = source.clone();
            child_source.push(i);
            let node = render(child, &parent_id, &child_namespace);
            children.push(self.push(node, Some(id), child_source));
        }
        self.nodes[id].children = children;
        self.nodes[id].materialized = true;
    }

    fn push(&mut self, node: RenderableNode, parent: Option<usize>, source: Vec<usize>) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Entry {
            node,
            parent,
            source,
            children: Vec::new(),
            tests: Vec::new(),
            materialized: false,
        });
        id
    }
}

fn suite_at<'a>(snapshot: &'a ResultSnapshot, path: &[usize]) -> Option<&'a SuiteResult> {
    let (first, rest) = path.split_first()?;
    let mut suite = snapshot.results.suites.get(*first)?;
    for &i in rest {
        suite = suite.suites.get(i)?;
    }
    Some(suite)
}
