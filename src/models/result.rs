use serde::{Deserialize, Serialize};

use crate::feeds::FeedError;

/// One node of the suite tree as stored in a `latest.json` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteResult {
    pub name: String,
    pub passed: u64,
    pub ignored: u64,
    pub total: u64,
    #[serde(default)]
    pub tests: Vec<TestCase>,
    #[serde(default)]
    pub suites: Vec<SuiteResult>,
}

impl SuiteResult {
    /// `total - passed - ignored`, or `None` when the payload is inconsistent.
    pub fn failed(&self) -> Option<u64> {
        failed_count(self.total, self.passed, self.ignored)
    }

    /// Leaf containers have nothing to expand into.
    pub fn has_children(&self) -> bool {
        !self.suites.is_empty() || !self.tests.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub passed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteResults {
    #[serde(default)]
    pub suites: Vec<SuiteResult>,
}

/// A single run of the conformance suite against one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSnapshot {
    pub commit: String,
    pub total: u64,
    pub passed: u64,
    pub ignored: u64,
    /// Series entries only carry the summary, so this is usually empty there.
    #[serde(default)]
    pub results: SuiteResults,
}

impl ResultSnapshot {
    pub fn failed(&self) -> Option<u64> {
        failed_count(self.total, self.passed, self.ignored)
    }

    /// Percentage of passed tests, rounded to two decimals.
    pub fn conformance(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some((10000.0 * self.passed as f64 / self.total as f64).round() / 100.0)
    }
}

/// Historical results for a branch or tag, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSeries(pub Vec<ResultSnapshot>);

impl ResultSeries {
    pub fn latest(&self) -> Result<&ResultSnapshot, FeedError> {
        self.0.last().ok_or(FeedError::EmptySeries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Entry of the GitHub releases listing. Only the tag is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub tag_name: String,
}

fn failed_count(total: u64, passed: u64, ignored: u64) -> Option<u64> {
    total.checked_sub(passed)?.checked_sub(ignored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_is_derived_from_counters() {
        let suite = SuiteResult {
            name: "language".into(),
            passed: 100,
            ignored: 5,
            total: 110,
            tests: vec![],
            suites: vec![],
        };
        assert_eq!(suite.failed(), Some(5));
    }

    #[test]
    fn inconsistent_counters_have_no_failed_count() {
        let suite = SuiteResult {
            name: "broken".into(),
            passed: 10,
            ignored: 3,
            total: 12,
            tests: vec![],
            suites: vec![],
        };
        assert_eq!(suite.failed(), None);
    }

    #[test]
    fn optional_children_default_to_empty() {
        let suite: SuiteResult =
            serde_json::from_str(r#"{"name":"a","passed":1,"ignored":0,"total":1}"#).unwrap();
        assert!(suite.tests.is_empty());
        assert!(suite.suites.is_empty());
        assert!(!suite.has_children());
    }

    #[test]
    fn snapshot_requires_summary_fields() {
        let err = serde_json::from_str::<ResultSnapshot>(r#"{"commit":"abc","total":1}"#);
        assert!(err.is_err());
    }

    #[test]
    fn series_entries_parse_without_results() {
        let series: ResultSeries = serde_json::from_str(
            r#"[{"commit":"a","total":10,"passed":5,"ignored":1},
                {"commit":"b","total":10,"passed":8,"ignored":1}]"#,
        )
        .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.latest().unwrap().commit, "b");
    }

    #[test]
    fn empty_series_has_no_latest() {
        let series = ResultSeries::default();
        assert!(matches!(series.latest(), Err(FeedError::EmptySeries)));
    }

    #[test]
    fn conformance_rounds_to_two_decimals() {
        let snapshot = ResultSnapshot {
            commit: "abc".into(),
            total: 3,
            passed: 2,
            ignored: 0,
            results: SuiteResults::default(),
        };
        assert_eq!(snapshot.conformance(), Some(66.67));

        let empty = ResultSnapshot {
            total: 0,
            passed: 0,
            ..snapshot
        };
        assert_eq!(empty.conformance(), None);
    }

    #[test]
    fn releases_ignore_unknown_fields() {
        let releases: Vec<Release> = serde_json::from_str(
            r#"[{"tag_name":"v0.17","name":"Boa v0.17","draft":false}]"#,
        )
        .unwrap();
        assert_eq!(releases[0].tag_name, "v0.17");
    }
}
