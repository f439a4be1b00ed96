use ratatui::style::Color;

use crate::ui::theme;

/// Visual class of a single test row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestOutcome {
    Passed,
    Failed,
}

impl TestOutcome {
    pub fn from_passed(passed: bool) -> Self {
        if passed {
            TestOutcome::Passed
        } else {
            TestOutcome::Failed
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TestOutcome::Passed => "✔",
            TestOutcome::Failed => "✘",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            TestOutcome::Passed => theme::GREEN,
            TestOutcome::Failed => theme::RED,
        }
    }
}
