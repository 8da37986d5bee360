//! Report generation for conformance runs.

use serde::{Deserialize, Serialize};

use crate::runner::RunSummary;
use crate::structured_log::Outcome;

/// A conformance report for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConformanceReport {
    /// Report title.
    pub title: String,
    /// NaN-sign policy the run used (`ignore` or `enforce`).
    pub nan_preservation: String,
    /// Timestamp (UTC).
    pub timestamp: String,
    pub summary: RunSummary,
}

impl ConformanceReport {
    #[must_use]
    pub fn new(title: impl Into<String>, timestamp: impl Into<String>, summary: RunSummary) -> Self {
        Self {
            title: title.into(),
            nan_preservation: summary.nan_preservation.clone(),
            timestamp: timestamp.into(),
            summary,
        }
    }

    /// Render the report as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let totals = self.summary.totals;
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("- Run: {}\n", self.summary.run_id));
        out.push_str(&format!("- NaN preservation: {}\n", self.nan_preservation));
        out.push_str(&format!("- Timestamp: {}\n", self.timestamp));
        out.push_str(&format!("- Checks: {}\n", totals.attempted));
        out.push_str(&format!("- Passed: {}\n", totals.passed()));
        out.push_str(&format!("- Failed: {}\n", totals.failed));
        out.push_str(&format!("- Skipped scripts: {}\n\n", self.summary.skipped));

        out.push_str("| Group | Checks | Failed | Skipped | ms | Status |\n");
        out.push_str("|-------|--------|--------|---------|----|--------|\n");
        for g in &self.summary.groups {
            let status = match Outcome::for_group(g.attempted, g.failed, g.skipped) {
                Outcome::Pass => "PASS",
                Outcome::Fail => "FAIL",
                Outcome::Skip => "SKIP",
            };
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                g.name, g.attempted, g.failed, g.skipped, g.duration_ms, status
            ));
        }

        let failing: Vec<_> = self.summary.groups.iter().filter(|g| !g.failures.is_empty()).collect();
        if !failing.is_empty() {
            out.push_str("\n## Failures\n");
            for g in failing {
                out.push_str(&format!("\n### {}\n\n", g.name));
                for failure in &g.failures {
                    out.push_str(&format!("- `{failure}`\n"));
                }
            }
        }

        let noted: Vec<_> = self.summary.groups.iter().filter(|g| !g.notices.is_empty()).collect();
        if !noted.is_empty() {
            out.push_str("\n## Notices\n");
            for g in noted {
                out.push_str(&format!("\n### {}\n\n", g.name));
                for notice in &g.notices {
                    out.push_str(&format!("- `{notice}`\n"));
                }
            }
        }
        out
    }

    /// Render the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}
