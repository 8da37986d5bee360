//! One complete harness run: group selection, the oracle, the structured log,
//! reports, and the artifact index that ties them together.

use std::path::{Path, PathBuf};

use frankencrt_core::opaque::{self, OpaqueTable};
use frankencrt_core::{NanSignPolicy, Oracle, OracleConfig};

use crate::error::HarnessError;
use crate::groups;
use crate::report::ConformanceReport;
use crate::runner::{RunSummary, TestRunner};
use crate::structured_log::{ArtifactIndex, LogEmitter, now_utc};

/// Everything a run needs besides the groups themselves.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Group names to run; empty runs the whole registry.
    pub groups: Vec<String>,
    /// Overrides `FRANKENCRT_NAN_PRESERVATION` when set.
    pub nan_preservation: Option<NanSignPolicy>,
    pub log: Option<PathBuf>,
    pub report_json: Option<PathBuf>,
    pub report_md: Option<PathBuf>,
    pub artifact_index: Option<PathBuf>,
    /// Suppress per-failure lines on stdout.
    pub quiet: bool,
}

impl RunOptions {
    fn config(&self) -> OracleConfig {
        let config = OracleConfig::from_env();
        let config = match self.nan_preservation {
            Some(policy) => config.with_nan_signs(policy),
            None => config,
        };
        if self.quiet { config.quiet() } else { config }
    }
}

/// Run id derived from the wall clock, e.g. `run-20261019T101500Z`.
#[must_use]
pub fn default_run_id() -> String {
    let stamp: String = now_utc()
        .chars()
        .take(19)
        .filter(|c| !matches!(c, '-' | ':'))
        .collect();
    format!("run-{stamp}Z")
}

/// Execute a run and write every requested artifact.
pub fn run_session(options: &RunOptions, run_id: &str) -> Result<RunSummary, HarnessError> {
    let selected = groups::select(&options.groups)?;

    opaque::install(OpaqueTable::IDENTITY);
    let mut oracle = Oracle::new(options.config());

    let mut log = options
        .log
        .as_deref()
        .map(|path| LogEmitter::to_file(path, run_id).map_err(HarnessError::write(path)))
        .transpose()?;

    let summary = TestRunner::new(run_id).run(&mut oracle, &selected, log.as_mut())?;
    drop(log);

    let report = ConformanceReport::new("FrankenCRT conformance report", now_utc(), summary.clone());
    if let Some(path) = &options.report_json {
        write_file(path, &report.to_json())?;
    }
    if let Some(path) = &options.report_md {
        write_file(path, &report.to_markdown())?;
    }

    if let Some(index_path) = &options.artifact_index {
        let mut index = ArtifactIndex::new(run_id);
        let produced = [
            (options.log.as_deref(), "log"),
            (options.report_json.as_deref(), "report_json"),
            (options.report_md.as_deref(), "report_md"),
        ];
        for (path, kind) in produced {
            if let Some(path) = path {
                index.add_file(path, kind).map_err(HarnessError::read(path))?;
            }
        }
        write_file(index_path, &index.to_json()?)?;
    }

    Ok(summary)
}

fn write_file(path: &Path, contents: &str) -> Result<(), HarnessError> {
    std::fs::write(path, contents).map_err(HarnessError::write(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_id_is_compact_utc() {
        let id = default_run_id();
        assert!(id.starts_with("run-"));
        assert!(id.ends_with('Z'));
        assert!(!id.contains(':'));
        assert_eq!(id.len(), "run-20261019T101500Z".len());
    }

    #[test]
    fn cli_policy_overrides_environment() {
        let options = RunOptions {
            nan_preservation: Some(NanSignPolicy::Enforce),
            ..RunOptions::default()
        };
        assert_eq!(options.config().nan_signs, NanSignPolicy::Enforce);
    }

    #[test]
    fn unknown_group_fails_before_running() {
        let options = RunOptions {
            groups: vec!["no_such_group".into()],
            quiet: true,
            ..RunOptions::default()
        };
        let err = run_session(&options, "run-test").unwrap_err();
        assert!(matches!(err, HarnessError::UnknownGroup { .. }));
    }
}
