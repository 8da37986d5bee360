//! Integration test: a full session writes a valid log, reports and index.
//!
//! Validates that:
//! 1. Every JSONL line written by a session passes schema validation.
//! 2. The JSON report round-trips to the returned summary.
//! 3. The artifact index hashes every produced file.
//!
//! Run: cargo test -p frankencrt-harness --test session_artifacts_test

use std::path::PathBuf;

use frankencrt_core::NanSignPolicy;
use frankencrt_harness::structured_log::{ArtifactIndex, sha256_hex, validate_log_file};
use frankencrt_harness::{RunOptions, run_session};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("frankencrt-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn session_writes_linked_artifacts() {
    let dir = scratch_dir("session");
    let options = RunOptions {
        groups: vec!["intrinsics".into(), "compiler_helpers".into()],
        nan_preservation: Some(NanSignPolicy::Enforce),
        log: Some(dir.join("run.jsonl")),
        report_json: Some(dir.join("report.json")),
        report_md: Some(dir.join("report.md")),
        artifact_index: Some(dir.join("index.json")),
        quiet: true,
    };

    let summary = run_session(&options, "run-session-test").unwrap();
    assert_eq!(summary.nan_preservation, "enforce");
    assert_eq!(summary.exit_code(), 0);

    let (lines, errors) = validate_log_file(&dir.join("run.jsonl")).unwrap();
    assert!(errors.is_empty(), "{errors:?}");
    // run_start, run_end and a start/end pair per group; nothing skipped.
    assert_eq!(summary.skipped, 0);
    assert_eq!(lines, 2 + 2 * summary.groups.len());

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.join("report.json")).unwrap()).unwrap();
    assert_eq!(report["summary"]["run_id"], "run-session-test");
    let markdown = std::fs::read_to_string(dir.join("report.md")).unwrap();
    assert!(markdown.contains("intrinsics"));

    let index: ArtifactIndex =
        serde_json::from_str(&std::fs::read_to_string(dir.join("index.json")).unwrap()).unwrap();
    assert_eq!(index.run_id, "run-session-test");
    let kinds: Vec<_> = index.artifacts.iter().map(|a| a.kind.as_str()).collect();
    assert_eq!(kinds, ["log", "report_json", "report_md"]);
    for artifact in &index.artifacts {
        let bytes = std::fs::read(&artifact.path).unwrap();
        assert_eq!(artifact.sha256, sha256_hex(&bytes));
        assert_eq!(artifact.size_bytes, Some(bytes.len() as u64));
    }

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn session_without_outputs_only_counts() {
    let options = RunOptions {
        groups: vec!["tokenize".into()],
        quiet: true,
        ..RunOptions::default()
    };
    let summary = run_session(&options, "run-bare").unwrap();
    assert_eq!(summary.groups.len(), 1);
    assert!(summary.totals.attempted > 0);
    assert!(summary.summary_line().ends_with(" failures"));
}
