//! Group execution engine.
//!
//! Runs registered groups in sequence against one oracle, attributing the
//! oracle's counters, failures and notices to each group and mirroring them
//! into the structured log.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use frankencrt_core::{CheckCounter, Failure, Notice, NoticeKind, Oracle};

use crate::error::HarnessError;
use crate::groups::Group;
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};

/// Per-group results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupResult {
    pub name: String,
    pub attempted: u64,
    pub failed: u64,
    pub duration_ms: u64,
    /// Atomic scripts cut short by a primitive the host lacks.
    pub skipped: u64,
    pub failures: Vec<Failure>,
    pub notices: Vec<Notice>,
}

/// Whole-run results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub nan_preservation: String,
    pub groups: Vec<GroupResult>,
    pub totals: CheckCounter,
    pub skipped: u64,
}

impl RunSummary {
    /// `"<attempted> tests, <failed> failures"`.
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!("{} tests, {} failures", self.totals.attempted, self.totals.failed)
    }

    /// `"<n> scripts skipped"`, or `None` when nothing was skipped.
    #[must_use]
    pub fn skip_line(&self) -> Option<String> {
        (self.skipped > 0).then(|| format!("{} scripts skipped", self.skipped))
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.totals.all_passed()
    }

    /// 0 iff no check failed.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        u8::from(!self.all_passed())
    }
}

/// Runs a selection of groups.
#[derive(Debug, Clone)]
pub struct TestRunner {
    pub run_id: String,
}

impl TestRunner {
    #[must_use]
    pub fn new(run_id: impl Into<String>) -> Self {
        Self { run_id: run_id.into() }
    }

    /// Run `groups` in order. The oracle's counters are never reset; each
    /// group is attributed the delta it produced.
    pub fn run(
        &self,
        oracle: &mut Oracle,
        groups: &[&Group],
        mut log: Option<&mut LogEmitter>,
    ) -> Result<RunSummary, HarnessError> {
        let policy = oracle.nan_signs().as_str();
        let start = oracle.counter();
        let mut results = Vec::with_capacity(groups.len());

        if let Some(log) = log.as_deref_mut() {
            log.emit_entry(
                LogEntry::new("", LogLevel::Info, "run_start")
                    .with_nan_preservation(policy)
                    .with_details(serde_json::json!({
                        "groups": groups.iter().map(|g| g.name).collect::<Vec<_>>(),
                    })),
            )
            .map_err(HarnessError::Log)?;
        }

        for group in groups {
            let before = oracle.counter();
            if let Some(log) = log.as_deref_mut() {
                log.emit_entry(LogEntry::new("", LogLevel::Info, "group_start").with_group(group.name))
                    .map_err(HarnessError::Log)?;
            }

            let started = Instant::now();
            oracle.clear_context();
            (group.run)(oracle);
            oracle.clear_context();
            let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

            let delta = oracle.counter().since(before);
            let failures = oracle.take_failures();
            let notices = oracle.take_notices();
            let skipped = notices.iter().filter(|n| n.kind == NoticeKind::ScriptSkipped).count() as u64;

            if let Some(log) = log.as_deref_mut() {
                for failure in &failures {
                    log.emit_entry(
                        LogEntry::new("", LogLevel::Error, "check_failed")
                            .with_group(group.name)
                            .with_context(failure.context.clone())
                            .with_location(failure.location.clone())
                            .with_outcome(Outcome::Fail)
                            .with_details(serde_json::json!({
                                "kind": failure.kind,
                                "message": failure.message,
                            })),
                    )
                    .map_err(HarnessError::Log)?;
                }
                for notice in &notices {
                    let (event, outcome) = match notice.kind {
                        NoticeKind::ScriptSkipped => ("script_skipped", Some(Outcome::Skip)),
                        NoticeKind::RoundingModeRejected => ("rounding_mode_rejected", None),
                    };
                    let mut entry = LogEntry::new("", LogLevel::Warn, event)
                        .with_group(group.name)
                        .with_context(notice.context.clone())
                        .with_location(notice.location.clone())
                        .with_details(serde_json::json!({ "message": notice.message }));
                    if let Some(outcome) = outcome {
                        entry = entry.with_outcome(outcome);
                    }
                    log.emit_entry(entry).map_err(HarnessError::Log)?;
                }
                let level = if delta.all_passed() && notices.is_empty() { LogLevel::Info } else { LogLevel::Warn };
                let mut entry = LogEntry::new("", level, "group_end")
                    .with_group(group.name)
                    .with_outcome(Outcome::for_group(delta.attempted, delta.failed, skipped))
                    .with_counts(delta.attempted, delta.failed)
                    .with_duration_ms(duration_ms);
                if skipped > 0 {
                    entry = entry.with_skipped(skipped);
                }
                log.emit_entry(entry).map_err(HarnessError::Log)?;
            }

            results.push(GroupResult {
                name: group.name.to_string(),
                attempted: delta.attempted,
                failed: delta.failed,
                duration_ms,
                skipped,
                failures,
                notices,
            });
        }

        let totals = oracle.counter().since(start);
        let skipped = results.iter().map(|g| g.skipped).sum();
        if let Some(log) = log.as_deref_mut() {
            log.emit_entry(
                LogEntry::new("", LogLevel::Info, "run_end")
                    .with_nan_preservation(policy)
                    .with_outcome(Outcome::from_failed(totals.failed))
                    .with_counts(totals.attempted, totals.failed)
                    .with_skipped(skipped),
            )
            .map_err(HarnessError::Log)?;
            log.flush().map_err(HarnessError::Log)?;
        }

        Ok(RunSummary {
            run_id: self.run_id.clone(),
            nan_preservation: policy.to_string(),
            groups: results,
            totals,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::ptr;
    use std::sync::Arc;
    use std::sync::atomic::AtomicPtr;

    use frankencrt_abi::interlocked_abi::HostInterlocked;
    use frankencrt_core::atomic::{Primitive, Script, verify_script};
    use frankencrt_core::{OracleConfig, check};

    use super::*;
    use crate::structured_log::validate_log_line;

    fn passes(oracle: &mut Oracle) {
        check!(oracle, 1 + 1 == 2);
        check!(oracle, oracle.context().is_empty());
    }

    fn fails_once(oracle: &mut Oracle) {
        oracle.set_context("left behind ");
        check!(oracle, 1 + 1 == 3);
    }

    fn pointer_or(oracle: &mut Oracle) {
        let null = ptr::null_mut::<u8>();
        let script = Script::new("PointerOr", null).then(Primitive::Or(null), null, null);
        let _ = verify_script::<AtomicPtr<u8>, _>(oracle, &HostInterlocked, &script);
    }

    const SKIPS: Group = Group {
        name: "skips",
        description: "a script the host cannot run",
        run: pointer_or,
    };
    const PASSES: Group = Group {
        name: "passes",
        description: "two passing checks",
        run: passes,
    };
    const FAILS: Group = Group {
        name: "fails",
        description: "one failing check",
        run: fails_once,
    };

    /// Cloneable in-memory sink.
    #[derive(Clone, Default)]
    struct Shared(Arc<std::sync::Mutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn attributes_counts_per_group() {
        let mut oracle = Oracle::silent(OracleConfig::default());
        let summary = TestRunner::new("r1")
            .run(&mut oracle, &[&FAILS, &PASSES], None)
            .unwrap();
        assert_eq!(summary.groups[0].attempted, 1);
        assert_eq!(summary.groups[0].failed, 1);
        assert_eq!(summary.groups[0].failures[0].context, "left behind ");
        // The context left by the failing group does not leak into the next.
        assert_eq!(summary.groups[1].failed, 0);
        assert_eq!(summary.summary_line(), "3 tests, 1 failures");
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn log_lines_validate() {
        let sink = Shared::default();
        let mut emitter = LogEmitter::to_writer(Box::new(sink.clone()), "r2");
        let mut oracle = Oracle::silent(OracleConfig::default());
        TestRunner::new("r2")
            .run(&mut oracle, &[&PASSES, &FAILS], Some(&mut emitter))
            .unwrap();
        let text = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
        let events: Vec<String> = text
            .lines()
            .enumerate()
            .map(|(i, line)| validate_log_line(line, i + 1).unwrap().event)
            .collect();
        assert_eq!(
            events,
            [
                "run_start",
                "group_start",
                "group_end",
                "group_start",
                "check_failed",
                "group_end",
                "run_end"
            ]
        );
    }

    #[test]
    fn skipped_script_is_reported_not_passed() {
        let sink = Shared::default();
        let mut emitter = LogEmitter::to_writer(Box::new(sink.clone()), "r3");
        let mut oracle = Oracle::silent(OracleConfig::default());
        let summary = TestRunner::new("r3")
            .run(&mut oracle, &[&SKIPS], Some(&mut emitter))
            .unwrap();

        let group = &summary.groups[0];
        assert_eq!(group.attempted, 0);
        assert_eq!(group.skipped, 1);
        assert_eq!(group.notices[0].kind, NoticeKind::ScriptSkipped);
        assert_eq!(group.notices[0].message, "PointerOr: Or is not provided for pointer cells; skipped 1 of 1 steps");
        assert!(group.notices[0].location.contains("runner.rs"));
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.skip_line().as_deref(), Some("1 scripts skipped"));

        let text = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
        let entries: Vec<LogEntry> = text
            .lines()
            .enumerate()
            .map(|(i, line)| validate_log_line(line, i + 1).unwrap())
            .collect();
        let events: Vec<&str> = entries.iter().map(|e| e.event.as_str()).collect();
        assert_eq!(events, ["run_start", "group_start", "script_skipped", "group_end", "run_end"]);
        assert_eq!(entries[2].outcome, Some(Outcome::Skip));
        assert_eq!(entries[2].level, LogLevel::Warn);
        assert_eq!(entries[3].outcome, Some(Outcome::Skip));
        assert_eq!(entries[3].skipped, Some(1));
        assert_eq!(entries[4].skipped, Some(1));
    }

    #[test]
    fn passing_summary_has_no_skip_line() {
        let mut oracle = Oracle::silent(OracleConfig::default());
        let summary = TestRunner::new("r4").run(&mut oracle, &[&PASSES], None).unwrap();
        assert_eq!(summary.skipped, 0);
        assert!(summary.groups[0].notices.is_empty());
        assert_eq!(summary.skip_line(), None);
    }
}
