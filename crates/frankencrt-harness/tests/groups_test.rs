//! Integration test: registered groups against the host runtime.
//!
//! Validates that:
//! 1. Every registered group performs checks and restores the context label.
//! 2. Runtime-independent groups (integer helpers, atomics) pass outright.
//! 3. Per-group attribution sums to the run totals.
//!
//! Run: cargo test -p frankencrt-harness --test groups_test

use frankencrt_core::opaque::{self, OpaqueTable};
use frankencrt_core::{Oracle, OracleConfig};
use frankencrt_harness::{GROUPS, TestRunner, groups};

fn quiet_oracle() -> Oracle {
    opaque::install(OpaqueTable::IDENTITY);
    Oracle::silent(OracleConfig::default())
}

#[test]
fn every_group_attempts_checks() {
    let mut oracle = quiet_oracle();
    for group in GROUPS {
        let before = oracle.counter();
        (group.run)(&mut oracle);
        let delta = oracle.counter().since(before);
        assert!(delta.attempted > 0, "group {} performed no checks", group.name);
        assert!(
            oracle.context().is_empty(),
            "group {} left context {:?}",
            group.name,
            oracle.context()
        );
        oracle.take_failures();
    }
}

#[test]
fn atomics_and_integer_helpers_pass() {
    let mut oracle = quiet_oracle();
    let selected = groups::select(&["compiler_helpers".into(), "intrinsics".into()]).unwrap();
    let summary = TestRunner::new("groups-test").run(&mut oracle, &selected, None).unwrap();
    for group in &summary.groups {
        assert_eq!(group.failed, 0, "{}: {:#?}", group.name, group.failures);
    }
    assert_eq!(summary.exit_code(), 0);
}

#[test]
fn group_counts_sum_to_totals() {
    let mut oracle = quiet_oracle();
    let selected = groups::select(&[]).unwrap();
    let summary = TestRunner::new("groups-test").run(&mut oracle, &selected, None).unwrap();
    assert_eq!(summary.groups.len(), GROUPS.len());
    let attempted: u64 = summary.groups.iter().map(|g| g.attempted).sum();
    let failed: u64 = summary.groups.iter().map(|g| g.failed).sum();
    assert_eq!(attempted, summary.totals.attempted);
    assert_eq!(failed, summary.totals.failed);
    for group in &summary.groups {
        assert_eq!(group.failures.len() as u64, group.failed, "{}", group.name);
    }
}
