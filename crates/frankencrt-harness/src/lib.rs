//! Conformance harness for FrankenCRT.
//!
//! This crate provides:
//! - Test groups: table-driven checks of the host C runtime's string, stdio,
//!   stdlib, math and atomic entry points
//! - Runner: sequential group execution with per-group attribution
//! - Structured logs: JSONL events plus a hashed artifact index
//! - Reports: human-readable and machine-readable conformance reports
//! - Session: one CLI-shaped run writing the log, reports and artifact index

#![forbid(unsafe_code)]

pub mod error;
pub mod groups;
pub mod report;
pub mod runner;
pub mod session;
pub mod structured_log;

pub use error::HarnessError;
pub use groups::{GROUPS, Group};
pub use report::ConformanceReport;
pub use runner::{GroupResult, RunSummary, TestRunner};
pub use session::{RunOptions, run_session};
