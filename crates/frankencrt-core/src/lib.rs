//! # frankencrt-core
//!
//! Verification engine for runtime-library conformance checking.
//!
//! This crate judges externally supplied numeric and atomic primitives against
//! known-correct expectations; it never computes a result itself. It provides:
//!
//! - [`oracle`]: check counters, the diagnostic context, and failure reporting.
//! - [`equivalence`]: floating-point equality policies (exact, tolerance,
//!   sign-aware, NaN-any, NaN-sign-aware, exact text).
//! - [`opaque`]: identity wrappers that hide literal operands from the optimizer.
//! - [`rounding`]: the rounding-mode driver and its restore-on-exit guard.
//! - [`atomic`]: scripted contract checks for interlocked and bit-scan primitives.
//! - [`vector`]: table runners tying the above together.
//!
//! No `unsafe` code is permitted at the crate level; host bindings live in
//! `frankencrt-abi`.

#![deny(unsafe_code)]

pub mod atomic;
pub mod config;
pub mod equivalence;
pub mod opaque;
pub mod oracle;
pub mod rounding;
pub mod vector;

pub use config::{NanSignPolicy, OracleConfig};
pub use equivalence::{EqualityPolicy, Expect, Verdict};
pub use oracle::{CheckCounter, Failure, FailureKind, Notice, NoticeKind, Oracle};
pub use rounding::{FloatEnvironment, RoundingDriver, RoundingMode};
