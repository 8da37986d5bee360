//! Assertion/oracle engine.
//!
//! Every check increments the attempted counter; a failing check also
//! increments the failure counter and emits one diagnostic line of the form
//! `<file>:<line>: <context><message>`. No check ever aborts the run.
//!
//! Work that was not attempted (a script the library cannot run, a rounding
//! mode the host refuses) is recorded as a [`Notice`]. Notices never touch
//! the counters.
//!
//! Checks are `#[track_caller]`, so a table runner that is itself
//! `#[track_caller]` reports the line of the group that invoked it.

use std::fmt;
use std::io::Write;
use std::ops::{Deref, DerefMut};
use std::panic::Location;

use serde::{Deserialize, Serialize};

use crate::config::{NanSignPolicy, OracleConfig};
use crate::equivalence::{EqualityPolicy, Expect, Verdict, format_fixed};

/// Attempted/failed totals for a run. Never reset while a run is in progress.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckCounter {
    pub attempted: u64,
    pub failed: u64,
}

impl CheckCounter {
    #[must_use]
    pub const fn passed(&self) -> u64 {
        self.attempted - self.failed
    }

    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Counts accumulated since `earlier` was taken.
    #[must_use]
    pub const fn since(&self, earlier: CheckCounter) -> CheckCounter {
        CheckCounter {
            attempted: self.attempted - earlier.attempted,
            failed: self.failed - earlier.failed,
        }
    }
}

/// Classification of a failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A boolean condition evaluated false.
    Condition,
    /// Observed value differs from the expected value.
    ValueMismatch,
    /// A NaN was expected (or a NaN sign) and not observed.
    NanExpectation,
    /// An atomic primitive returned or left the wrong value.
    AtomicPostcondition,
    /// Formatted or parsed text did not round-trip.
    RoundTrip,
}

/// One failed check, as recorded by the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// `file:line` of the check site.
    pub location: String,
    pub context: String,
    pub kind: FailureKind,
    pub message: String,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}{}", self.location, self.context, self.message)
    }
}

/// Why part of a run did not happen as scripted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// A script stopped at a primitive the library does not provide.
    ScriptSkipped,
    /// The host refused to enter a rounding mode.
    RoundingModeRejected,
}

/// A non-failing event worth reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub location: String,
    pub context: String,
    pub kind: NoticeKind,
    pub message: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}{}", self.location, self.context, self.message)
    }
}

/// Integers compared natively and reported as 64-bit signed quantities.
pub trait IntLike: Copy + PartialEq {
    /// C-style conversion to `long long` for reporting.
    fn as_i64(self) -> i64;
}

macro_rules! int_like {
    ($($t:ty),* $(,)?) => {
        $(
            impl IntLike for $t {
                #[inline]
                fn as_i64(self) -> i64 {
                    self as i64
                }
            }
        )*
    };
}

int_like!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl IntLike for bool {
    fn as_i64(self) -> i64 {
        i64::from(self)
    }
}

/// The oracle: counters, diagnostic context, and the failure sink.
pub struct Oracle {
    counter: CheckCounter,
    context: String,
    config: OracleConfig,
    sink: Box<dyn Write + Send>,
    failures: Vec<Failure>,
    notices: Vec<Notice>,
}

impl fmt::Debug for Oracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Oracle")
            .field("counter", &self.counter)
            .field("context", &self.context)
            .field("config", &self.config)
            .field("pending_failures", &self.failures.len())
            .field("pending_notices", &self.notices.len())
            .finish()
    }
}

impl Oracle {
    /// Oracle echoing diagnostics to stdout.
    #[must_use]
    pub fn new(config: OracleConfig) -> Self {
        Self::with_sink(config, Box::new(std::io::stdout()))
    }

    /// Oracle echoing diagnostics to an arbitrary writer.
    #[must_use]
    pub fn with_sink(config: OracleConfig, sink: Box<dyn Write + Send>) -> Self {
        Self {
            counter: CheckCounter::default(),
            context: String::new(),
            config,
            sink,
            failures: Vec::new(),
            notices: Vec::new(),
        }
    }

    /// Oracle that records failures without echoing them.
    #[must_use]
    pub fn silent(config: OracleConfig) -> Self {
        Self::with_sink(config.quiet(), Box::new(std::io::sink()))
    }

    #[must_use]
    pub fn counter(&self) -> CheckCounter {
        self.counter
    }

    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    #[must_use]
    pub fn nan_signs(&self) -> NanSignPolicy {
        self.config.nan_signs
    }

    #[must_use]
    pub fn config(&self) -> OracleConfig {
        self.config
    }

    pub fn set_context(&mut self, label: impl Into<String>) {
        self.context = label.into();
    }

    pub fn clear_context(&mut self) {
        self.context.clear();
    }

    /// Set the context label until the returned guard drops, then restore the
    /// previous label.
    pub fn scoped_context(&mut self, label: impl Into<String>) -> ContextScope<'_> {
        let previous = std::mem::replace(&mut self.context, label.into());
        ContextScope {
            oracle: self,
            previous,
        }
    }

    /// Failures recorded since the last drain. Counters are unaffected.
    pub fn take_failures(&mut self) -> Vec<Failure> {
        std::mem::take(&mut self.failures)
    }

    #[must_use]
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// Record a notice at the caller's location. Counters are unaffected.
    #[track_caller]
    pub fn notice(&mut self, kind: NoticeKind, message: impl Into<String>) {
        let location = Location::caller();
        self.notices.push(Notice {
            location: format!("{}:{}", location.file(), location.line()),
            context: self.context.clone(),
            kind,
            message: message.into(),
        });
    }

    /// Notices recorded since the last drain.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// `"<attempted> tests, <failed> failures"`.
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!("{} tests, {} failures", self.counter.attempted, self.counter.failed)
    }

    /// 0 iff no check failed.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        u8::from(self.counter.failed > 0)
    }

    /// Count one check; on failure build the message lazily and record it.
    #[track_caller]
    pub fn check_with(
        &mut self,
        passed: bool,
        kind: FailureKind,
        message: impl FnOnce() -> String,
    ) -> bool {
        self.counter.attempted += 1;
        if !passed {
            let location = Location::caller();
            self.fail(format!("{}:{}", location.file(), location.line()), kind, message());
        }
        passed
    }

    /// Plain boolean check.
    #[track_caller]
    pub fn check(&mut self, condition: bool, expr: &str) -> bool {
        self.check_with(condition, FailureKind::Condition, || format!("\"{expr}\" failed"))
    }

    /// Byte-exact string comparison.
    #[track_caller]
    pub fn check_str(&mut self, observed: &str, expected: &str) -> bool {
        let passed = EqualityPolicy::ExactString.judge_text(observed, expected).is_pass();
        self.check_with(passed, FailureKind::ValueMismatch, || {
            format!("expected \"{expected}\", got \"{observed}\"")
        })
    }

    /// Native integer equality, reported as 64-bit signed values.
    #[track_caller]
    pub fn check_int<T: IntLike>(&mut self, expr: &str, observed: T, expected: T) -> bool {
        self.check_with(observed == expected, FailureKind::ValueMismatch, || {
            format!(
                "{expr} failed, expected {}, got {}",
                expected.as_i64(),
                observed.as_i64()
            )
        })
    }

    /// Pointer identity.
    #[track_caller]
    pub fn check_ptr<T>(&mut self, expr: &str, observed: *const T, expected: *const T) -> bool {
        self.check_with(observed == expected, FailureKind::ValueMismatch, || {
            format!("{expr} failed, expected {expected:p}, got {observed:p}")
        })
    }

    /// Float comparison under the expectation's policy.
    #[track_caller]
    pub fn check_float(&mut self, expr: &str, observed: f64, expect: Expect) -> bool {
        let verdict = expect
            .policy
            .judge_float(observed, expect.value, self.config.nan_signs);
        let kind = match verdict {
            Verdict::NotNan | Verdict::NanSignMismatch => FailureKind::NanExpectation,
            _ => FailureKind::ValueMismatch,
        };
        self.check_with(verdict.is_pass(), kind, || {
            float_message(expr, observed, expect, verdict)
        })
    }

    fn fail(&mut self, location: String, kind: FailureKind, message: String) {
        self.counter.failed += 1;
        let failure = Failure {
            location,
            context: self.context.clone(),
            kind,
            message,
        };
        if self.config.echo_failures {
            let _ = writeln!(self.sink, "{failure}");
        }
        self.failures.push(failure);
    }
}

fn float_message(expr: &str, observed: f64, expect: Expect, verdict: Verdict) -> String {
    let expected = expect.value;
    match (expect.policy, verdict) {
        (_, Verdict::ToleranceExceeded { diff, epsilon }) => format!(
            "{expr} failed, expected {}, got {} (diff {} > {})",
            format_fixed(expected),
            format_fixed(observed),
            format_fixed(diff),
            format_fixed(epsilon)
        ),
        (EqualityPolicy::NanAny, _) => {
            format!("{expr} failed, expected any NAN, got {}", format_fixed(observed))
        }
        (EqualityPolicy::NanSignAware, _) => format!(
            "{expr} failed, expected {} (sign {}), got {} (sign {})",
            format_fixed(expected),
            u8::from(expected.is_sign_negative()),
            format_fixed(observed),
            u8::from(observed.is_sign_negative())
        ),
        _ => format!(
            "{expr} failed, expected {}, got {}",
            format_fixed(expected),
            format_fixed(observed)
        ),
    }
}

/// Guard returned by [`Oracle::scoped_context`].
pub struct ContextScope<'o> {
    oracle: &'o mut Oracle,
    previous: String,
}

impl Deref for ContextScope<'_> {
    type Target = Oracle;

    fn deref(&self) -> &Oracle {
        self.oracle
    }
}

impl DerefMut for ContextScope<'_> {
    fn deref_mut(&mut self) -> &mut Oracle {
        self.oracle
    }
}

impl Drop for ContextScope<'_> {
    fn drop(&mut self) {
        self.oracle.context = std::mem::take(&mut self.previous);
    }
}

/// Boolean check with the expression text captured.
#[macro_export]
macro_rules! check {
    ($oracle:expr, $cond:expr $(,)?) => {
        $oracle.check($cond, stringify!($cond))
    };
}

/// Integer check with the expression text captured.
#[macro_export]
macro_rules! check_int {
    ($oracle:expr, $x:expr, $expect:expr $(,)?) => {
        $oracle.check_int(stringify!($x), $x, $expect)
    };
}

/// Float check with the expression text captured. `$expect` is an
/// [`Expect`](crate::equivalence::Expect).
#[macro_export]
macro_rules! check_float {
    ($oracle:expr, $x:expr, $expect:expr $(,)?) => {
        $oracle.check_float(stringify!($x), $x, $expect)
    };
}

#[macro_export]
macro_rules! check_str {
    ($oracle:expr, $x:expr, $expect:expr $(,)?) => {
        $oracle.check_str($x, $expect)
    };
}

#[macro_export]
macro_rules! check_ptr {
    ($oracle:expr, $x:expr, $expect:expr $(,)?) => {
        $oracle.check_ptr(stringify!($x), $x, $expect)
    };
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::equivalence::{any_nan, exact, nan, signed, within};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    fn capturing() -> (Oracle, SharedBuf) {
        let buf = SharedBuf::default();
        (Oracle::with_sink(OracleConfig::default(), Box::new(buf.clone())), buf)
    }

    #[test]
    fn counts_every_check_and_only_failures_as_failed() {
        let (mut oracle, _) = capturing();
        assert!(check!(oracle, 1 + 1 == 2));
        assert!(!check!(oracle, 1 + 1 == 3));
        assert!(check_int!(oracle, 7_i64 / 2, 3));
        assert_eq!(oracle.counter(), CheckCounter { attempted: 3, failed: 1 });
        assert_eq!(oracle.summary_line(), "3 tests, 1 failures");
        assert_eq!(oracle.exit_code(), 1);
    }

    #[test]
    fn clean_run_exits_zero() {
        let (mut oracle, buf) = capturing();
        check!(oracle, true);
        assert_eq!(oracle.exit_code(), 0);
        assert!(buf.text().is_empty());
    }

    #[test]
    fn diagnostic_line_carries_location_context_and_expression() {
        let (mut oracle, buf) = capturing();
        oracle.set_context("FE_UPWARD ");
        check!(oracle, 2 < 1);
        let text = buf.text();
        assert!(text.starts_with(file!()), "{text}");
        assert!(text.ends_with(": FE_UPWARD \"2 < 1\" failed\n"), "{text}");
    }

    #[test]
    fn int_failures_report_signed_64_bit_values() {
        let (mut oracle, _) = capturing();
        check_int!(oracle, u64::MAX, 0);
        let failure = &oracle.failures()[0];
        assert_eq!(failure.message, "u64::MAX failed, expected 0, got -1");
        assert_eq!(failure.kind, FailureKind::ValueMismatch);
    }

    #[test]
    fn string_failure_message_quotes_both_sides() {
        let (mut oracle, _) = capturing();
        check_str!(oracle, "42.0", "42");
        assert_eq!(oracle.failures()[0].message, "expected \"42\", got \"42.0\"");
    }

    #[test]
    fn float_messages_follow_policy() {
        let (mut oracle, _) = capturing();
        oracle.check_float("f(x)", 2.0, exact(1.0));
        oracle.check_float("g(x)", 1.5, within(1.0, 0.25));
        oracle.check_float("h(x)", 0.0, any_nan());
        oracle.check_float("k(x)", 0.0, signed(-0.0));
        let messages: Vec<_> = oracle.take_failures().into_iter().map(|f| f.message).collect();
        assert_eq!(messages[0], "f(x) failed, expected 1.000000, got 2.000000");
        assert_eq!(
            messages[1],
            "g(x) failed, expected 1.000000, got 1.500000 (diff 0.500000 > 0.250000)"
        );
        assert_eq!(messages[2], "h(x) failed, expected any NAN, got 0.000000");
        assert_eq!(messages[3], "k(x) failed, expected -0.000000, got 0.000000");
        assert!(oracle.failures().is_empty());
        assert_eq!(oracle.counter().failed, 4);
    }

    #[test]
    fn nan_sign_enforcement_is_opt_in() {
        let mut lenient = Oracle::silent(OracleConfig::default());
        assert!(lenient.check_float("nan", f64::NAN, nan(-f64::NAN)));

        let mut strict = Oracle::silent(
            OracleConfig::default().with_nan_signs(NanSignPolicy::Enforce),
        );
        assert!(!strict.check_float("nan", f64::NAN, nan(-f64::NAN)));
        let failure = &strict.failures()[0];
        assert_eq!(failure.kind, FailureKind::NanExpectation);
        assert_eq!(failure.message, "nan failed, expected -nan (sign 1), got nan (sign 0)");
    }

    #[test]
    fn scoped_context_restores_previous_label() {
        let (mut oracle, _) = capturing();
        oracle.set_context("outer ");
        {
            let mut scope = oracle.scoped_context("FE_DOWNWARD ");
            assert_eq!(scope.context(), "FE_DOWNWARD ");
            check!(scope, false);
        }
        assert_eq!(oracle.context(), "outer ");
        assert_eq!(oracle.failures()[0].context, "FE_DOWNWARD ");
    }

    #[test]
    fn pointer_checks_compare_identity() {
        let (mut oracle, _) = capturing();
        let a = [1u8, 2];
        let p = a.as_ptr();
        assert!(check_ptr!(oracle, p, a.as_ptr()));
        assert!(!oracle.check_ptr("p + 1", p.wrapping_add(1), p));
    }

    #[test]
    fn notices_are_not_checks() {
        let (mut oracle, buf) = capturing();
        oracle.set_context("FE_UPWARD ");
        oracle.notice(NoticeKind::RoundingModeRejected, "host refused");
        assert_eq!(oracle.counter(), CheckCounter::default());
        assert!(buf.text().is_empty());
        let notices = oracle.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].context, "FE_UPWARD ");
        assert!(notices[0].location.starts_with(file!()));
        assert!(oracle.notices().is_empty());
    }

    #[test]
    fn draining_failures_keeps_counters() {
        let mut oracle = Oracle::silent(OracleConfig::default());
        check!(oracle, false);
        let drained = oracle.take_failures();
        assert_eq!(drained.len(), 1);
        assert_eq!(oracle.counter().failed, 1);
        assert_eq!(oracle.exit_code(), 1);
    }
}
