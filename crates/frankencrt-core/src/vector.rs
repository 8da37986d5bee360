//! Data-driven test vectors.
//!
//! Groups describe their inputs and expectations as const tables and hand
//! them to a runner together with the function under test. The runner pushes
//! every operand through the opaque layer, invokes the function at the
//! requested precision, and routes the result through the equivalence model
//! into the oracle. One table can be run against both the `f64` and the `f32`
//! variant of a family.

use crate::equivalence::{Expect, literal, narrow, widen};
use crate::opaque;
use crate::oracle::{IntLike, Oracle};
use crate::rounding::RoundingMode;

/// Floating-point precision a family is instantiated at.
pub trait Precision: Copy {
    /// Suffix the C library uses for this precision (`""` or `"f"`).
    const SUFFIX: &'static str;

    fn from_f64(x: f64) -> Self;
    fn to_f64(self) -> f64;
}

impl Precision for f64 {
    const SUFFIX: &'static str = "";

    fn from_f64(x: f64) -> Self {
        x
    }

    fn to_f64(self) -> f64 {
        self
    }
}

impl Precision for f32 {
    const SUFFIX: &'static str = "f";

    fn from_f64(x: f64) -> Self {
        narrow(x)
    }

    fn to_f64(self) -> f64 {
        widen(self)
    }
}

/// Opaque operand at precision `F`.
#[must_use]
pub fn operand<F: Precision>(x: f64) -> F {
    F::from_f64(opaque::double(x))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unary {
    pub x: f64,
    pub expect: Expect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binary {
    pub x: f64,
    pub y: f64,
    pub expect: Expect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ternary {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub expect: Expect,
}

/// Float operand paired with an integer operand (`ldexp`, `scalbn`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaled {
    pub x: f64,
    pub n: i64,
    pub expect: Expect,
}

/// Float operand with an integer result (`lrint`, `ilogb`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integral {
    pub x: f64,
    pub expect: i64,
}

pub const fn unary(x: f64, expect: Expect) -> Unary {
    Unary { x, expect }
}

pub const fn binary(x: f64, y: f64, expect: Expect) -> Binary {
    Binary { x, y, expect }
}

pub const fn ternary(x: f64, y: f64, z: f64, expect: Expect) -> Ternary {
    Ternary { x, y, z, expect }
}

pub const fn scaled(x: f64, n: i64, expect: Expect) -> Scaled {
    Scaled { x, n, expect }
}

pub const fn integral(x: f64, expect: i64) -> Integral {
    Integral { x, expect }
}

fn call_name<F: Precision>(name: &str) -> String {
    format!("{name}{}", F::SUFFIX)
}

#[track_caller]
pub fn run_unary<F: Precision>(oracle: &mut Oracle, name: &str, f: impl Fn(F) -> F, cases: &[Unary]) {
    let name = call_name::<F>(name);
    for case in cases {
        let got = f(operand(case.x)).to_f64();
        oracle.check_float(&format!("{name}({})", literal(case.x)), got, case.expect);
    }
}

#[track_caller]
pub fn run_binary<F: Precision>(oracle: &mut Oracle, name: &str, f: impl Fn(F, F) -> F, cases: &[Binary]) {
    let name = call_name::<F>(name);
    for case in cases {
        let got = f(operand(case.x), operand(case.y)).to_f64();
        let expr = format!("{name}({}, {})", literal(case.x), literal(case.y));
        oracle.check_float(&expr, got, case.expect);
    }
}

#[track_caller]
pub fn run_ternary<F: Precision>(
    oracle: &mut Oracle,
    name: &str,
    f: impl Fn(F, F, F) -> F,
    cases: &[Ternary],
) {
    let name = call_name::<F>(name);
    for case in cases {
        let got = f(operand(case.x), operand(case.y), operand(case.z)).to_f64();
        let expr = format!(
            "{name}({}, {}, {})",
            literal(case.x),
            literal(case.y),
            literal(case.z)
        );
        oracle.check_float(&expr, got, case.expect);
    }
}

#[track_caller]
pub fn run_scaled<F: Precision>(oracle: &mut Oracle, name: &str, f: impl Fn(F, i64) -> F, cases: &[Scaled]) {
    let name = call_name::<F>(name);
    for case in cases {
        let got = f(operand(case.x), opaque::longlong(case.n)).to_f64();
        let expr = format!("{name}({}, {})", literal(case.x), case.n);
        oracle.check_float(&expr, got, case.expect);
    }
}

#[track_caller]
pub fn run_integral<F: Precision, R: IntLike + TryFrom<i64>>(
    oracle: &mut Oracle,
    name: &str,
    f: impl Fn(F) -> R,
    cases: &[Integral],
) {
    let name = call_name::<F>(name);
    for case in cases {
        let expr = format!("{name}({})", literal(case.x));
        let got = f(operand(case.x));
        match R::try_from(case.expect) {
            Ok(expected) => {
                oracle.check_int(&expr, got, expected);
            }
            // Expectation does not fit the return type: compare as 64-bit.
            Err(_) => {
                oracle.check_int(&expr, got.as_i64(), case.expect);
            }
        }
    }
}

/// Input with one optional expectation per rounding mode. A `None` entry means
/// the case is not exercised under that mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeCase {
    pub x: f64,
    pub to_nearest: Option<f64>,
    pub toward_zero: Option<f64>,
    pub downward: Option<f64>,
    pub upward: Option<f64>,
}

impl ModeCase {
    /// Expectations for nearest, toward-zero, downward, upward.
    pub const fn each(x: f64, nearest: f64, zero: f64, down: f64, up: f64) -> Self {
        Self {
            x,
            to_nearest: Some(nearest),
            toward_zero: Some(zero),
            downward: Some(down),
            upward: Some(up),
        }
    }

    /// Same result regardless of mode.
    pub const fn invariant(x: f64, value: f64) -> Self {
        Self::each(x, value, value, value, value)
    }

    pub const fn nearest_only(x: f64, value: f64) -> Self {
        Self {
            x,
            to_nearest: Some(value),
            toward_zero: None,
            downward: None,
            upward: None,
        }
    }

    #[must_use]
    pub const fn expect(&self, mode: RoundingMode) -> Option<f64> {
        match mode {
            RoundingMode::ToNearest => self.to_nearest,
            RoundingMode::TowardZero => self.toward_zero,
            RoundingMode::Downward => self.downward,
            RoundingMode::Upward => self.upward,
        }
    }
}

/// Float-result family under a given mode. NaN expectations use the NaN
/// policies; everything else is sign-aware so `rint(-0.4)` must be `-0.0`.
#[track_caller]
pub fn run_mode_float<F: Precision>(
    oracle: &mut Oracle,
    mode: RoundingMode,
    name: &str,
    f: impl Fn(F) -> F,
    cases: &[ModeCase],
) {
    let name = call_name::<F>(name);
    for case in cases {
        let Some(value) = case.expect(mode) else {
            continue;
        };
        let expect = if value.is_nan() {
            crate::equivalence::nan(value)
        } else {
            crate::equivalence::signed(value)
        };
        let got = f(operand(case.x)).to_f64();
        oracle.check_float(&format!("{name}({})", literal(case.x)), got, expect);
    }
}

/// Integer-result family under a given mode. NaN-valued expectations are
/// skipped: the integer result of a NaN conversion is unspecified.
#[track_caller]
pub fn run_mode_integral<F: Precision, R: IntLike + TryFrom<i64>>(
    oracle: &mut Oracle,
    mode: RoundingMode,
    name: &str,
    f: impl Fn(F) -> R,
    cases: &[ModeCase],
) {
    let name = call_name::<F>(name);
    for case in cases {
        let Some(value) = case.expect(mode) else {
            continue;
        };
        if value.is_nan() {
            continue;
        }
        let expr = format!("{name}({})", literal(case.x));
        let got = f(operand(case.x));
        let expected = value as i64;
        match R::try_from(expected) {
            Ok(expected) => {
                oracle.check_int(&expr, got, expected);
            }
            Err(_) => {
                oracle.check_int(&expr, got.as_i64(), expected);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OracleConfig;
    use crate::equivalence::{exact, signed, within};

    const HALVES: &[Unary] = &[unary(1.0, exact(0.5)), unary(-0.0, signed(-0.0))];

    #[test]
    fn unary_runner_checks_each_case_at_each_precision() {
        let mut oracle = Oracle::silent(OracleConfig::default());
        run_unary(&mut oracle, "half", |x: f64| x * 0.5, HALVES);
        run_unary(&mut oracle, "half", |x: f32| x * 0.5, HALVES);
        assert_eq!(oracle.counter().attempted, 4);
        assert_eq!(oracle.counter().failed, 0);
    }

    #[test]
    fn failures_name_the_precision_variant() {
        let mut oracle = Oracle::silent(OracleConfig::default());
        run_unary(&mut oracle, "half", |x: f32| x, &[unary(1.0, exact(0.5))]);
        let failure = &oracle.failures()[0];
        assert_eq!(failure.message, "halff(1.0) failed, expected 0.500000, got 1.000000");
        assert!(failure.location.contains("vector.rs"));
    }

    #[test]
    fn integral_runner_handles_narrow_return_types() {
        let mut oracle = Oracle::silent(OracleConfig::default());
        let cases = [integral(2.5, 2), integral(1e10, 10_000_000_000)];
        run_integral(&mut oracle, "trunc_i32", |x: f64| x as i32, &cases);
        // 1e10 saturates to i32::MAX and is compared as 64-bit.
        assert_eq!(oracle.counter().attempted, 2);
        assert_eq!(oracle.counter().failed, 1);
    }

    #[test]
    fn mode_cases_select_per_mode_expectation() {
        let case = ModeCase::each(3.5, 4.0, 3.0, 3.0, 4.0);
        assert_eq!(case.expect(RoundingMode::ToNearest), Some(4.0));
        assert_eq!(case.expect(RoundingMode::TowardZero), Some(3.0));
        assert_eq!(case.expect(RoundingMode::Downward), Some(3.0));
        assert_eq!(case.expect(RoundingMode::Upward), Some(4.0));
        assert_eq!(ModeCase::nearest_only(0.5, 0.0).expect(RoundingMode::Upward), None);

        let mut oracle = Oracle::silent(OracleConfig::default());
        run_mode_float(&mut oracle, RoundingMode::Upward, "ceil", |x: f64| x.ceil(), &[case]);
        run_mode_float(&mut oracle, RoundingMode::Upward, "ceil", |x: f64| x.ceil(), &[ModeCase::nearest_only(1.0, 9.0)]);
        assert_eq!(oracle.counter().attempted, 1);
        assert_eq!(oracle.counter().failed, 0);
    }

    #[test]
    fn binary_and_ternary_runners_build_expressions() {
        let mut oracle = Oracle::silent(OracleConfig::default());
        run_binary(&mut oracle, "sub", |x: f64, y| x - y, &[binary(1.0, f64::INFINITY, exact(0.0))]);
        run_ternary(&mut oracle, "mad", |x: f64, y, z| x * y + z, &[ternary(2.0, 3.0, 1.0, within(7.0, 0.0))]);
        let messages: Vec<_> = oracle.failures().iter().map(|f| f.message.clone()).collect();
        assert_eq!(messages, ["sub(1.0, INFINITY) failed, expected 0.000000, got -inf"]);
    }
}
