//! Floating-point equivalence model.
//!
//! Each [`EqualityPolicy`] is a pure function of (observed, expected) that
//! yields a [`Verdict`]. The oracle turns non-passing verdicts into counted
//! failures with a policy-specific diagnostic.

use serde::{Deserialize, Serialize};

use crate::config::NanSignPolicy;

/// How an observed result is compared against the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", content = "epsilon", rename_all = "snake_case")]
pub enum EqualityPolicy {
    /// IEEE value equality: NaN never matches, `+0.0 == -0.0`.
    ExactValue,
    /// Byte equality of formatted text.
    ExactString,
    /// `|observed - expected| <= epsilon`. A NaN difference fails.
    ToleranceBounded(f64),
    /// Value equality and sign-bit equality. Separates `-0.0` from `+0.0`.
    SignAware,
    /// Observed must be NaN, any sign and payload.
    NanAny,
    /// Observed must be NaN; its sign bit must match the expected NaN's when
    /// [`NanSignPolicy::Enforce`] is configured.
    NanSignAware,
}

/// A value offered to [`EqualityPolicy::judge`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample<'a> {
    Float(f64),
    Text(&'a str),
}

/// Outcome of judging one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    ValueMismatch,
    /// Values compare equal but sign bits differ.
    SignMismatch,
    ToleranceExceeded {
        diff: f64,
        epsilon: f64,
    },
    NotNan,
    NanSignMismatch,
    /// Policy and sample kinds do not fit together (text under a float policy).
    KindMismatch,
}

impl Verdict {
    #[must_use]
    pub const fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Value and sign agreement computed separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedEquality {
    pub value_equal: bool,
    pub sign_equal: bool,
}

impl SignedEquality {
    #[must_use]
    pub const fn holds(self) -> bool {
        self.value_equal && self.sign_equal
    }
}

/// Dual check: IEEE value equality and sign-bit equality, reported independently.
#[must_use]
pub fn signed_equality(observed: f64, expected: f64) -> SignedEquality {
    SignedEquality {
        value_equal: observed == expected,
        sign_equal: observed.is_sign_negative() == expected.is_sign_negative(),
    }
}

impl EqualityPolicy {
    #[must_use]
    pub fn judge(self, observed: Sample<'_>, expected: Sample<'_>, nan_signs: NanSignPolicy) -> Verdict {
        match (observed, expected) {
            (Sample::Text(got), Sample::Text(want)) => self.judge_text(got, want),
            (Sample::Float(got), Sample::Float(want)) => self.judge_float(got, want, nan_signs),
            _ => Verdict::KindMismatch,
        }
    }

    #[must_use]
    pub fn judge_text(self, observed: &str, expected: &str) -> Verdict {
        match self {
            Self::ExactString if observed.as_bytes() == expected.as_bytes() => Verdict::Pass,
            Self::ExactString => Verdict::ValueMismatch,
            _ => Verdict::KindMismatch,
        }
    }

    #[must_use]
    pub fn judge_float(self, observed: f64, expected: f64, nan_signs: NanSignPolicy) -> Verdict {
        match self {
            Self::ExactValue => {
                if observed == expected {
                    Verdict::Pass
                } else {
                    Verdict::ValueMismatch
                }
            }
            Self::ToleranceBounded(epsilon) => {
                let diff = (observed - expected).abs();
                // NaN diff fails: the comparison is false.
                if diff <= epsilon {
                    Verdict::Pass
                } else {
                    Verdict::ToleranceExceeded { diff, epsilon }
                }
            }
            Self::SignAware => {
                let eq = signed_equality(observed, expected);
                if !eq.value_equal {
                    Verdict::ValueMismatch
                } else if !eq.sign_equal {
                    Verdict::SignMismatch
                } else {
                    Verdict::Pass
                }
            }
            Self::NanAny => {
                if observed.is_nan() {
                    Verdict::Pass
                } else {
                    Verdict::NotNan
                }
            }
            Self::NanSignAware => {
                if !observed.is_nan() {
                    Verdict::NotNan
                } else if nan_signs.enforced()
                    && observed.is_sign_negative() != expected.is_sign_negative()
                {
                    Verdict::NanSignMismatch
                } else {
                    Verdict::Pass
                }
            }
            Self::ExactString => Verdict::KindMismatch,
        }
    }
}

/// An expected float paired with the policy used to judge it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Expect {
    pub value: f64,
    pub policy: EqualityPolicy,
}

#[must_use]
pub const fn exact(value: f64) -> Expect {
    Expect {
        value,
        policy: EqualityPolicy::ExactValue,
    }
}

#[must_use]
pub const fn within(value: f64, epsilon: f64) -> Expect {
    Expect {
        value,
        policy: EqualityPolicy::ToleranceBounded(epsilon),
    }
}

#[must_use]
pub const fn signed(value: f64) -> Expect {
    Expect {
        value,
        policy: EqualityPolicy::SignAware,
    }
}

#[must_use]
pub const fn any_nan() -> Expect {
    Expect {
        value: f64::NAN,
        policy: EqualityPolicy::NanAny,
    }
}

/// Expect a NaN whose sign matches `value` (when enforcement is on).
#[must_use]
pub const fn nan(value: f64) -> Expect {
    Expect {
        value,
        policy: EqualityPolicy::NanSignAware,
    }
}

/// `f64 -> f32` that keeps a NaN's sign bit.
///
/// An `as` cast makes no promise about the sign of a NaN result, so NaNs are
/// rebuilt from the canonical quiet NaN with `copysign`.
#[must_use]
pub fn narrow(x: f64) -> f32 {
    if x.is_nan() {
        f32::NAN.copysign(if x.is_sign_negative() { -1.0 } else { 1.0 })
    } else {
        x as f32
    }
}

/// `f32 -> f64` that keeps a NaN's sign bit.
#[must_use]
pub fn widen(x: f32) -> f64 {
    if x.is_nan() {
        f64::NAN.copysign(if x.is_sign_negative() { -1.0 } else { 1.0 })
    } else {
        f64::from(x)
    }
}

/// Render like C's `%f`: six fractional digits, `nan`/`-nan`, `inf`/`-inf`.
#[must_use]
pub fn format_fixed(x: f64) -> String {
    if x.is_nan() {
        if x.is_sign_negative() { "-nan" } else { "nan" }.to_string()
    } else if x.is_infinite() {
        if x < 0.0 { "-inf" } else { "inf" }.to_string()
    } else {
        format!("{x:.6}")
    }
}

/// Render a float the way it would be written as a source literal, for
/// reconstructing the expression text of table-driven checks.
#[must_use]
pub fn literal(x: f64) -> String {
    if x.is_nan() {
        if x.is_sign_negative() { "-NAN" } else { "NAN" }.to_string()
    } else if x.is_infinite() {
        if x < 0.0 { "-INFINITY" } else { "INFINITY" }.to_string()
    } else {
        format!("{x:?}")
    }
}
