use std::ffi::c_int;

use frankencrt_abi::math_abi;
use frankencrt_core::equivalence::{Expect, any_nan, exact, literal, nan, signed, within};
use frankencrt_core::vector::{
    Binary, Precision, Ternary, Unary, binary, operand, run_binary, run_ternary, run_unary, ternary, unary,
};
use frankencrt_core::{Oracle, opaque};

use super::{host, text};

const INF: f64 = f64::INFINITY;

/// Explicit quiet NaNs of both signs; some runtimes' `NAN` macro is negative.
const P_NAN: f64 = f64::from_bits(0x7ff8_0000_0000_0000);
const N_NAN: f64 = f64::from_bits(0xfff8_0000_0000_0000);

const FMA: &[Ternary] = &[
    ternary(2.0, 3.0, 4.0, exact(10.0)),
    ternary(f64::NAN, 3.0, 4.0, nan(f64::NAN)),
    ternary(2.0, f64::NAN, 4.0, nan(f64::NAN)),
    ternary(2.0, 3.0, f64::NAN, nan(f64::NAN)),
];

const FABS: &[Unary] = &[
    unary(0.0, signed(0.0)),
    unary(-0.0, signed(0.0)),
    unary(3.125, exact(3.125)),
    unary(-3.125, exact(3.125)),
    unary(INF, exact(INF)),
    unary(-INF, exact(INF)),
    unary(P_NAN, nan(P_NAN)),
    unary(N_NAN, nan(P_NAN)),
];

const ERF: &[Unary] = &[
    unary(0.0, exact(0.0)),
    unary(1.0, within(0.842_701, 0.001)),
    unary(-1.0, within(-0.842_701, 0.001)),
    unary(2.0, within(0.995_322, 0.001)),
    unary(-2.0, within(-0.995_322, 0.001)),
    unary(INF, exact(1.0)),
    unary(-INF, exact(-1.0)),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

const ERFC: &[Unary] = &[
    unary(0.0, exact(1.0)),
    unary(1.0, within(0.157_299, 0.001)),
    unary(-1.0, within(1.842_701, 0.001)),
    unary(2.0, within(0.004_678, 0.001)),
    unary(-2.0, within(1.995_322, 0.001)),
    unary(INF, exact(0.0)),
    unary(-INF, exact(2.0)),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

const TGAMMA: &[Unary] = &[
    unary(0.0, exact(INF)),
    unary(-0.0, exact(-INF)),
    unary(0.5, within(1.772_454, 0.001)),
    unary(1.0, exact(1.0)),
    unary(1.5, within(0.886_227, 0.001)),
    unary(2.0, exact(1.0)),
    unary(3.3, within(2.683_437, 0.001)),
    unary(5.0, exact(24.0)),
    unary(-0.5, within(-3.544_908, 0.001)),
    unary(-1.0, any_nan()),
    unary(-1.5, within(2.363_272, 0.001)),
    unary(INF, exact(INF)),
    unary(-INF, any_nan()),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

/// log|Γ(x)| and, where defined, the sign of Γ(x).
const LGAMMA: &[(f64, Expect, Option<c_int>)] = &[
    (0.0, exact(INF), None),
    (-0.0, exact(INF), None),
    (0.5, within(0.572_365, 0.001), Some(1)),
    (1.0, exact(0.0), Some(1)),
    (1.5, within(-0.120_782, 0.001), Some(1)),
    (2.0, exact(0.0), Some(1)),
    (3.3, within(0.987_099, 0.001), Some(1)),
    (5.0, within(3.178_054, 0.001), Some(1)),
    (-0.5, within(1.265_512, 0.001), Some(-1)),
    (-1.0, exact(INF), Some(1)),
    (-1.5, within(0.860_047, 0.001), Some(1)),
    (INF, exact(INF), None),
    (-INF, exact(INF), None),
    (f64::NAN, nan(f64::NAN), None),
    (-f64::NAN, nan(-f64::NAN), None),
];

const NEXTAFTER: &[Binary] = &[
    binary(1.0, 2.0, exact(1.0 + f64::EPSILON)),
    binary(INF, INF, exact(INF)),
    binary(INF, -INF, exact(f64::MAX)),
    binary(-INF, -INF, exact(-INF)),
    binary(-INF, INF, exact(-f64::MAX)),
    binary(f64::NAN, 0.0, nan(f64::NAN)),
    binary(0.0, f64::NAN, nan(f64::NAN)),
    binary(-f64::NAN, 0.0, nan(-f64::NAN)),
    binary(0.0, -f64::NAN, nan(-f64::NAN)),
];

const NEXTAFTERF: &[Binary] = &[
    binary(1.0, 2.0, exact(1.0 + f32::EPSILON as f64)),
    binary(INF, INF, exact(INF)),
    binary(INF, -INF, exact(f32::MAX as f64)),
    binary(-INF, -INF, exact(-INF)),
    binary(-INF, INF, exact(-(f32::MAX as f64))),
    binary(f64::NAN, 0.0, nan(f64::NAN)),
    binary(0.0, f64::NAN, nan(f64::NAN)),
    binary(-f64::NAN, 0.0, nan(-f64::NAN)),
    binary(0.0, -f64::NAN, nan(-f64::NAN)),
];

const FDIM: &[Binary] = &[
    binary(2.0, 1.0, exact(1.0)),
    binary(1.0, 2.0, exact(0.0)),
    binary(INF, 1.0, exact(INF)),
    binary(1.0, -INF, exact(INF)),
    binary(-1.0, INF, exact(0.0)),
    binary(-INF, 1.0, exact(0.0)),
    binary(-INF, INF, exact(0.0)),
    binary(INF, -INF, exact(INF)),
    binary(f64::NAN, 0.0, nan(f64::NAN)),
    binary(0.0, f64::NAN, nan(f64::NAN)),
    binary(-f64::NAN, 0.0, nan(-f64::NAN)),
    binary(0.0, -f64::NAN, nan(-f64::NAN)),
];

/// A single NaN operand is ignored.
const FMAX: &[Binary] = &[
    binary(1.0, 0.0, exact(1.0)),
    binary(0.0, 1.0, exact(1.0)),
    binary(INF, 1.0, exact(INF)),
    binary(-INF, 1.0, exact(1.0)),
    binary(1.0, INF, exact(INF)),
    binary(1.0, -INF, exact(1.0)),
    binary(1.0, f64::NAN, exact(1.0)),
    binary(f64::NAN, 1.0, exact(1.0)),
    binary(f64::NAN, -f64::NAN, any_nan()),
];

const FMIN: &[Binary] = &[
    binary(1.0, 0.0, exact(0.0)),
    binary(0.0, 1.0, exact(0.0)),
    binary(0.0, -1.0, exact(-1.0)),
    binary(-1.0, 0.0, exact(-1.0)),
    binary(INF, 1.0, exact(1.0)),
    binary(-INF, 1.0, exact(-INF)),
    binary(1.0, INF, exact(1.0)),
    binary(1.0, -INF, exact(-INF)),
    binary(1.0, f64::NAN, exact(1.0)),
    binary(f64::NAN, 1.0, exact(1.0)),
    binary(f64::NAN, -f64::NAN, any_nan()),
];

const COPYSIGN: &[Binary] = &[
    binary(3.125, 1.0, within(3.125, 0.0001)),
    binary(3.125, -1.0, within(-3.125, 0.0001)),
    binary(-3.125, -1.0, within(-3.125, 0.0001)),
    binary(-3.125, 1.0, within(3.125, 0.0001)),
    binary(3.125, N_NAN, within(-3.125, 0.0001)),
    binary(INF, 1.0, exact(INF)),
    binary(INF, -1.0, exact(-INF)),
    binary(-INF, -1.0, exact(-INF)),
    binary(-INF, 1.0, exact(INF)),
    binary(P_NAN, -1.0, nan(N_NAN)),
    binary(N_NAN, P_NAN, nan(P_NAN)),
];

/// Expected `isgreater`, `isgreaterequal`, `isless`, `islessequal`,
/// `islessgreater`, `isunordered`.
type Ordering6 = [i32; 6];

const COMPARISONS: &[(f64, f64, Ordering6)] = &[
    (0.0, 0.0, [0, 1, 0, 1, 0, 0]),
    (1.0, 0.0, [1, 1, 0, 0, 1, 0]),
    (0.0, 1.0, [0, 0, 1, 1, 1, 0]),
    (INF, 0.0, [1, 1, 0, 0, 1, 0]),
    (-INF, 0.0, [0, 0, 1, 1, 1, 0]),
    (0.0, INF, [0, 0, 1, 1, 1, 0]),
    (0.0, -INF, [1, 1, 0, 0, 1, 0]),
    (0.0, f64::NAN, [0, 0, 0, 0, 0, 1]),
    (f64::NAN, 0.0, [0, 0, 0, 0, 0, 1]),
    (f64::NAN, f64::NAN, [0, 0, 0, 0, 0, 1]),
];

const COMPARISON_NAMES: [&str; 6] = [
    "isgreater",
    "isgreaterequal",
    "isless",
    "islessequal",
    "islessgreater",
    "isunordered",
];

pub(super) fn run(oracle: &mut Oracle) {
    run_ternary::<f64>(oracle, "fma", math_abi::fma, FMA);
    run_ternary::<f32>(oracle, "fma", math_abi::fmaf, FMA);
    run_unary::<f64>(oracle, "fabs", math_abi::fabs, FABS);
    run_unary::<f32>(oracle, "fabs", math_abi::fabsf, FABS);

    run_unary::<f64>(oracle, "erf", math_abi::erf, ERF);
    run_unary::<f32>(oracle, "erf", math_abi::erff, ERF);
    run_unary::<f64>(oracle, "erfc", math_abi::erfc, ERFC);
    run_unary::<f32>(oracle, "erfc", math_abi::erfcf, ERFC);
    run_unary::<f64>(oracle, "tgamma", math_abi::tgamma, TGAMMA);
    run_unary::<f32>(oracle, "tgamma", math_abi::tgammaf, TGAMMA);
    log_gamma::<f64>(oracle, "lgamma", "signgam", math_abi::lgamma);
    log_gamma::<f32>(oracle, "lgammaf", "signgam", math_abi::lgammaf);
    log_gamma::<f64>(oracle, "lgamma_r", "sign", |x| {
        let (value, sign) = math_abi::lgamma_r(x);
        (value, Some(sign))
    });
    log_gamma::<f32>(oracle, "lgammaf_r", "sign", |x| {
        let (value, sign) = math_abi::lgammaf_r(x);
        (value, Some(sign))
    });

    if let Some(tag) = host(oracle, text("foo")) {
        oracle.check_float("nan(\"foo\")", math_abi::nan(&tag), any_nan());
        oracle.check_float("nanf(\"foo\")", f64::from(math_abi::nanf(&tag)), any_nan());
    }

    run_binary::<f64>(oracle, "nextafter", math_abi::nextafter, NEXTAFTER);
    run_binary::<f32>(oracle, "nextafter", math_abi::nextafterf, NEXTAFTERF);
    run_binary::<f64>(oracle, "fdim", math_abi::fdim, FDIM);
    run_binary::<f32>(oracle, "fdim", math_abi::fdimf, FDIM);
    run_binary::<f64>(oracle, "fmax", math_abi::fmax, FMAX);
    run_binary::<f32>(oracle, "fmax", math_abi::fmaxf, FMAX);
    run_binary::<f64>(oracle, "fmin", math_abi::fmin, FMIN);
    run_binary::<f32>(oracle, "fmin", math_abi::fminf, FMIN);

    comparisons(oracle);

    run_binary::<f64>(oracle, "copysign", math_abi::copysign, COPYSIGN);
    run_binary::<f32>(oracle, "copysign", math_abi::copysignf, COPYSIGN);
}

/// `sign` names where the sign of Γ(x) is reported. `f` yields `None` for it
/// when the host does not expose one (no `signgam`).
#[track_caller]
fn log_gamma<F: Precision>(
    oracle: &mut Oracle,
    name: &str,
    sign: &str,
    f: impl Fn(F) -> (F, Option<c_int>),
) {
    for &(x, expect, expected_sign) in LGAMMA {
        let (value, got_sign) = f(operand(x));
        oracle.check_float(&format!("{name}({})", literal(x)), value.to_f64(), expect);
        if let (Some(expected), Some(got)) = (expected_sign, got_sign) {
            oracle.check_int(&format!("{sign} after {name}({})", literal(x)), got, expected);
        }
    }
}

/// The quiet comparison macros. None of them may treat NaN as ordered.
#[track_caller]
fn comparisons(oracle: &mut Oracle) {
    for &(x, y, expected) in COMPARISONS {
        let (a, b) = (opaque::double(x), opaque::double(y));
        let observed: Ordering6 = [
            i32::from(a > b),
            i32::from(a >= b),
            i32::from(a < b),
            i32::from(a <= b),
            i32::from(a < b || a > b),
            i32::from(a.is_nan() || b.is_nan()),
        ];
        for ((name, got), want) in COMPARISON_NAMES.iter().zip(observed).zip(expected) {
            let expr = format!("{name}({}, {})", literal(x), literal(y));
            oracle.check_int(&expr, got, want);
        }
    }
}
