use frankencrt_abi::math_abi;
use frankencrt_core::equivalence::{Expect, any_nan, exact, literal, nan, within};
use frankencrt_core::vector::{Binary, Precision, binary, operand, run_binary};
use frankencrt_core::Oracle;

const INF: f64 = f64::INFINITY;
const P2_34: f64 = 17_179_869_184.0;
const P2_34_PLUS: f64 = 17_180_917_760.0;
const P2_120: f64 = 1_329_227_995_784_915_872_903_807_060_280_344_576.0;
const P2_120_PLUS: f64 = 1_330_526_069_999_549_579_810_939_684_362_649_600.0;
const P2_110: f64 = 1_298_074_214_633_706_907_132_624_082_305_024.0;

/// Input, fractional part, integral part.
const MODF: &[(f64, Expect, Expect)] = &[
    (2.1, within(0.1, 0.001), exact(2.0)),
    (-2.1, within(-0.1, 0.001), exact(-2.0)),
    (P2_34, exact(0.0), exact(P2_34)),
    (P2_120, exact(0.0), exact(P2_120)),
    (INF, exact(0.0), exact(INF)),
    (-INF, exact(0.0), exact(-INF)),
    (f64::NAN, nan(f64::NAN), nan(f64::NAN)),
    (-f64::NAN, nan(-f64::NAN), nan(-f64::NAN)),
];

const FMOD: &[Binary] = &[
    binary(3.9, 4.0, within(3.9, 0.001)),
    binary(7.9, 4.0, within(3.9, 0.001)),
    binary(-3.9, 4.0, within(-3.9, 0.001)),
    binary(3.9, -4.0, within(3.9, 0.001)),
    binary(7.9, -4.0, within(3.9, 0.001)),
    binary(-3.9, -4.0, within(-3.9, 0.001)),
    binary(P2_34, P2_34_PLUS, exact(P2_34)),
    binary(P2_34, 1.0, exact(0.0)),
    binary(P2_120, P2_120_PLUS, exact(P2_120)),
    binary(P2_120, 1.0, exact(0.0)),
    binary(INF, 4.0, any_nan()),
    binary(-INF, 4.0, any_nan()),
    binary(0.0, f64::NAN, nan(f64::NAN)),
    binary(0.0, -f64::NAN, nan(-f64::NAN)),
    binary(f64::NAN, 1.0, nan(f64::NAN)),
    binary(-f64::NAN, 1.0, nan(-f64::NAN)),
    binary(3.9, 0.0, any_nan()),
    binary(3.9, INF, within(3.9, 0.001)),
    binary(3.9, -INF, within(3.9, 0.001)),
];

/// Quotients round to nearest, ties to even.
const REMAINDER: &[Binary] = &[
    binary(1.9, 4.0, within(1.9, 0.001)),
    binary(2.0, 4.0, exact(2.0)),
    binary(6.0, 4.0, exact(-2.0)),
    binary(-6.0, 4.0, exact(2.0)),
    binary(3.9, 4.0, within(-0.1, 0.001)),
    binary(-2.0, 4.0, within(-2.0, 0.001)),
    binary(-3.9, 4.0, within(0.1, 0.001)),
    binary(-4.1, 4.0, within(-0.1, 0.001)),
    binary(3.9, -4.0, within(-0.1, 0.001)),
    binary(-3.9, -4.0, within(0.1, 0.001)),
    binary(P2_34, P2_34_PLUS, exact(-1_048_576.0)),
    binary(P2_34, 1.0, exact(0.0)),
    binary(P2_120, P2_120_PLUS, exact(-P2_110)),
    binary(P2_120, 1.0, exact(0.0)),
    binary(INF, 4.0, any_nan()),
    binary(-INF, 4.0, any_nan()),
    binary(0.0, f64::NAN, nan(f64::NAN)),
    binary(0.0, -f64::NAN, nan(-f64::NAN)),
    binary(f64::NAN, 1.0, nan(f64::NAN)),
    binary(-f64::NAN, 1.0, nan(-f64::NAN)),
    binary(1.9, 0.0, any_nan()),
];

/// Remainder plus the expected quotient bits. `None` where the quotient is
/// unspecified (NaN results).
const REMQUO: &[(Binary, Option<i32>)] = &[
    (binary(1.9, 4.0, within(1.9, 0.001)), Some(0)),
    (binary(2.0, 4.0, exact(2.0)), Some(0)),
    (binary(6.0, 4.0, exact(-2.0)), Some(2)),
    (binary(-6.0, 4.0, exact(2.0)), Some(-2)),
    (binary(P2_34, P2_34_PLUS, exact(-1_048_576.0)), Some(1)),
    (binary(P2_120, P2_120_PLUS, exact(-P2_110)), Some(1)),
    (binary(3.9, 4.0, within(-0.1, 0.001)), Some(1)),
    (binary(-2.0, 4.0, within(-2.0, 0.001)), Some(0)),
    (binary(-3.9, 4.0, within(0.1, 0.001)), Some(-1)),
    (binary(-4.1, 4.0, within(-0.1, 0.001)), Some(-1)),
    (binary(3.9, -4.0, within(-0.1, 0.001)), Some(-1)),
    (binary(-3.9, -4.0, within(0.1, 0.001)), Some(1)),
    (binary(INF, 4.0, any_nan()), None),
    (binary(-INF, 4.0, any_nan()), None),
    (binary(0.0, f64::NAN, nan(f64::NAN)), None),
    (binary(0.0, -f64::NAN, nan(-f64::NAN)), None),
    (binary(f64::NAN, 0.0, nan(f64::NAN)), None),
    (binary(-f64::NAN, 0.0, nan(-f64::NAN)), None),
    (binary(1.9, 0.0, any_nan()), None),
];

pub(super) fn run(oracle: &mut Oracle) {
    modf_split::<f64>(oracle, "modf", math_abi::modf);
    modf_split::<f32>(oracle, "modff", math_abi::modff);
    run_binary::<f64>(oracle, "fmod", math_abi::fmod, FMOD);
    run_binary::<f32>(oracle, "fmod", math_abi::fmodf, FMOD);
    run_binary::<f64>(oracle, "remainder", math_abi::remainder, REMAINDER);
    run_binary::<f32>(oracle, "remainder", math_abi::remainderf, REMAINDER);
    remquo_quotients::<f64>(oracle, "remquo", math_abi::remquo);
    remquo_quotients::<f32>(oracle, "remquof", math_abi::remquof);
}

#[track_caller]
fn modf_split<F: Precision>(oracle: &mut Oracle, name: &str, f: impl Fn(F) -> (F, F)) {
    for &(x, frac, whole) in MODF {
        let (got_frac, got_whole) = f(operand(x));
        let expr = format!("{name}({}, &ret)", literal(x));
        oracle.check_float(&expr, got_frac.to_f64(), frac);
        oracle.check_float("ret", got_whole.to_f64(), whole);
    }
}

#[track_caller]
fn remquo_quotients<F: Precision>(oracle: &mut Oracle, name: &str, f: impl Fn(F, F) -> (F, i32)) {
    for &(case, quotient) in REMQUO {
        let (rem, quo) = f(operand(case.x), operand(case.y));
        let expr = format!("{name}({}, {}, &quo)", literal(case.x), literal(case.y));
        oracle.check_float(&expr, rem.to_f64(), case.expect);
        if let Some(expected) = quotient {
            oracle.check_int("quo", quo, expected);
        }
    }
}
