use std::ffi::{c_int, c_long};

use frankencrt_abi::math_abi::{self, FP_ILOGB0, FP_ILOGBNAN};
use frankencrt_core::Oracle;
use frankencrt_core::equivalence::{Expect, exact, literal, nan, within};
use frankencrt_core::vector::{
    Integral, Precision, Scaled, Unary, integral, operand, run_integral, run_scaled, run_unary, scaled, unary,
};

const INF: f64 = f64::INFINITY;
const INT_MAX: i64 = c_int::MAX as i64;

const SCALE: &[Scaled] = &[
    scaled(0.0, 1, within(0.0, 0.001)),
    scaled(2.0, 2, within(8.0, 0.001)),
    scaled(2.0, -2, within(0.5, 0.001)),
    scaled(INF, -42, exact(INF)),
    scaled(-INF, 42, exact(-INF)),
    scaled(f64::NAN, 42, nan(f64::NAN)),
    scaled(-f64::NAN, 42, nan(-f64::NAN)),
];

/// `0x1.4p+42`.
const FREXP_INPUT: f64 = 5_497_558_138_880.0;

const FREXP_NAN: &[(f64, Expect)] = &[(f64::NAN, nan(f64::NAN)), (-f64::NAN, nan(-f64::NAN))];
const FREXP_INF: &[(f64, Expect)] = &[(INF, exact(INF)), (-INF, exact(-INF))];

const ILOGB: &[Integral] = &[
    integral(1.0, 0),
    integral(0.25, -2),
    integral(-0.25, -2),
    integral(0.0, FP_ILOGB0 as i64),
    integral(INF, INT_MAX),
    integral(-INF, INT_MAX),
    integral(f64::NAN, FP_ILOGBNAN as i64),
    integral(-f64::NAN, FP_ILOGBNAN as i64),
];

/// Smallest normal, first subnormal binade, second-smallest subnormal.
const ILOGB_DENORMAL: &[Integral] = &[
    integral(3.49514e-308, -1022),
    integral(1.74757e-308, -1023),
    integral(9.8813e-324, -1073),
];

const ILOGBF_DENORMAL: &[Integral] = &[
    integral(3.69292e-38, -125),
    integral(4.61616e-39, -128),
    integral(1.4013e-45, -149),
];

const LOGB: &[Unary] = &[
    unary(1.0, exact(0.0)),
    unary(0.25, exact(-2.0)),
    unary(-0.25, exact(-2.0)),
    unary(0.0, exact(-INF)),
    unary(INF, exact(INF)),
    unary(-INF, exact(INF)),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

const LOGB_DENORMAL: &[Unary] = &[
    unary(3.49514e-308, exact(-1022.0)),
    unary(1.74757e-308, exact(-1023.0)),
    unary(9.8813e-324, exact(-1073.0)),
];

const LOGBF_DENORMAL: &[Unary] = &[
    unary(3.69292e-38, exact(-125.0)),
    unary(4.61616e-39, exact(-128.0)),
    unary(1.4013e-45, exact(-149.0)),
];

/// Exponent operands saturate into the C parameter type.
fn exponent<T: TryFrom<i64> + Copy>(n: i64, min: T, max: T) -> T {
    T::try_from(n).unwrap_or(if n < 0 { min } else { max })
}

fn int_exponent(n: i64) -> c_int {
    exponent(n, c_int::MIN, c_int::MAX)
}

fn long_exponent(n: i64) -> c_long {
    exponent(n, c_long::MIN, c_long::MAX)
}

pub(super) fn run(oracle: &mut Oracle) {
    run_scaled::<f64>(oracle, "ldexp", |x, n| math_abi::ldexp(x, int_exponent(n)), SCALE);
    run_scaled::<f32>(oracle, "ldexp", |x, n| math_abi::ldexpf(x, int_exponent(n)), SCALE);
    run_scaled::<f64>(oracle, "scalbn", |x, n| math_abi::scalbn(x, int_exponent(n)), SCALE);
    run_scaled::<f32>(oracle, "scalbn", |x, n| math_abi::scalbnf(x, int_exponent(n)), SCALE);
    run_scaled::<f64>(oracle, "scalbln", |x, n| math_abi::scalbln(x, long_exponent(n)), SCALE);
    run_scaled::<f32>(oracle, "scalbln", |x, n| math_abi::scalblnf(x, long_exponent(n)), SCALE);

    decompose::<f64>(oracle, "frexp", math_abi::frexp);
    decompose::<f32>(oracle, "frexpf", math_abi::frexpf);

    run_integral::<f64, c_int>(oracle, "ilogb", math_abi::ilogb, ILOGB);
    run_integral::<f32, c_int>(oracle, "ilogb", math_abi::ilogbf, ILOGB);
    run_integral::<f64, c_int>(oracle, "ilogb", math_abi::ilogb, ILOGB_DENORMAL);
    run_integral::<f32, c_int>(oracle, "ilogb", math_abi::ilogbf, ILOGBF_DENORMAL);

    run_unary::<f64>(oracle, "logb", math_abi::logb, LOGB);
    run_unary::<f32>(oracle, "logb", math_abi::logbf, LOGB);
    run_unary::<f64>(oracle, "logb", math_abi::logb, LOGB_DENORMAL);
    run_unary::<f32>(oracle, "logb", math_abi::logbf, LOGBF_DENORMAL);
}

#[track_caller]
fn decompose<F: Precision>(oracle: &mut Oracle, name: &str, f: impl Fn(F) -> (F, c_int)) {
    for &(x, expect) in FREXP_NAN.iter().chain(FREXP_INF) {
        let (mantissa, _) = f(operand(x));
        oracle.check_float(&format!("{name}({}, &iret)", literal(x)), mantissa.to_f64(), expect);
    }

    let (mantissa, exp) = f(operand(FREXP_INPUT));
    oracle.check_float(&format!("{name}(0x1.4p+42, &iret)"), mantissa.to_f64(), exact(0.625));
    oracle.check_int("iret", exp, 43);
}
