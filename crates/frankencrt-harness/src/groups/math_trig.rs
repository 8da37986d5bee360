use frankencrt_abi::math_abi;
use frankencrt_core::Oracle;
use frankencrt_core::equivalence::{any_nan, nan, signed, within};
use frankencrt_core::vector::{Binary, Precision, Unary, binary, operand, run_binary, run_unary, unary};

const INF: f64 = f64::INFINITY;
const PI: f64 = 3.141_592_654;
const EPS: f64 = 0.01;

const COS: &[Unary] = &[
    unary(0.0, within(1.0, EPS)),
    unary(PI / 2.0, within(0.0, EPS)),
    unary(PI, within(-1.0, EPS)),
    unary(3.0 * PI / 2.0, within(0.0, EPS)),
    unary(2.0 * PI, within(1.0, EPS)),
    unary(INF, any_nan()),
    unary(-INF, any_nan()),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

const SIN: &[Unary] = &[
    unary(0.0, within(0.0, EPS)),
    unary(PI / 2.0, within(1.0, EPS)),
    unary(PI, within(0.0, EPS)),
    unary(3.0 * PI / 2.0, within(-1.0, EPS)),
    unary(2.0 * PI, within(0.0, EPS)),
    unary(INF, any_nan()),
    unary(-INF, any_nan()),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

const TAN: &[Unary] = &[
    unary(0.0, within(0.0, EPS)),
    unary(1.0, within(1.557_408, EPS)),
    unary(PI / 4.0, within(1.0, EPS)),
    unary(3.0 * PI / 4.0, within(-1.0, EPS)),
    unary(5.0 * PI / 4.0, within(1.0, EPS)),
    unary(7.0 * PI / 4.0, within(-1.0, EPS)),
    unary(INF, any_nan()),
    unary(-INF, any_nan()),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

const ACOS: &[Unary] = &[
    unary(1.0, within(0.0, EPS)),
    unary(0.0, within(PI / 2.0, EPS)),
    unary(-1.0, within(PI, EPS)),
    unary(1.1, any_nan()),
    unary(-1.1, any_nan()),
    unary(INF, any_nan()),
    unary(-INF, any_nan()),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

const ASIN: &[Unary] = &[
    unary(0.0, within(0.0, EPS)),
    unary(1.0, within(PI / 2.0, EPS)),
    unary(-1.0, within(-PI / 2.0, EPS)),
    unary(1.1, any_nan()),
    unary(-1.1, any_nan()),
    unary(INF, any_nan()),
    unary(-INF, any_nan()),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

const ATAN: &[Unary] = &[
    unary(0.0, within(0.0, EPS)),
    unary(1.0, within(PI / 4.0, EPS)),
    unary(-1.0, within(-PI / 4.0, EPS)),
    unary(INF, within(PI / 2.0, EPS)),
    unary(-INF, within(-PI / 2.0, EPS)),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

/// `atan2(y, x)`: the signs of both zeros select the quadrant.
const ATAN2: &[Binary] = &[
    binary(0.0, -1.0, within(PI, EPS)),
    binary(0.0, 1.0, signed(0.0)),
    binary(-0.0, 1.0, signed(-0.0)),
    binary(-1.0, 0.0, within(-PI / 2.0, EPS)),
    binary(1.0, 0.0, within(PI / 2.0, EPS)),
    binary(0.0, 0.0, signed(0.0)),
    binary(0.0, -0.0, within(PI, EPS)),
    binary(-0.0, 0.0, signed(-0.0)),
    binary(-0.0, -0.0, within(-PI, EPS)),
    binary(1.0, -INF, within(PI, EPS)),
    binary(-1.0, -INF, within(-PI, EPS)),
    binary(1.0, INF, within(0.0, EPS)),
    binary(INF, 1.0, within(PI / 2.0, EPS)),
    binary(-INF, 1.0, within(-PI / 2.0, EPS)),
    binary(INF, -INF, within(3.0 * PI / 4.0, EPS)),
    binary(-INF, -INF, within(-3.0 * PI / 4.0, EPS)),
    binary(INF, INF, within(PI / 4.0, EPS)),
    binary(-INF, INF, within(-PI / 4.0, EPS)),
    binary(f64::NAN, 1.0, any_nan()),
    binary(1.0, f64::NAN, any_nan()),
];

pub(super) fn run(oracle: &mut Oracle) {
    run_unary::<f64>(oracle, "cos", math_abi::cos, COS);
    run_unary::<f32>(oracle, "cos", math_abi::cosf, COS);
    run_unary::<f64>(oracle, "sin", math_abi::sin, SIN);
    run_unary::<f32>(oracle, "sin", math_abi::sinf, SIN);
    run_unary::<f64>(oracle, "tan", math_abi::tan, TAN);
    run_unary::<f32>(oracle, "tan", math_abi::tanf, TAN);
    run_unary::<f64>(oracle, "acos", math_abi::acos, ACOS);
    run_unary::<f32>(oracle, "acos", math_abi::acosf, ACOS);
    run_unary::<f64>(oracle, "asin", math_abi::asin, ASIN);
    run_unary::<f32>(oracle, "asin", math_abi::asinf, ASIN);
    run_unary::<f64>(oracle, "atan", math_abi::atan, ATAN);
    run_unary::<f32>(oracle, "atan", math_abi::atanf, ATAN);
    run_binary::<f64>(oracle, "atan2", math_abi::atan2, ATAN2);
    run_binary::<f32>(oracle, "atan2", math_abi::atan2f, ATAN2);

    sincos_at_zero::<f64>(oracle, "sincos", math_abi::sincos);
    sincos_at_zero::<f32>(oracle, "sincosf", math_abi::sincosf);
}

/// Hosts without `sincos` contribute no checks.
#[track_caller]
fn sincos_at_zero<F: Precision>(oracle: &mut Oracle, name: &str, f: impl Fn(F) -> Option<(F, F)>) {
    let Some((sin, cos)) = f(operand(0.0)) else {
        return;
    };
    oracle.check_float(&format!("{name}(0.0, &outSin, &outCos) outSin"), sin.to_f64(), within(0.0, EPS));
    oracle.check_float(&format!("{name}(0.0, &outSin, &outCos) outCos"), cos.to_f64(), within(1.0, EPS));
}
