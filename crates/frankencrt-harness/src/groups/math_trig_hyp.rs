use frankencrt_abi::math_abi;
use frankencrt_core::Oracle;
use frankencrt_core::equivalence::{any_nan, exact, nan, within};
use frankencrt_core::vector::{Unary, run_unary, unary};

const INF: f64 = f64::INFINITY;
const EPS: f64 = 0.01;

const ACOSH_2: f64 = 1.316_958;
const ASINH_1: f64 = 0.881_374;
const ASINH_2: f64 = 1.443_636;
const ATANH_HALF: f64 = 0.549_307;

const ACOSH: &[Unary] = &[
    unary(1.0, within(0.0, EPS)),
    unary(2.0, within(ACOSH_2, EPS)),
    unary(0.0, any_nan()),
    unary(-4.0, any_nan()),
    unary(-INF, any_nan()),
    unary(INF, exact(INF)),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

const ASINH: &[Unary] = &[
    unary(0.0, within(0.0, EPS)),
    unary(1.0, within(ASINH_1, EPS)),
    unary(2.0, within(ASINH_2, EPS)),
    unary(-1.0, within(-ASINH_1, EPS)),
    unary(-2.0, within(-ASINH_2, EPS)),
    unary(INF, exact(INF)),
    unary(-INF, exact(-INF)),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

const ATANH: &[Unary] = &[
    unary(0.0, within(0.0, EPS)),
    unary(0.5, within(ATANH_HALF, EPS)),
    unary(-0.5, within(-ATANH_HALF, EPS)),
    unary(1.0, exact(INF)),
    unary(-1.0, exact(-INF)),
    unary(2.0, any_nan()),
    unary(-2.0, any_nan()),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

const COSH: &[Unary] = &[
    unary(0.0, within(1.0, EPS)),
    unary(ACOSH_2, within(2.0, EPS)),
    unary(-ACOSH_2, within(2.0, EPS)),
    unary(INF, exact(INF)),
    unary(-INF, exact(INF)),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

const SINH: &[Unary] = &[
    unary(0.0, within(0.0, EPS)),
    unary(ASINH_1, within(1.0, EPS)),
    unary(ASINH_2, within(2.0, EPS)),
    unary(-ASINH_1, within(-1.0, EPS)),
    unary(-ASINH_2, within(-2.0, EPS)),
    unary(INF, exact(INF)),
    unary(-INF, exact(-INF)),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

const TANH: &[Unary] = &[
    unary(0.0, exact(0.0)),
    unary(ATANH_HALF, within(0.5, EPS)),
    unary(-ATANH_HALF, within(-0.5, EPS)),
    unary(INF, exact(1.0)),
    unary(-INF, exact(-1.0)),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

pub(super) fn run(oracle: &mut Oracle) {
    run_unary::<f64>(oracle, "acosh", math_abi::acosh, ACOSH);
    run_unary::<f32>(oracle, "acosh", math_abi::acoshf, ACOSH);
    run_unary::<f64>(oracle, "asinh", math_abi::asinh, ASINH);
    run_unary::<f32>(oracle, "asinh", math_abi::asinhf, ASINH);
    run_unary::<f64>(oracle, "atanh", math_abi::atanh, ATANH);
    run_unary::<f32>(oracle, "atanh", math_abi::atanhf, ATANH);
    run_unary::<f64>(oracle, "cosh", math_abi::cosh, COSH);
    run_unary::<f32>(oracle, "cosh", math_abi::coshf, COSH);
    run_unary::<f64>(oracle, "sinh", math_abi::sinh, SINH);
    run_unary::<f32>(oracle, "sinh", math_abi::sinhf, SINH);
    run_unary::<f64>(oracle, "tanh", math_abi::tanh, TANH);
    run_unary::<f32>(oracle, "tanh", math_abi::tanhf, TANH);
}
