use frankencrt_abi::math_abi;
use frankencrt_core::Oracle;
use frankencrt_core::equivalence::{any_nan, exact, nan, within};
use frankencrt_core::vector::{Binary, Unary, binary, run_binary, run_unary, unary};

const INF: f64 = f64::INFINITY;
const SQRT_2: f64 = 1.414_214;

const SQRT: &[Unary] = &[
    unary(9.0, exact(3.0)),
    unary(0.25, exact(0.5)),
    unary(INF, exact(INF)),
    unary(-1.0, any_nan()),
    unary(-INF, any_nan()),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

const CBRT: &[Unary] = &[
    unary(27.0, within(3.0, 0.001)),
    unary(-27.0, within(-3.0, 0.001)),
    unary(0.125, within(0.5, 0.001)),
    unary(-0.125, within(-0.5, 0.001)),
    unary(INF, exact(INF)),
    unary(-INF, exact(-INF)),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

const HYPOT: &[Binary] = &[
    binary(1.0, 1.0, within(SQRT_2, 0.001)),
    binary(-1.0, 1.0, within(SQRT_2, 0.001)),
    binary(1.0, -1.0, within(SQRT_2, 0.001)),
    binary(-1.0, -1.0, within(SQRT_2, 0.001)),
    binary(INF, 0.0, exact(INF)),
    binary(-INF, 0.0, exact(INF)),
    binary(0.0, INF, exact(INF)),
    binary(0.0, -INF, exact(INF)),
    binary(f64::NAN, 0.0, any_nan()),
    binary(0.0, f64::NAN, any_nan()),
];

pub(super) fn run(oracle: &mut Oracle) {
    run_unary::<f64>(oracle, "sqrt", math_abi::sqrt, SQRT);
    run_unary::<f32>(oracle, "sqrt", math_abi::sqrtf, SQRT);
    run_unary::<f64>(oracle, "cbrt", math_abi::cbrt, CBRT);
    run_unary::<f32>(oracle, "cbrt", math_abi::cbrtf, CBRT);
    run_binary::<f64>(oracle, "hypot", math_abi::hypot, HYPOT);
    run_binary::<f32>(oracle, "hypot", math_abi::hypotf, HYPOT);
}
