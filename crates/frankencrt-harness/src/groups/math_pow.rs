use frankencrt_abi::math_abi;
use frankencrt_core::Oracle;
use frankencrt_core::equivalence::{any_nan, exact, nan, signed, within};
use frankencrt_core::vector::{Binary, binary, run_binary};

const INF: f64 = f64::INFINITY;

/// C99 Annex F special cases, plus a few ordinary values.
const POW: &[Binary] = &[
    binary(2.0, 0.0, exact(1.0)),
    binary(10.0, 0.0, exact(1.0)),
    binary(10.0, 1.0, exact(10.0)),
    binary(10.0, 0.5, within(3.162_278, 0.01)),
    binary(-1.0, 1.5, any_nan()),
    // Zero bases.
    binary(0.0, 3.0, signed(0.0)),
    binary(-0.0, 3.0, signed(-0.0)),
    binary(0.0, 4.2, signed(0.0)),
    binary(-0.0, 4.2, signed(0.0)),
    // Infinite bases.
    binary(INF, -0.5, signed(0.0)),
    binary(INF, 0.5, exact(INF)),
    binary(-INF, -3.0, signed(-0.0)),
    binary(-INF, -0.5, signed(0.0)),
    binary(-INF, 3.0, exact(-INF)),
    binary(-INF, 2.5, exact(INF)),
    // Infinite exponents.
    binary(2.0, INF, exact(INF)),
    binary(1.0, INF, exact(1.0)),
    binary(0.5, INF, signed(0.0)),
    binary(2.0, -INF, signed(0.0)),
    binary(1.0, -INF, exact(1.0)),
    binary(0.5, -INF, exact(INF)),
    binary(-2.0, INF, exact(INF)),
    binary(-1.0, INF, exact(1.0)),
    binary(-0.5, INF, signed(0.0)),
    binary(-2.0, -INF, signed(0.0)),
    binary(-1.0, -INF, exact(1.0)),
    binary(-0.5, -INF, exact(INF)),
    // NaN operands.
    binary(f64::NAN, 2.0, nan(f64::NAN)),
    binary(-f64::NAN, 2.0, nan(-f64::NAN)),
    binary(2.0, f64::NAN, nan(f64::NAN)),
    binary(2.0, -f64::NAN, nan(-f64::NAN)),
    binary(1.0, f64::NAN, exact(1.0)),
    binary(f64::NAN, 0.0, exact(1.0)),
    binary(INF, 0.0, exact(1.0)),
    binary(-INF, 0.0, exact(1.0)),
];

pub(super) fn run(oracle: &mut Oracle) {
    run_binary::<f64>(oracle, "pow", math_abi::pow, POW);
    run_binary::<f32>(oracle, "pow", math_abi::powf, POW);
}
