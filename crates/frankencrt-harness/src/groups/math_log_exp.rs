use frankencrt_abi::math_abi;
use frankencrt_core::Oracle;
use frankencrt_core::equivalence::{any_nan, exact, nan, within};
use frankencrt_core::vector::{Unary, run_unary, unary};

const INF: f64 = f64::INFINITY;

const LOG: &[Unary] = &[
    unary(1.0, within(0.0, 0.001)),
    unary(2.718_281_8, within(1.0, 0.001)),
    unary(7.389_056_1, within(2.0, 0.001)),
    unary(0.367_879_4, within(-1.0, 0.001)),
    unary(INF, exact(INF)),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
    unary(0.0, exact(-INF)),
    unary(-1.0, any_nan()),
    unary(-INF, any_nan()),
];

const LOG2: &[Unary] = &[
    unary(1.0, within(0.0, 0.001)),
    unary(8.0, within(3.0, 0.001)),
    unary(1024.0, within(10.0, 0.001)),
    unary(1_048_576.0, within(20.0, 0.001)),
    unary(4_294_967_296.0, within(32.0, 0.001)),
    unary(0.5, within(-1.0, 0.001)),
    unary(0.125, within(-3.0, 0.001)),
    unary(9.7656e-04, within(-10.0, 0.001)),
    unary(9.5367e-07, within(-20.0, 0.001)),
    unary(3.5527e-15, within(-48.0, 0.001)),
    unary(7.8886e-31, within(-100.0, 0.001)),
    // Subnormal at single precision.
    unary(7.3468e-40, within(-130.0, 0.001)),
    unary(1.225, within(0.292_782, 0.001)),
    unary(INF, exact(INF)),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
    unary(0.0, exact(-INF)),
    unary(-1.0, any_nan()),
    unary(-INF, any_nan()),
];

const LOG2_DENORMAL: &[Unary] = &[unary(9.8813e-324, within(-1073.0, 0.001))];
const LOG2F_DENORMAL: &[Unary] = &[unary(7.1746e-43, within(-140.0, 0.001))];

const LOG10: &[Unary] = &[
    unary(1.0, within(0.0, 0.001)),
    unary(10.0, within(1.0, 0.001)),
    unary(100.0, within(2.0, 0.001)),
    unary(0.1, within(-1.0, 0.001)),
    unary(INF, exact(INF)),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
    unary(0.0, exact(-INF)),
    unary(-1.0, any_nan()),
    unary(-INF, any_nan()),
];

const LOG1P: &[Unary] = &[
    unary(0.0, within(0.0, 0.001)),
    unary(1.718_282, within(1.0, 0.001)),
    unary(-0.632_120, within(-1.0, 0.001)),
    unary(INF, exact(INF)),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
    unary(-1.0, exact(-INF)),
    unary(-2.0, any_nan()),
    unary(-INF, any_nan()),
];

const EXP: &[Unary] = &[
    unary(0.0, within(1.0, 0.001)),
    unary(1.0, within(2.718_281_8, 0.001)),
    unary(2.0, within(7.389_056_1, 0.001)),
    unary(-1.0, within(0.367_879_4, 0.001)),
    unary(INF, exact(INF)),
    unary(-INF, exact(0.0)),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

const EXP2: &[Unary] = &[
    unary(0.0, within(1.0, 0.001)),
    unary(3.0, within(8.0, 0.001)),
    unary(10.0, within(1024.0, 0.001)),
    unary(20.0, within(1_048_576.0, 0.001)),
    unary(32.0, within(4_294_967_296.0, 0.001)),
    unary(-2.0, within(0.25, 0.001)),
    unary(INF, exact(INF)),
    unary(-INF, exact(0.0)),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

const EXPM1: &[Unary] = &[
    unary(0.0, within(0.0, 0.001)),
    unary(1.0, within(1.718_282, 0.001)),
    unary(-1.0, within(-0.632_120, 0.001)),
    unary(INF, exact(INF)),
    unary(-INF, exact(-1.0)),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

pub(super) fn run(oracle: &mut Oracle) {
    run_unary::<f64>(oracle, "log", math_abi::log, LOG);
    run_unary::<f32>(oracle, "log", math_abi::logf, LOG);
    run_unary::<f64>(oracle, "log2", math_abi::log2, LOG2);
    run_unary::<f32>(oracle, "log2", math_abi::log2f, LOG2);
    run_unary::<f64>(oracle, "log2", math_abi::log2, LOG2_DENORMAL);
    run_unary::<f32>(oracle, "log2", math_abi::log2f, LOG2F_DENORMAL);
    run_unary::<f64>(oracle, "log10", math_abi::log10, LOG10);
    run_unary::<f32>(oracle, "log10", math_abi::log10f, LOG10);
    run_unary::<f64>(oracle, "log1p", math_abi::log1p, LOG1P);
    run_unary::<f32>(oracle, "log1p", math_abi::log1pf, LOG1P);

    run_unary::<f64>(oracle, "exp", math_abi::exp, EXP);
    run_unary::<f32>(oracle, "exp", math_abi::expf, EXP);
    run_unary::<f64>(oracle, "exp2", math_abi::exp2, EXP2);
    run_unary::<f32>(oracle, "exp2", math_abi::exp2f, EXP2);
    run_unary::<f64>(oracle, "expm1", math_abi::expm1, EXPM1);
    run_unary::<f32>(oracle, "expm1", math_abi::expm1f, EXPM1);
}
