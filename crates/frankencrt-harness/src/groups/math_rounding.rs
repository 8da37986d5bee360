use frankencrt_abi::{HostFloatEnv, math_abi};
use frankencrt_core::equivalence::{exact, nan};
use frankencrt_core::vector::{
    Integral, ModeCase, Unary, integral, run_integral, run_mode_float, run_mode_integral, run_unary, unary,
};
use frankencrt_core::{Oracle, RoundingDriver};

const P2_30: f64 = 1_073_741_824.0;
const P2_34: f64 = 17_179_869_184.0;
const P2_60: f64 = 1_152_921_504_606_846_976.0;
const P2_120: f64 = 1_329_227_995_784_915_872_903_807_060_280_344_576.0;

const FLOOR: &[Unary] = &[
    unary(3.9, exact(3.0)),
    unary(-3.3, exact(-4.0)),
    unary(-3.9, exact(-4.0)),
    unary(P2_34, exact(P2_34)),
    unary(P2_120, exact(P2_120)),
    unary(f64::INFINITY, exact(f64::INFINITY)),
    unary(f64::NEG_INFINITY, exact(f64::NEG_INFINITY)),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

const CEIL: &[Unary] = &[
    unary(3.9, exact(4.0)),
    unary(-3.3, exact(-3.0)),
    unary(-3.9, exact(-3.0)),
    unary(P2_34, exact(P2_34)),
    unary(P2_120, exact(P2_120)),
    unary(f64::INFINITY, exact(f64::INFINITY)),
    unary(f64::NEG_INFINITY, exact(f64::NEG_INFINITY)),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

const TRUNC: &[Unary] = &[
    unary(3.9, exact(3.0)),
    unary(-3.3, exact(-3.0)),
    unary(-3.9, exact(-3.0)),
    unary(P2_34, exact(P2_34)),
    unary(P2_120, exact(P2_120)),
    unary(f64::INFINITY, exact(f64::INFINITY)),
    unary(f64::NEG_INFINITY, exact(f64::NEG_INFINITY)),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

/// `rint`/`nearbyint`: nearest, toward zero, downward, upward.
const RINT: &[ModeCase] = &[
    ModeCase::each(3.3, 3.0, 3.0, 3.0, 4.0),
    ModeCase::each(3.6, 4.0, 3.0, 3.0, 4.0),
    ModeCase::each(3.5, 4.0, 3.0, 3.0, 4.0),
    ModeCase::each(4.5, 4.0, 4.0, 4.0, 5.0),
    ModeCase::invariant(P2_34, P2_34),
    ModeCase::invariant(P2_120, P2_120),
    ModeCase::nearest_only(f64::NAN, f64::NAN),
    ModeCase::each(-3.3, -3.0, -3.0, -4.0, -3.0),
    ModeCase::each(-3.6, -4.0, -3.0, -4.0, -3.0),
    ModeCase::each(-3.5, -4.0, -3.0, -4.0, -3.0),
    ModeCase::each(-4.5, -4.0, -4.0, -5.0, -4.0),
    ModeCase::nearest_only(-f64::NAN, -f64::NAN),
];

/// `lrint`/`llrint`.
const LRINT: &[ModeCase] = &[
    ModeCase::each(3.3, 3.0, 3.0, 3.0, 4.0),
    ModeCase::each(3.6, 4.0, 3.0, 3.0, 4.0),
    ModeCase::each(3.5, 4.0, 3.0, 3.0, 4.0),
    ModeCase::each(4.5, 4.0, 4.0, 4.0, 5.0),
    ModeCase::invariant(P2_30, P2_30),
    ModeCase::each(-3.3, -3.0, -3.0, -4.0, -3.0),
    ModeCase::each(-3.6, -4.0, -3.0, -4.0, -3.0),
    ModeCase::each(-3.5, -4.0, -3.0, -4.0, -3.0),
    ModeCase::each(-4.5, -4.0, -4.0, -5.0, -4.0),
];

/// Values only a 64-bit result can hold.
const LLRINT_WIDE: &[ModeCase] = &[ModeCase::invariant(P2_34, P2_34), ModeCase::invariant(P2_60, P2_60)];

/// Halfway cases round away from zero.
const LROUND: &[Integral] = &[
    integral(3.3, 3),
    integral(3.6, 4),
    integral(3.5, 4),
    integral(4.5, 5),
    integral(P2_30, 1_073_741_824),
    integral(-3.3, -3),
    integral(-3.6, -4),
    integral(-3.5, -4),
    integral(-4.5, -5),
];

const LLROUND_WIDE: &[Integral] = &[
    integral(P2_34, 17_179_869_184),
    integral(P2_60, 1_152_921_504_606_846_976),
];

const ROUND: &[Unary] = &[
    unary(3.3, exact(3.0)),
    unary(3.6, exact(4.0)),
    unary(3.5, exact(4.0)),
    unary(4.5, exact(5.0)),
    unary(P2_34, exact(P2_34)),
    unary(P2_120, exact(P2_120)),
    unary(f64::INFINITY, exact(f64::INFINITY)),
    unary(f64::NAN, nan(f64::NAN)),
    unary(-3.3, exact(-3.0)),
    unary(-3.6, exact(-4.0)),
    unary(-3.5, exact(-4.0)),
    unary(-4.5, exact(-5.0)),
    unary(f64::NEG_INFINITY, exact(f64::NEG_INFINITY)),
    unary(-f64::NAN, nan(-f64::NAN)),
];

pub(super) fn run(oracle: &mut Oracle) {
    run_unary::<f64>(oracle, "floor", math_abi::floor, FLOOR);
    run_unary::<f32>(oracle, "floor", math_abi::floorf, FLOOR);
    run_unary::<f64>(oracle, "ceil", math_abi::ceil, CEIL);
    run_unary::<f32>(oracle, "ceil", math_abi::ceilf, CEIL);
    run_unary::<f64>(oracle, "trunc", math_abi::trunc, TRUNC);
    run_unary::<f32>(oracle, "trunc", math_abi::truncf, TRUNC);

    let env = HostFloatEnv;
    RoundingDriver::new(&env).with_default_pass().run(oracle, |o, mode| {
        run_mode_integral::<f64, i64>(o, mode, "llrint", math_abi::llrint, LRINT);
        run_mode_integral::<f32, i64>(o, mode, "llrint", math_abi::llrintf, LRINT);
        run_mode_integral::<f64, _>(o, mode, "lrint", math_abi::lrint, LRINT);
        run_mode_integral::<f32, _>(o, mode, "lrint", math_abi::lrintf, LRINT);
        run_mode_integral::<f64, i64>(o, mode, "llrint", math_abi::llrint, LLRINT_WIDE);
        run_mode_integral::<f32, i64>(o, mode, "llrint", math_abi::llrintf, LLRINT_WIDE);

        run_mode_float::<f64>(o, mode, "rint", math_abi::rint, RINT);
        run_mode_float::<f32>(o, mode, "rint", math_abi::rintf, RINT);
        run_mode_float::<f64>(o, mode, "nearbyint", math_abi::nearbyint, RINT);
        run_mode_float::<f32>(o, mode, "nearbyint", math_abi::nearbyintf, RINT);
    });

    run_integral::<f64, i64>(oracle, "llround", math_abi::llround, LROUND);
    run_integral::<f32, i64>(oracle, "llround", math_abi::llroundf, LROUND);
    run_integral::<f64, _>(oracle, "lround", math_abi::lround, LROUND);
    run_integral::<f32, _>(oracle, "lround", math_abi::lroundf, LROUND);
    run_integral::<f64, i64>(oracle, "llround", math_abi::llround, LLROUND_WIDE);
    run_integral::<f32, i64>(oracle, "llround", math_abi::llroundf, LLROUND_WIDE);

    run_unary::<f64>(oracle, "round", math_abi::round, ROUND);
    run_unary::<f32>(oracle, "round", math_abi::roundf, ROUND);
}
