//! Integration tests: host rounding control driven through the oracle.
//!
//! Validates that:
//! - `rint` honours every rounding mode the host accepts
//! - the driver leaves the host in round-to-nearest afterwards
//! - the mode reported by `fegetround` matches the mode requested

use frankencrt_abi::HostFloatEnv;
use frankencrt_abi::math_abi;
use frankencrt_core::rounding::{FloatEnvironment, RoundingDriver, RoundingMode};
use frankencrt_core::vector::{ModeCase, run_mode_float};
use frankencrt_core::{Oracle, OracleConfig};

const RINT: &[ModeCase] = &[
    ModeCase::each(3.5, 4.0, 3.0, 3.0, 4.0),
    ModeCase::each(-3.5, -4.0, -3.0, -4.0, -3.0),
    ModeCase::each(-0.4, -0.0, -0.0, -1.0, -0.0),
    ModeCase::invariant(2.0, 2.0),
];

#[test]
fn rint_follows_every_mode() {
    let env = HostFloatEnv;
    let mut oracle = Oracle::silent(OracleConfig::default());
    let report = RoundingDriver::new(&env).run(&mut oracle, |o, mode| {
        run_mode_float::<f64>(o, mode, "rint", math_abi::rint, RINT);
    });
    assert!(report.rejected.is_empty(), "host refused modes: {:?}", report.rejected);
    assert_eq!(report.passes.len(), 4);
    assert_eq!(oracle.counter().attempted, 16);
    assert!(oracle.counter().all_passed(), "{:#?}", oracle.failures());
}

#[test]
fn driver_restores_nearest_and_clears_context() {
    let env = HostFloatEnv;
    let mut oracle = Oracle::silent(OracleConfig::default());
    let mut seen = Vec::new();
    RoundingDriver::new(&env)
        .with_default_pass()
        .run(&mut oracle, |o, mode| {
            seen.push((o.context().to_string(), env.rounding_mode(), mode));
        });
    assert_eq!(seen.len(), 5);
    assert_eq!(seen[0].0, "FE_DFL_ENV ");
    assert_eq!(seen[4], ("FE_UPWARD ".to_string(), Some(RoundingMode::Upward), RoundingMode::Upward));
    assert_eq!(env.rounding_mode(), Some(RoundingMode::ToNearest));
    assert_eq!(oracle.context(), "");
}
