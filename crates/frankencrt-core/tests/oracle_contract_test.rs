//! Integration test: oracle, equivalence policies, and atomic scripts as seen
//! from outside the crate.

use std::sync::atomic::{AtomicI32, AtomicPtr, Ordering};

use frankencrt_core::atomic::{
    Access, AtomicCell, Interlocked, Primitive, Script, ScriptOutcome, Unsupported, Width, verify_script,
};
use frankencrt_core::equivalence::{any_nan, exact, nan, signed, within};
use frankencrt_core::vector::{binary, run_binary, run_unary, unary};
use frankencrt_core::{FailureKind, NanSignPolicy, Oracle, OracleConfig, check, check_float, check_int};

/// Pointer exchange on std atomics; integer arithmetic is not offered.
struct PointerOnly;

impl Interlocked<AtomicPtr<u8>> for PointerOnly {
    fn apply(
        &self,
        cell: &AtomicPtr<u8>,
        _access: Access,
        primitive: Primitive<*mut u8>,
    ) -> Result<*mut u8, Unsupported> {
        match primitive {
            Primitive::Exchange(v) => Ok(cell.swap(v, Ordering::SeqCst)),
            Primitive::CompareExchange { exchange, comparand } => Ok(cell
                .compare_exchange(comparand, exchange, Ordering::SeqCst, Ordering::SeqCst)
                .unwrap_or_else(|prior| prior)),
            other => Err(Unsupported {
                primitive: other.name(),
                width: <AtomicPtr<u8> as AtomicCell>::WIDTH,
            }),
        }
    }
}

#[test]
fn tolerance_tightened_below_true_error_fails() {
    let mut oracle = Oracle::silent(OracleConfig::default());
    let cos1 = 1.0_f64.cos();
    assert!(check_float!(oracle, cos1, within(0.54, 0.01)));
    assert!(!check_float!(oracle, cos1, within(0.54, 1e-5)));
    assert_eq!(oracle.counter().failed, 1);
}

#[test]
fn sign_aware_distinguishes_negative_zero_power() {
    let mut oracle = Oracle::silent(OracleConfig::default());
    let cube = (-0.0_f64).powf(3.0);
    assert!(check_float!(oracle, cube, signed(-0.0)));
    assert!(!check_float!(oracle, cube, signed(0.0)));
    // Plain equality cannot tell the two apart.
    assert!(check_float!(oracle, cube, exact(0.0)));
}

#[test]
fn nan_any_accepts_any_payload_and_sign() {
    let mut oracle = Oracle::silent(OracleConfig::default().with_nan_signs(NanSignPolicy::Enforce));
    for bits in [0x7ff8_0000_0000_0000_u64, 0xfff8_0000_0000_0000, 0x7ff0_0000_0000_0042] {
        assert!(oracle.check_float("payload", f64::from_bits(bits), any_nan()));
    }
    assert!(!oracle.check_float("payload", f64::from_bits(0xfff8_0000_0000_0000), nan(f64::NAN)));
    assert_eq!(oracle.failures()[0].kind, FailureKind::NanExpectation);
}

#[test]
fn table_runners_count_every_row() {
    let mut oracle = Oracle::silent(OracleConfig::default());
    run_unary(
        &mut oracle,
        "sqrt",
        |x: f64| x.sqrt(),
        &[unary(9.0, exact(3.0)), unary(-0.0, signed(-0.0)), unary(-1.0, any_nan())],
    );
    run_binary(
        &mut oracle,
        "hypot",
        |x: f32, y| x.hypot(y),
        &[binary(3.0, 4.0, exact(5.0)), binary(f64::NAN, f64::INFINITY, exact(f64::INFINITY))],
    );
    assert_eq!(oracle.counter().attempted, 5);
    assert_eq!(oracle.counter().failed, 0, "{:?}", oracle.failures());
}

#[test]
fn pointer_script_chains_exchanges() {
    let mut anchors = [0_u8; 2];
    let p1: *mut u8 = &mut anchors[0];
    let p2: *mut u8 = &mut anchors[1];
    let null = std::ptr::null_mut();
    let script = Script::new("pointer", null)
        .then(Primitive::Exchange(p1), p1, null)
        .then(Primitive::Exchange(p2), p2, p1)
        .then(Primitive::CompareExchange { exchange: null, comparand: p1 }, p2, p2)
        .then(Primitive::CompareExchange { exchange: null, comparand: p2 }, null, p2);
    assert_eq!(script.validate(), Ok(()));

    let mut oracle = Oracle::silent(OracleConfig::default());
    let outcome = verify_script::<AtomicPtr<u8>, _>(&mut oracle, &PointerOnly, &script);
    assert_eq!(outcome, ScriptOutcome::Completed { steps: 4 });
    assert_eq!(oracle.counter().failed, 0, "{:?}", oracle.failures());

    let arith = Script::new("pointer arith", null).then(Primitive::Increment, null, null);
    let outcome = verify_script::<AtomicPtr<u8>, _>(&mut oracle, &PointerOnly, &arith);
    assert!(matches!(
        outcome,
        ScriptOutcome::Skipped { completed: 0, reason } if reason.width == Width::Pointer
    ));
}

#[test]
fn cell_divergence_does_not_cascade() {
    /// Increments by two.
    struct Sloppy;

    impl Interlocked<AtomicI32> for Sloppy {
        fn apply(&self, cell: &AtomicI32, _: Access, primitive: Primitive<i32>) -> Result<i32, Unsupported> {
            match primitive {
                Primitive::Increment => Ok(cell.fetch_add(2, Ordering::SeqCst) + 2),
                Primitive::Exchange(v) => Ok(cell.swap(v, Ordering::SeqCst)),
                other => Err(Unsupported {
                    primitive: other.name(),
                    width: Width::Bits32,
                }),
            }
        }
    }

    let script = Script::new("reanchor", 0)
        .then(Primitive::Increment, 1, 1)
        .then(Primitive::Exchange(9), 9, 1);
    let mut oracle = Oracle::silent(OracleConfig::default());
    verify_script::<AtomicI32, _>(&mut oracle, &Sloppy, &script);
    // Only the increment's two checks fail; the exchange sees the re-anchored 1.
    assert_eq!(oracle.counter().attempted, 4);
    assert_eq!(oracle.counter().failed, 2);
    assert!(oracle.failures().iter().all(|f| f.message.contains("InterlockedIncrement")));
}

#[test]
fn summary_and_exit_status() {
    let mut oracle = Oracle::silent(OracleConfig::default());
    check!(oracle, 1 < 2);
    check_int!(oracle, 7_i32 % 3, 1);
    assert_eq!(oracle.summary_line(), "2 tests, 0 failures");
    assert_eq!(oracle.exit_code(), 0);
    check_int!(oracle, -7_i32 % 3, 1);
    assert_eq!(oracle.summary_line(), "3 tests, 1 failures");
    assert_eq!(oracle.exit_code(), 1);
}
