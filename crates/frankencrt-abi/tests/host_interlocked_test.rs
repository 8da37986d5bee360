//! Integration tests: host atomics against scripted contracts.
//!
//! Validates that:
//! - 32- and 64-bit scripts complete with every check passing
//! - pointer cells support exchange and compare-exchange only
//! - bit scans agree with the expected indices

use std::sync::atomic::{AtomicI32, AtomicI64, AtomicPtr};

use frankencrt_abi::HostInterlocked;
use frankencrt_core::atomic::{Primitive, ScanScript, Script, ScriptOutcome, Width, verify_bit_scans, verify_script};
use frankencrt_core::{Oracle, OracleConfig};

#[test]
fn thirty_two_bit_script_passes() {
    let script = Script::new("i32", 0i32)
        .then(Primitive::BitTestAndSet(0), 1, 0)
        .then(Primitive::BitTestAndSet(0), 1, 1)
        .then(Primitive::BitTestAndComplement(3), 9, 0)
        .then(Primitive::BitTestAndReset(0), 8, 1)
        .then(Primitive::Increment, 9, 9)
        .then(Primitive::Decrement, 8, 8)
        .then(Primitive::Add(7), 15, 15)
        .then(Primitive::ExchangeAdd(1), 16, 15)
        .then(Primitive::Exchange(-1), -1, 16)
        .then(Primitive::CompareExchange { exchange: 5, comparand: 0 }, -1, -1)
        .then(Primitive::CompareExchange { exchange: 5, comparand: -1 }, 5, -1)
        .then(Primitive::Or(2), 7, 5)
        .then(Primitive::And(3), 3, 7)
        .then(Primitive::Xor(1), 2, 3)
        .then_plain(Primitive::BitTestAndSet(31), i32::MIN | 2, 0);
    assert_eq!(script.validate(), Ok(()));
    let mut oracle = Oracle::silent(OracleConfig::default());
    let outcome = verify_script::<AtomicI32, _>(&mut oracle, &HostInterlocked, &script);
    assert_eq!(outcome, ScriptOutcome::Completed { steps: 15 });
    assert!(oracle.counter().all_passed(), "{:#?}", oracle.failures());
}

#[test]
fn sixty_four_bit_script_reaches_high_bits() {
    let script = Script::new("i64", 0i64)
        .then(Primitive::BitTestAndSet(63), i64::MIN, 0)
        .then(Primitive::BitTest(63), i64::MIN, 1)
        .then(Primitive::Add(1), i64::MIN + 1, i64::MIN + 1);
    let mut oracle = Oracle::silent(OracleConfig::default());
    let outcome = verify_script::<AtomicI64, _>(&mut oracle, &HostInterlocked, &script);
    assert!(!outcome.skipped());
    assert_eq!(oracle.counter().failed, 0);
}

#[test]
fn pointer_cells_skip_arithmetic() {
    let mut slot = [0u8; 2];
    let a = slot.as_mut_ptr();
    let b = a.wrapping_add(1);
    let script = Script::new("ptr", a)
        .then(Primitive::Exchange(b), b, a)
        .then(Primitive::CompareExchange { exchange: a, comparand: b }, a, b)
        .then(Primitive::Increment, a, a);
    let mut oracle = Oracle::silent(OracleConfig::default());
    let outcome = verify_script::<AtomicPtr<u8>, _>(&mut oracle, &HostInterlocked, &script);
    assert!(matches!(outcome, ScriptOutcome::Skipped { completed: 2, .. }));
    assert_eq!(oracle.counter().attempted, 4);
    assert!(oracle.counter().all_passed());
}

#[test]
fn bit_scans_find_expected_indices() {
    let scans = ScanScript::new("scan", Width::Bits32)
        .forward(0x18, Some(3))
        .reverse(0x18, Some(4))
        .forward(0, None);
    let mut oracle = Oracle::silent(OracleConfig::default());
    let outcome = verify_bit_scans(&mut oracle, &HostInterlocked, &scans);
    assert_eq!(outcome, ScriptOutcome::Completed { steps: 3 });
    assert_eq!(oracle.counter().attempted, 5);
    assert!(oracle.counter().all_passed());
}
