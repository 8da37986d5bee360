//! Interlocked, bit-test and bit-scan contracts.
//!
//! Each script tracks one cell by hand through a run of primitives. The
//! host's primitives are judged on both the returned value and the value left
//! in the cell. A primitive the host lacks at some width ends that script
//! early without failing it.

use std::ptr;
use std::sync::atomic::{AtomicI32, AtomicPtr};

use frankencrt_abi::HostInterlocked;
use frankencrt_core::atomic::{
    AtomicCell, Interlocked, Primitive, ScanScript, Script, Width, verify_bit_scans, verify_script,
};
use frankencrt_core::{FailureKind, Oracle};

#[cfg(target_has_atomic = "64")]
use std::sync::atomic::AtomicI64;

use frankencrt_core::atomic::Primitive::{
    And, BitTest, BitTestAndComplement, BitTestAndReset, BitTestAndSet, CompareExchange, Decrement, Exchange,
    ExchangeAdd, Increment, Or, Xor,
};

#[cfg(target_has_atomic = "64")]
const B40: i64 = 0x100_0000_0000;
#[cfg(target_has_atomic = "64")]
const B41: i64 = 0x200_0000_0000;

fn cas<V>(exchange: V, comparand: V) -> Primitive<V> {
    CompareExchange { exchange, comparand }
}

fn interlocked_32() -> Script<i32> {
    Script::new("Interlocked", 0)
        .then(BitTestAndSet(0), 1, 0)
        .then(BitTestAndSet(2), 5, 0)
        .then(BitTestAndSet(2), 5, 1)
        .then(BitTestAndReset(2), 1, 1)
        .then(BitTestAndReset(2), 1, 0)
        .then(BitTestAndReset(0), 0, 1)
        .then(Increment, 1, 1)
        .then(Decrement, 0, 0)
        .then(Primitive::Add(7), 7, 7)
        .then(Primitive::Add(-2), 5, 5)
        .then(ExchangeAdd(1), 6, 5)
        .then(Exchange(2), 2, 6)
        .then(cas(7, 1), 2, 2)
        .then(cas(5, 2), 5, 2)
        .then(Or(2), 7, 5)
        .then(Or(2), 7, 7)
        .then(And(2), 2, 7)
        .then(And(2), 2, 2)
        .then(Xor(2), 0, 2)
        .then(Xor(2), 2, 0)
        .then(Xor(2), 0, 2)
}

/// Compiler-intrinsic spellings, including the non-interlocked `_bittest*`.
fn intrinsic_32() -> Script<i32> {
    Script::new("_Interlocked", 0)
        .then(BitTestAndSet(0), 1, 0)
        .then(BitTestAndSet(2), 5, 0)
        .then(BitTestAndSet(2), 5, 1)
        .then(BitTestAndReset(2), 1, 1)
        .then(BitTestAndReset(2), 1, 0)
        .then(BitTestAndReset(0), 0, 1)
        .then(Increment, 1, 1)
        .then(Decrement, 0, 0)
        .then_plain(BitTestAndSet(0), 1, 0)
        .then_plain(BitTestAndSet(2), 5, 0)
        .then_plain(BitTestAndSet(2), 5, 1)
        .then_plain(BitTest(0), 5, 1)
        .then_plain(BitTest(1), 5, 0)
        .then_plain(BitTestAndReset(2), 1, 1)
        .then_plain(BitTestAndReset(2), 1, 0)
        .then_plain(BitTestAndReset(0), 0, 1)
        .then_plain(BitTestAndComplement(2), 4, 0)
        .then_plain(BitTestAndComplement(2), 0, 1)
        .then(ExchangeAdd(1), 1, 0)
        .then(Exchange(2), 2, 1)
        .then(cas(7, 1), 2, 2)
        .then(cas(0, 2), 0, 2)
        .then(Or(2), 2, 0)
        .then(Or(5), 7, 2)
        .then(And(2), 2, 7)
        .then(And(2), 2, 2)
        .then(Xor(2), 0, 2)
        .then(Xor(2), 2, 0)
        .then(Xor(2), 0, 2)
}

#[cfg(target_has_atomic = "64")]
fn interlocked_64() -> Script<i64> {
    Script::new("Interlocked64", 0)
        .then(BitTestAndSet(0), 1, 0)
        .then(BitTestAndSet(2), 5, 0)
        .then(BitTestAndSet(2), 5, 1)
        .then(BitTestAndSet(40), B40 | 5, 0)
        .then(BitTestAndReset(40), 5, 1)
        .then(BitTestAndReset(2), 1, 1)
        .then(BitTestAndReset(2), 1, 0)
        .then(BitTestAndReset(0), 0, 1)
        .then(Primitive::Add(7), 7, 7)
        .then(Primitive::Add(B40), B40 | 7, B40 | 7)
        .then(Increment, B40 | 8, B40 | 8)
        .then(Decrement, B40 | 7, B40 | 7)
        .then(Primitive::Add(-(B40 | 2)), 5, 5)
        .then(ExchangeAdd(B40), B40 | 5, 5)
        .then(Exchange(B40), B40, B40 | 5)
        .then(cas(7, 1), B40, B40)
        .then(cas(B41 | 5, B40), B41 | 5, B40)
        .then(Or(2), B41 | 7, B41 | 5)
        .then(Or(B40), B41 | B40 | 7, B41 | 7)
        .then(And(B41), B41, B41 | B40 | 7)
        .then(And(B41), B41, B41)
        .then(Xor(B41), 0, B41)
        .then(Xor(B41), B41, 0)
        .then(Xor(B41), 0, B41)
}

#[cfg(target_has_atomic = "64")]
fn intrinsic_64() -> Script<i64> {
    Script::new("_Interlocked64", 0)
        .then(BitTestAndSet(0), 1, 0)
        .then(BitTestAndSet(2), 5, 0)
        .then(BitTestAndSet(2), 5, 1)
        .then(BitTestAndSet(40), B40 | 5, 0)
        .then(BitTestAndSet(41), B41 | B40 | 5, 0)
        .then(BitTestAndReset(40), B41 | 5, 1)
        .then(BitTestAndReset(2), B41 | 1, 1)
        .then(BitTestAndReset(2), B41 | 1, 0)
        .then(BitTestAndReset(0), B41, 1)
        .then(Increment, B41 | 1, B41 | 1)
        .then(Decrement, B41, B41)
        .then(BitTestAndReset(41), 0, 1)
        .then_plain(BitTestAndSet(0), 1, 0)
        .then_plain(BitTestAndSet(2), 5, 0)
        .then_plain(BitTestAndSet(2), 5, 1)
        .then_plain(BitTestAndSet(40), B40 | 5, 0)
        .then_plain(BitTestAndSet(41), B41 | B40 | 5, 0)
        .then_plain(BitTest(0), B41 | B40 | 5, 1)
        .then_plain(BitTest(1), B41 | B40 | 5, 0)
        .then_plain(BitTest(41), B41 | B40 | 5, 1)
        .then_plain(BitTest(42), B41 | B40 | 5, 0)
        .then_plain(BitTestAndReset(40), B41 | 5, 1)
        .then_plain(BitTestAndReset(2), B41 | 1, 1)
        .then_plain(BitTestAndReset(2), B41 | 1, 0)
        .then_plain(BitTestAndReset(0), B41, 1)
        .then_plain(BitTestAndComplement(2), B41 | 4, 0)
        .then_plain(BitTestAndComplement(2), B41, 1)
        .then_plain(BitTestAndComplement(40), B41 | B40, 0)
        .then_plain(BitTestAndComplement(40), B41, 1)
        .then_plain(BitTestAndReset(41), 0, 1)
        .then(ExchangeAdd(B41), B41, 0)
        .then(Exchange(B40), B40, B41)
        .then(cas(7, 1), B40, B40)
        .then(cas(B41, B40), B41, B40)
        .then(Or(B40), B41 | B40, B41)
        .then(And(B40), B40, B41 | B40)
        .then(Xor(B40), 0, B40)
        .then(Xor(B40), B40, 0)
        .then(Xor(B40), 0, B40)
}

fn pointer(first: *mut u8, second: *mut u8) -> Script<*mut u8> {
    let null = ptr::null_mut();
    Script::new("InterlockedPointer", null)
        .then(Exchange(first), first, null)
        .then(Exchange(second), second, first)
        .then(cas(null, first), second, second)
        .then(cas(null, second), null, second)
}

fn scans(label: &'static str, width: Width) -> ScanScript {
    let script = ScanScript::new(label, width)
        .forward(0, None)
        .forward(1, Some(0))
        .forward(0x8000_0000, Some(31))
        .forward(0x8000_0001, Some(0))
        .reverse(0, None)
        .reverse(1, Some(0))
        .reverse(0x8000_0000, Some(31))
        .reverse(0x8000_0001, Some(31));
    match width {
        Width::Bits64 => script
            .forward(0x8000_0000_0000_0000, Some(63))
            .reverse(0x8000_0000_0000_0000, Some(63)),
        _ => script,
    }
}

pub(super) fn run(oracle: &mut Oracle) {
    let host = HostInterlocked;
    verify::<AtomicI32>(oracle, &host, &interlocked_32());
    verify::<AtomicI32>(oracle, &host, &intrinsic_32());

    #[cfg(target_has_atomic = "64")]
    {
        verify::<AtomicI64>(oracle, &host, &interlocked_64());
        verify::<AtomicI64>(oracle, &host, &intrinsic_64());
    }

    let mut slots = [0u8; 2];
    let first = slots.as_mut_ptr();
    let second = first.wrapping_add(1);
    verify::<AtomicPtr<u8>>(oracle, &host, &pointer(first, second));

    verify_bit_scans(oracle, &host, &scans("BitScan", Width::Bits32));
    verify_bit_scans(oracle, &host, &scans("BitScan64", Width::Bits64));
}

/// A script whose own bookkeeping is inconsistent is reported instead of run.
#[track_caller]
fn verify<C: AtomicCell>(oracle: &mut Oracle, host: &HostInterlocked, script: &Script<C::Value>)
where
    HostInterlocked: Interlocked<C>,
{
    if let Err(err) = script.validate() {
        oracle.check_with(false, FailureKind::Condition, || err.to_string());
        return;
    }
    // Unsupported primitives end the script; the oracle records the skip.
    let _ = verify_script::<C, _>(oracle, host, script);
}
