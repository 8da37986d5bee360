//! Opaque value injection.
//!
//! Every literal feeding a function under test passes through one of these
//! wrappers. The wrapper is an identity function, but it is reached through a
//! function pointer loaded from a runtime-mutable table and laundered through
//! [`black_box`], so the optimizer can neither see the operand's value nor
//! constant-fold the call under test (LLVM recognises libm entry points by
//! name and would otherwise evaluate them at compile time with its own
//! semantics).
//!
//! The table is installed once before any check runs and treated as
//! read-only afterwards.

use std::ffi::{c_char, c_long, c_ulong};
use std::hint::black_box;

use parking_lot::{RwLock, const_rwlock};

/// One identity wrapper per operand type.
#[derive(Clone, Copy)]
pub struct OpaqueTable {
    pub character: fn(c_char) -> c_char,
    pub double: fn(f64) -> f64,
    pub long: fn(c_long) -> c_long,
    pub ulong: fn(c_ulong) -> c_ulong,
    pub longlong: fn(i64) -> i64,
    pub ulonglong: fn(u64) -> u64,
    pub string: for<'a> fn(&'a str) -> &'a str,
}

#[inline(never)]
fn identity<T>(v: T) -> T {
    v
}

#[inline(never)]
fn identity_str(s: &str) -> &str {
    s
}

impl OpaqueTable {
    pub const IDENTITY: Self = Self {
        character: identity::<c_char>,
        double: identity::<f64>,
        long: identity::<c_long>,
        ulong: identity::<c_ulong>,
        longlong: identity::<i64>,
        ulonglong: identity::<u64>,
        string: identity_str,
    };
}

impl Default for OpaqueTable {
    fn default() -> Self {
        Self::IDENTITY
    }
}

static TABLE: RwLock<OpaqueTable> = const_rwlock(OpaqueTable::IDENTITY);

/// Replace the wrapper table. Call before the first check.
pub fn install(table: OpaqueTable) {
    *TABLE.write() = table;
}

#[inline]
fn table() -> OpaqueTable {
    black_box(*TABLE.read())
}

#[must_use]
pub fn character(v: c_char) -> c_char {
    (table().character)(black_box(v))
}

#[must_use]
pub fn double(v: f64) -> f64 {
    (table().double)(black_box(v))
}

#[must_use]
pub fn long(v: c_long) -> c_long {
    (table().long)(black_box(v))
}

#[must_use]
pub fn ulong(v: c_ulong) -> c_ulong {
    (table().ulong)(black_box(v))
}

#[must_use]
pub fn longlong(v: i64) -> i64 {
    (table().longlong)(black_box(v))
}

#[must_use]
pub fn ulonglong(v: u64) -> u64 {
    (table().ulonglong)(black_box(v))
}

#[must_use]
pub fn string(v: &str) -> &str {
    (table().string)(black_box(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrappers_are_identities() {
        assert_eq!(character(b'#' as c_char), b'#' as c_char);
        assert_eq!(double(0.625).to_bits(), 0.625_f64.to_bits());
        assert_eq!(double(-0.0).to_bits(), (-0.0_f64).to_bits());
        assert_eq!(double(-f64::NAN).to_bits(), (-f64::NAN).to_bits());
        assert_eq!(long(-7), -7);
        assert_eq!(ulong(4_294_967_289), 4_294_967_289);
        assert_eq!(longlong(i64::MIN), i64::MIN);
        assert_eq!(ulonglong(u64::MAX), u64::MAX);
        assert_eq!(string(" foo bar "), " foo bar ");
    }

    #[test]
    fn installed_table_is_used() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static CALLS: AtomicUsize = AtomicUsize::new(0);
        fn counting(v: i64) -> i64 {
            CALLS.fetch_add(1, Ordering::SeqCst);
            v
        }

        let original = *TABLE.read();
        install(OpaqueTable {
            longlong: counting,
            ..OpaqueTable::IDENTITY
        });
        assert_eq!(longlong(21), 21);
        assert!(CALLS.load(Ordering::SeqCst) >= 1);
        install(original);
    }
}
