//! Integer division and float/integer conversion.
//!
//! On some targets these lower to runtime helper calls (`__rt_sdiv`,
//! `__udivdi3`, `__fixdfti`, ...) rather than instructions. Every operand goes
//! through the opaque layer so the helpers are actually reached.

use std::ffi::{c_long, c_ulong};
use std::fmt::Display;
use std::ops::{Div, Rem};

use frankencrt_core::equivalence::{exact, narrow, widen};
use frankencrt_core::oracle::IntLike;
use frankencrt_core::{Oracle, opaque};

/// Dividend, divisor, quotient, remainder.
type DivCase<T> = (T, T, T, T);

const SDIV32: &[DivCase<i32>] = &[
    (7, 7, 1, 0),
    (-7, 7, -1, 0),
    (-7, -7, 1, 0),
    (7, -7, -1, 0),
    (1_073_741_824, 3, 357_913_941, 1),
    (0, 3, 0, 0),
    (0, -3, 0, 0),
    (1024, 357_913_941, 0, 1024),
    (1_073_741_824, 357_913_941, 3, 1),
    (2_147_483_647, 1, 2_147_483_647, 0),
    (2_147_483_647, -1, -2_147_483_647, 0),
    (i32::MIN, 1, i32::MIN, 0),
];

const UDIV32: &[DivCase<u32>] = &[
    (7, 7, 1, 0),
    (4_294_967_289, 7, 613_566_755, 4),
    (4_294_967_289, 1, 4_294_967_289, 0),
    (1_073_741_824, 3, 357_913_941, 1),
    (0, 3, 0, 0),
    (1024, 357_913_941, 0, 1024),
    (1_073_741_824, 357_913_941, 3, 1),
    (2_147_483_647, 1, 2_147_483_647, 0),
];

const SDIV64: &[DivCase<i64>] = &[
    (7, 7, 1, 0),
    (-7, 7, -1, 0),
    (-7, -7, 1, 0),
    (7, -7, -1, 0),
    (1_073_741_824, 3, 357_913_941, 1),
    (0, 3, 0, 0),
    (0, -3, 0, 0),
    (1024, 357_913_941, 0, 1024),
    (1_073_741_824, 357_913_941, 3, 1),
    (2_147_483_647, 1, 2_147_483_647, 0),
    (2_147_483_647, -1, -2_147_483_647, 0),
    (-2_147_483_648, 1, -2_147_483_648, 0),
    (0, 2_305_843_009_213_693_952, 0, 0),
    (0, 2_305_843_009_213_693_953, 0, 0),
    (0, 2_147_483_648, 0, 0),
    (0, 4_294_967_296, 0, 0),
    (4_294_967_296, 4_294_967_296, 1, 0),
    (4_294_967_295, 4_294_967_296, 0, 4_294_967_295),
    (883_547_321_287_490_176, 128, 6_902_713_447_558_517, 0),
];

const UDIV64: &[DivCase<u64>] = &[
    (7, 7, 1, 0),
    (4_294_967_289, 7, 613_566_755, 4),
    (4_294_967_289, 1, 4_294_967_289, 0),
    (1_073_741_824, 3, 357_913_941, 1),
    (0, 3, 0, 0),
    (1024, 357_913_941, 0, 1024),
    (1_073_741_824, 357_913_941, 3, 1),
    (2_147_483_647, 1, 2_147_483_647, 0),
    (u64::MAX, 1, u64::MAX, 0),
    (0, 2_305_843_009_213_693_952, 0, 0),
    (0, 2_305_843_009_213_693_953, 0, 0),
    (0, 2_147_483_648, 0, 0),
    (0, 4_294_967_296, 0, 0),
    (4_294_967_296, 4_294_967_296, 1, 0),
    (4_294_967_297, 8_589_934_593, 0, 4_294_967_297),
    (883_547_321_287_490_176, 128, 6_902_713_447_558_517, 0),
];

/// Float operand and the truncated integer, at double precision.
const DOUBLE_TO_INT: &[(f64, i64)] = &[
    (4.2, 4),
    (123_456_789_012_345_678.0, 123_456_789_012_345_680),
    (-123_456_789_012_345.0, -123_456_789_012_345),
];

/// Values exactly representable at single precision.
const FLOAT_TO_INT: &[(f64, i64)] = &[(4.2, 4), (274_877_906_944.0, 274_877_906_944), (-274_877_906_944.0, -274_877_906_944)];

const SIGNED_TO_DOUBLE: &[i64] = &[4, 123_456_789_012_345, -123_456_789_012_345];
const SIGNED_TO_FLOAT: &[i64] = &[4, 274_877_906_944, -274_877_906_944];
const UNSIGNED_TO_FLOAT: &[u64] = &[4, 17_293_822_569_102_704_640];

pub(super) fn run(oracle: &mut Oracle) {
    divisions(oracle, "long", opaque_i32, SDIV32);
    divisions(oracle, "unsigned long", opaque_u32, UDIV32);
    divisions(oracle, "long long", opaque::longlong, SDIV64);
    divisions(oracle, "unsigned long long", opaque::ulonglong, UDIV64);

    float_to_int(oracle);
    int_to_float(oracle);
}

fn opaque_i32(v: i32) -> i32 {
    i32::try_from(opaque::long(c_long::from(v))).unwrap_or(v)
}

fn opaque_u32(v: u32) -> u32 {
    u32::try_from(opaque::ulong(c_ulong::from(v))).unwrap_or(v)
}

#[track_caller]
fn divisions<T>(oracle: &mut Oracle, ty: &str, hide: impl Fn(T) -> T, cases: &[DivCase<T>])
where
    T: IntLike + Display + Div<Output = T> + Rem<Output = T>,
{
    for &(a, b, quotient, remainder) in cases {
        let (x, y) = (hide(a), hide(b));
        oracle.check_int(&format!("({ty}){a} / ({ty}){b}"), x / y, quotient);
        oracle.check_int(&format!("({ty}){a} % ({ty}){b}"), x % y, remainder);
    }
}

#[track_caller]
fn float_to_int(oracle: &mut Oracle) {
    for &(x, expected) in DOUBLE_TO_INT {
        let v = opaque::double(x);
        oracle.check_int(&format!("(long long){x:?}"), v as i64, expected);
        oracle.check_int(&format!("(__int128){x:?}"), v as i128, i128::from(expected));
        if let Ok(unsigned) = u64::try_from(expected) {
            oracle.check_int(&format!("(unsigned long long){x:?}"), v as u64, unsigned);
            oracle.check_int(&format!("(unsigned __int128){x:?}"), v as u128, u128::from(unsigned));
        }
    }

    for &(x, expected) in FLOAT_TO_INT {
        let v = narrow(opaque::double(x));
        oracle.check_int(&format!("(long long)(float){x:?}"), v as i64, expected);
        oracle.check_int(&format!("(__int128)(float){x:?}"), v as i128, i128::from(expected));
        if let Ok(unsigned) = u64::try_from(expected) {
            oracle.check_int(&format!("(unsigned long long)(float){x:?}"), v as u64, unsigned);
            oracle.check_int(&format!("(unsigned __int128)(float){x:?}"), v as u128, u128::from(unsigned));
        }
    }
}

#[track_caller]
fn int_to_float(oracle: &mut Oracle) {
    for &n in SIGNED_TO_DOUBLE {
        let v = opaque::longlong(n);
        oracle.check_float(&format!("(double){n}LL"), v as f64, exact(n as f64));
        oracle.check_float(&format!("(double)(__int128){n}LL"), i128::from(v) as f64, exact(n as f64));
    }
    for &n in SIGNED_TO_FLOAT {
        let v = opaque::longlong(n);
        oracle.check_float(&format!("(float){n}LL"), widen(v as f32), exact(n as f64));
        oracle.check_float(&format!("(float)(__int128){n}LL"), widen(i128::from(v) as f32), exact(n as f64));
    }
    for &n in UNSIGNED_TO_FLOAT {
        let v = opaque::ulonglong(n);
        oracle.check_float(&format!("(double){n}ULL"), v as f64, exact(n as f64));
        oracle.check_float(&format!("(float){n}ULL"), widen(v as f32), exact(n as f64));
        oracle.check_float(&format!("(double)(unsigned __int128){n}ULL"), u128::from(v) as f64, exact(n as f64));
        oracle.check_float(&format!("(float)(unsigned __int128){n}ULL"), widen(u128::from(v) as f32), exact(n as f64));
    }
}
