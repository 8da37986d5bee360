//! Bindings to the host `<math.h>`.
//!
//! Value-only entry points are declared `safe` in a private extern block and
//! re-exported through thin Rust-ABI wrappers, so a group can pass
//! `math_abi::floor` wherever an `Fn(f64) -> f64` is expected. Entry points
//! with out-parameters or hidden state are bound privately and wrapped.
//!
//! Long double variants are not bound: Rust has no matching type.

use std::ffi::{CStr, c_char, c_int, c_long, c_longlong};

use parking_lot::{Mutex, const_mutex};

/// Declares value-only entry points privately and re-exports each one as a
/// Rust-ABI function, so it can be handed to the table runners as a plain
/// `Fn`.
macro_rules! value_entry_points {
    ($($(#[$doc:meta])* fn $name:ident($($arg:ident: $ty:ty),*) -> $ret:ty;)*) => {
        mod native {
            use std::ffi::{c_int, c_long, c_longlong};

            #[cfg_attr(target_os = "linux", link(name = "m"))]
            unsafe extern "C" {
                $(pub(super) safe fn $name($($arg: $ty),*) -> $ret;)*
            }
        }

        $(
            $(#[$doc])*
            #[inline]
            #[must_use]
            pub fn $name($($arg: $ty),*) -> $ret {
                native::$name($($arg),*)
            }
        )*
    };
}

value_entry_points! {
    // Rounding and integer conversion.
    fn floor(x: f64) -> f64;
    fn floorf(x: f32) -> f32;
    fn ceil(x: f64) -> f64;
    fn ceilf(x: f32) -> f32;
    fn trunc(x: f64) -> f64;
    fn truncf(x: f32) -> f32;
    fn rint(x: f64) -> f64;
    fn rintf(x: f32) -> f32;
    fn nearbyint(x: f64) -> f64;
    fn nearbyintf(x: f32) -> f32;
    fn round(x: f64) -> f64;
    fn roundf(x: f32) -> f32;
    fn lrint(x: f64) -> c_long;
    fn lrintf(x: f32) -> c_long;
    fn llrint(x: f64) -> c_longlong;
    fn llrintf(x: f32) -> c_longlong;
    fn lround(x: f64) -> c_long;
    fn lroundf(x: f32) -> c_long;
    fn llround(x: f64) -> c_longlong;
    fn llroundf(x: f32) -> c_longlong;

    // Roots.
    fn sqrt(x: f64) -> f64;
    fn sqrtf(x: f32) -> f32;
    fn cbrt(x: f64) -> f64;
    fn cbrtf(x: f32) -> f32;
    fn hypot(x: f64, y: f64) -> f64;
    fn hypotf(x: f32, y: f32) -> f32;

    // Remainders.
    fn fmod(x: f64, y: f64) -> f64;
    fn fmodf(x: f32, y: f32) -> f32;
    fn remainder(x: f64, y: f64) -> f64;
    fn remainderf(x: f32, y: f32) -> f32;

    // Logarithms and exponentials.
    fn log(x: f64) -> f64;
    fn logf(x: f32) -> f32;
    fn log2(x: f64) -> f64;
    fn log2f(x: f32) -> f32;
    fn log10(x: f64) -> f64;
    fn log10f(x: f32) -> f32;
    fn log1p(x: f64) -> f64;
    fn log1pf(x: f32) -> f32;
    fn exp(x: f64) -> f64;
    fn expf(x: f32) -> f32;
    fn exp2(x: f64) -> f64;
    fn exp2f(x: f32) -> f32;
    fn expm1(x: f64) -> f64;
    fn expm1f(x: f32) -> f32;

    // Exponent inspection and scaling.
    fn ldexp(x: f64, n: c_int) -> f64;
    fn ldexpf(x: f32, n: c_int) -> f32;
    fn scalbn(x: f64, n: c_int) -> f64;
    fn scalbnf(x: f32, n: c_int) -> f32;
    fn scalbln(x: f64, n: c_long) -> f64;
    fn scalblnf(x: f32, n: c_long) -> f32;
    fn ilogb(x: f64) -> c_int;
    fn ilogbf(x: f32) -> c_int;
    fn logb(x: f64) -> f64;
    fn logbf(x: f32) -> f32;

    fn pow(x: f64, y: f64) -> f64;
    fn powf(x: f32, y: f32) -> f32;

    // Trigonometric.
    fn cos(x: f64) -> f64;
    fn cosf(x: f32) -> f32;
    fn sin(x: f64) -> f64;
    fn sinf(x: f32) -> f32;
    fn tan(x: f64) -> f64;
    fn tanf(x: f32) -> f32;
    fn acos(x: f64) -> f64;
    fn acosf(x: f32) -> f32;
    fn asin(x: f64) -> f64;
    fn asinf(x: f32) -> f32;
    fn atan(x: f64) -> f64;
    fn atanf(x: f32) -> f32;
    fn atan2(y: f64, x: f64) -> f64;
    fn atan2f(y: f32, x: f32) -> f32;

    // Hyperbolic.
    fn acosh(x: f64) -> f64;
    fn acoshf(x: f32) -> f32;
    fn asinh(x: f64) -> f64;
    fn asinhf(x: f32) -> f32;
    fn atanh(x: f64) -> f64;
    fn atanhf(x: f32) -> f32;
    fn cosh(x: f64) -> f64;
    fn coshf(x: f32) -> f32;
    fn sinh(x: f64) -> f64;
    fn sinhf(x: f32) -> f32;
    fn tanh(x: f64) -> f64;
    fn tanhf(x: f32) -> f32;

    // Miscellaneous.
    fn fma(x: f64, y: f64, z: f64) -> f64;
    fn fmaf(x: f32, y: f32, z: f32) -> f32;
    fn fabs(x: f64) -> f64;
    fn fabsf(x: f32) -> f32;
    fn erf(x: f64) -> f64;
    fn erff(x: f32) -> f32;
    fn erfc(x: f64) -> f64;
    fn erfcf(x: f32) -> f32;
    fn tgamma(x: f64) -> f64;
    fn tgammaf(x: f32) -> f32;
    fn nextafter(x: f64, y: f64) -> f64;
    fn nextafterf(x: f32, y: f32) -> f32;
    fn fdim(x: f64, y: f64) -> f64;
    fn fdimf(x: f32, y: f32) -> f32;
    fn fmax(x: f64, y: f64) -> f64;
    fn fmaxf(x: f32, y: f32) -> f32;
    fn fmin(x: f64, y: f64) -> f64;
    fn fminf(x: f32, y: f32) -> f32;
    fn copysign(x: f64, y: f64) -> f64;
    fn copysignf(x: f32, y: f32) -> f32;
}

#[cfg_attr(target_os = "linux", link(name = "m"))]
unsafe extern "C" {
    // Out-parameter entry points, wrapped below.
    #[link_name = "modf"]
    fn native_modf_sym(x: f64, iptr: *mut f64) -> f64;
    #[link_name = "modff"]
    fn native_modff_sym(x: f32, iptr: *mut f32) -> f32;
    #[link_name = "frexp"]
    fn native_frexp_sym(x: f64, exp: *mut c_int) -> f64;
    #[link_name = "frexpf"]
    fn native_frexpf_sym(x: f32, exp: *mut c_int) -> f32;
    #[link_name = "remquo"]
    fn native_remquo_sym(x: f64, y: f64, quo: *mut c_int) -> f64;
    #[link_name = "remquof"]
    fn native_remquof_sym(x: f32, y: f32, quo: *mut c_int) -> f32;
    #[link_name = "lgamma_r"]
    fn native_lgamma_r_sym(x: f64, sign: *mut c_int) -> f64;
    #[link_name = "lgammaf_r"]
    fn native_lgammaf_r_sym(x: f32, sign: *mut c_int) -> f32;
    #[link_name = "lgamma"]
    fn native_lgamma_sym(x: f64) -> f64;
    #[link_name = "lgammaf"]
    fn native_lgammaf_sym(x: f32) -> f32;
    #[link_name = "nan"]
    fn native_nan_sym(tag: *const c_char) -> f64;
    #[link_name = "nanf"]
    fn native_nanf_sym(tag: *const c_char) -> f32;
}

#[cfg(target_os = "linux")]
#[link(name = "m")]
unsafe extern "C" {
    #[link_name = "sincos"]
    fn native_sincos_sym(x: f64, sin: *mut f64, cos: *mut f64);
    #[link_name = "sincosf"]
    fn native_sincosf_sym(x: f32, sin: *mut f32, cos: *mut f32);
}

#[cfg(unix)]
unsafe extern "C" {
    /// Sign of Γ(x) left behind by the last `lgamma`/`lgammaf` call.
    static mut signgam: c_int;
}

/// Value `signgam` is preset to before each `lgamma` call, so a call that
/// never writes it is visible.
pub const SIGNGAM_PRESET: c_int = 42;

/// `lgamma` and `lgammaf` share `signgam`.
static SIGNGAM_LOCK: Mutex<()> = const_mutex(());

/// Call `f` with `signgam` preset, then read it back. `None` for the sign
/// where the host has no `signgam`.
fn with_signgam<T>(f: impl FnOnce() -> T) -> (T, Option<c_int>) {
    let _guard = SIGNGAM_LOCK.lock();
    #[cfg(unix)]
    {
        // SAFETY: every access to `signgam` in this process goes through
        // `SIGNGAM_LOCK`; raw-pointer accesses avoid references to a mutable
        // static.
        unsafe { (&raw mut signgam).write(SIGNGAM_PRESET) };
        let value = f();
        // SAFETY: as above.
        let sign = unsafe { (&raw const signgam).read() };
        (value, Some(sign))
    }
    #[cfg(not(unix))]
    {
        (f(), None)
    }
}

/// Non-reentrant `lgamma`: (log|Γ(x)|, `signgam` after the call).
#[must_use]
pub fn lgamma(x: f64) -> (f64, Option<c_int>) {
    // SAFETY: plain value call; the `signgam` side effect is serialised by
    // `with_signgam`.
    with_signgam(|| unsafe { native_lgamma_sym(x) })
}

#[must_use]
pub fn lgammaf(x: f32) -> (f32, Option<c_int>) {
    // SAFETY: as for `lgamma`.
    with_signgam(|| unsafe { native_lgammaf_sym(x) })
}

/// Value `ilogb` returns for zero.
#[cfg(all(
    target_env = "gnu",
    not(any(target_arch = "x86", target_arch = "x86_64"))
))]
pub const FP_ILOGB0: c_int = -c_int::MAX;
/// Value `ilogb` returns for NaN.
#[cfg(all(
    target_env = "gnu",
    not(any(target_arch = "x86", target_arch = "x86_64"))
))]
pub const FP_ILOGBNAN: c_int = c_int::MAX;

/// Value `ilogb` returns for zero.
#[cfg(not(all(
    target_env = "gnu",
    not(any(target_arch = "x86", target_arch = "x86_64"))
)))]
pub const FP_ILOGB0: c_int = c_int::MIN;
/// Value `ilogb` returns for NaN.
#[cfg(not(all(
    target_env = "gnu",
    not(any(target_arch = "x86", target_arch = "x86_64"))
)))]
pub const FP_ILOGBNAN: c_int = c_int::MIN;

/// `modf`: (fractional part, integral part).
#[must_use]
pub fn modf(x: f64) -> (f64, f64) {
    let mut integral = 0.0;
    // SAFETY: `integral` is a live, writable f64 for the duration of the call.
    let frac = unsafe { native_modf_sym(x, &mut integral) };
    (frac, integral)
}

#[must_use]
pub fn modff(x: f32) -> (f32, f32) {
    let mut integral = 0.0;
    // SAFETY: `integral` is a live, writable f32 for the duration of the call.
    let frac = unsafe { native_modff_sym(x, &mut integral) };
    (frac, integral)
}

/// `frexp`: (mantissa, exponent).
#[must_use]
pub fn frexp(x: f64) -> (f64, c_int) {
    let mut exp = 0;
    // SAFETY: `exp` is a live, writable int for the duration of the call.
    let mantissa = unsafe { native_frexp_sym(x, &mut exp) };
    (mantissa, exp)
}

#[must_use]
pub fn frexpf(x: f32) -> (f32, c_int) {
    let mut exp = 0;
    // SAFETY: `exp` is a live, writable int for the duration of the call.
    let mantissa = unsafe { native_frexpf_sym(x, &mut exp) };
    (mantissa, exp)
}

/// `remquo`: (remainder, low quotient bits with the quotient's sign).
#[must_use]
pub fn remquo(x: f64, y: f64) -> (f64, c_int) {
    let mut quo = 0;
    // SAFETY: `quo` is a live, writable int for the duration of the call.
    let rem = unsafe { native_remquo_sym(x, y, &mut quo) };
    (rem, quo)
}

#[must_use]
pub fn remquof(x: f32, y: f32) -> (f32, c_int) {
    let mut quo = 0;
    // SAFETY: `quo` is a live, writable int for the duration of the call.
    let rem = unsafe { native_remquof_sym(x, y, &mut quo) };
    (rem, quo)
}

/// Reentrant `lgamma`: (log|Γ(x)|, sign of Γ(x)).
#[must_use]
pub fn lgamma_r(x: f64) -> (f64, c_int) {
    let mut sign = 0;
    // SAFETY: `sign` is a live, writable int for the duration of the call.
    let value = unsafe { native_lgamma_r_sym(x, &mut sign) };
    (value, sign)
}

#[must_use]
pub fn lgammaf_r(x: f32) -> (f32, c_int) {
    let mut sign = 0;
    // SAFETY: `sign` is a live, writable int for the duration of the call.
    let value = unsafe { native_lgammaf_r_sym(x, &mut sign) };
    (value, sign)
}

#[must_use]
pub fn nan(tag: &CStr) -> f64 {
    // SAFETY: `tag` is NUL-terminated and outlives the call.
    unsafe { native_nan_sym(tag.as_ptr()) }
}

#[must_use]
pub fn nanf(tag: &CStr) -> f32 {
    // SAFETY: `tag` is NUL-terminated and outlives the call.
    unsafe { native_nanf_sym(tag.as_ptr()) }
}

/// `sincos`: (sine, cosine). `None` where the host library lacks it.
#[must_use]
pub fn sincos(x: f64) -> Option<(f64, f64)> {
    #[cfg(target_os = "linux")]
    {
        let (mut s, mut c) = (0.0, 0.0);
        // SAFETY: both out-pointers reference live, writable locals.
        unsafe { native_sincos_sym(x, &mut s, &mut c) };
        Some((s, c))
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = x;
        None
    }
}

#[must_use]
pub fn sincosf(x: f32) -> Option<(f32, f32)> {
    #[cfg(target_os = "linux")]
    {
        let (mut s, mut c) = (0.0, 0.0);
        // SAFETY: both out-pointers reference live, writable locals.
        unsafe { native_sincosf_sym(x, &mut s, &mut c) };
        Some((s, c))
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = x;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_entry_points_reach_the_host() {
        assert_eq!(floor(std::hint::black_box(-3.5)), -4.0);
        assert_eq!(ceilf(std::hint::black_box(-3.5)), -3.0);
        assert_eq!(hypot(3.0, 4.0), 5.0);
        assert_eq!(ilogb(1024.0), 10);
    }

    #[test]
    fn out_parameters_are_returned() {
        assert_eq!(modf(3.25), (0.25, 3.0));
        assert_eq!(frexp(0.0), (0.0, 0));
        assert_eq!(frexp(1024.0), (0.5, 11));
        assert_eq!(remquo(7.0, 2.0), (-1.0, 4));
        let (value, sign) = lgamma_r(-0.5);
        assert!((value - 1.265_512_123_484_645).abs() < 1e-12);
        assert_eq!(sign, -1);
    }

    #[test]
    fn lgamma_reports_sign_through_signgam() {
        let (value, sign) = lgamma(-0.5);
        assert!((value - 1.265_512_123_484_645).abs() < 1e-12);
        #[cfg(unix)]
        assert_eq!(sign, Some(-1));
        let (_, sign) = lgammaf(2.5);
        #[cfg(unix)]
        assert_eq!(sign, Some(1));
        #[cfg(not(unix))]
        assert_eq!(sign, None);
    }

    #[test]
    fn value_wrappers_are_plain_rust_functions() {
        let unary: fn(f64) -> f64 = floor;
        let binary: &dyn Fn(f32, f32) -> f32 = &hypotf;
        assert_eq!(unary(2.5), 2.0);
        assert_eq!(binary(3.0, 4.0), 5.0);
    }

    #[test]
    fn nan_tag_yields_quiet_nan() {
        assert!(nan(c"").is_nan());
        assert!(nanf(c"").is_nan());
    }

    #[test]
    fn ilogb_sentinels_differ_from_real_exponents() {
        assert_eq!(ilogb(0.0), FP_ILOGB0);
        assert_eq!(ilogb(f64::NAN), FP_ILOGBNAN);
    }
}
