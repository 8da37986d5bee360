//! Bindings to the host `snprintf`/`sscanf`.
//!
//! Variadic calls are only sound when the format matches the arguments, so
//! the wrappers never take a free-form format string: the conversion is an
//! enum and the format is assembled here.

use std::ffi::{CStr, CString, c_char, c_int, c_ulonglong};

use crate::error::AbiError;

/// Size of the output buffer handed to `snprintf`.
pub const FORMAT_BUF_LEN: usize = 200;
/// Byte the output buffer is pre-filled with.
pub const SENTINEL: u8 = b'#';

/// Result of one `snprintf` call into a sentinel-filled buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub text: String,
    /// `snprintf`'s return value.
    pub written: c_int,
    /// Last byte of the buffer after the call.
    pub tail: u8,
}

/// Floating-point conversion letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatConversion {
    Fixed,
    Exponent,
    HexFloat,
    General,
    FixedUpper,
    ExponentUpper,
    HexFloatUpper,
    GeneralUpper,
}

impl FloatConversion {
    /// `f e a g F E A G`.
    pub const ALL: [Self; 8] = [
        Self::Fixed,
        Self::Exponent,
        Self::HexFloat,
        Self::General,
        Self::FixedUpper,
        Self::ExponentUpper,
        Self::HexFloatUpper,
        Self::GeneralUpper,
    ];

    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Fixed => 'f',
            Self::Exponent => 'e',
            Self::HexFloat => 'a',
            Self::General => 'g',
            Self::FixedUpper => 'F',
            Self::ExponentUpper => 'E',
            Self::HexFloatUpper => 'A',
            Self::GeneralUpper => 'G',
        }
    }

    #[must_use]
    pub const fn is_upper(self) -> bool {
        self.letter().is_ascii_uppercase()
    }

    const fn format(self) -> &'static CStr {
        match self {
            Self::Fixed => c"%f",
            Self::Exponent => c"%e",
            Self::HexFloat => c"%a",
            Self::General => c"%g",
            Self::FixedUpper => c"%F",
            Self::ExponentUpper => c"%E",
            Self::HexFloatUpper => c"%A",
            Self::GeneralUpper => c"%G",
        }
    }
}

/// Integer conversion letter, all taking an `int`-sized argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntConversion {
    Decimal,
    Unsigned,
    Octal,
    Hex,
}

impl IntConversion {
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Decimal => 'd',
            Self::Unsigned => 'u',
            Self::Octal => 'o',
            Self::Hex => 'x',
        }
    }
}

fn format_into(call: impl FnOnce(*mut c_char, usize) -> c_int) -> Formatted {
    let mut buf = [SENTINEL; FORMAT_BUF_LEN];
    let written = call(buf.as_mut_ptr().cast(), buf.len());
    Formatted {
        text: crate::string_abi::c_text(&buf),
        written,
        tail: buf[FORMAT_BUF_LEN - 1],
    }
}

/// `snprintf(buf, 200, "%<conv>", value)`.
#[must_use]
pub fn snprintf_float(conversion: FloatConversion, value: f64) -> Formatted {
    let fmt = conversion.format();
    // SAFETY: the format has exactly one double conversion and the buffer
    // length passed is the buffer's real length.
    format_into(|buf, len| unsafe { libc::snprintf(buf, len, fmt.as_ptr(), value) })
}

/// `snprintf(buf, 200, "%<flags><width><conv>", value)`. Flags are limited to
/// the printf flag characters.
pub fn snprintf_int(flags: &str, width: u32, conversion: IntConversion, value: c_int) -> Result<Formatted, AbiError> {
    if !flags.chars().all(|c| "-+ #0".contains(c)) {
        return Err(AbiError::Format {
            op: "snprintf",
            format: flags.to_string(),
        });
    }
    let spec = format!("%{flags}{width}{}", conversion.letter());
    let fmt = CString::new(spec).map_err(|_| AbiError::InteriorNul { op: "snprintf" })?;
    // SAFETY: the format has exactly one int conversion (flags validated
    // above) and the buffer length passed is the buffer's real length.
    Ok(format_into(|buf, len| unsafe {
        libc::snprintf(buf, len, fmt.as_ptr(), value)
    }))
}

/// `snprintf` of ten 64-bit values with `%llx`, space-separated.
#[must_use]
pub fn snprintf_hex64(v: &[u64; 10]) -> Formatted {
    let a: [c_ulonglong; 10] = v.map(c_ulonglong::from);
    // SAFETY: ten `%llx` conversions matched by ten unsigned long long
    // arguments.
    format_into(|buf, len| unsafe {
        libc::snprintf(
            buf,
            len,
            c"%llx %llx %llx %llx %llx %llx %llx %llx %llx %llx".as_ptr(),
            a[0],
            a[1],
            a[2],
            a[3],
            a[4],
            a[5],
            a[6],
            a[7],
            a[8],
            a[9],
        )
    })
}

/// `sscanf(input, "%llx" x10)`: (conversions assigned, values). Unassigned
/// slots keep the value `0xff`.
pub fn sscanf_hex64(input: &str) -> Result<(c_int, [u64; 10]), AbiError> {
    let input = CString::new(input).map_err(|_| AbiError::InteriorNul { op: "sscanf" })?;
    let mut v: [c_ulonglong; 10] = [0xff; 10];
    let [v0, v1, v2, v3, v4, v5, v6, v7, v8, v9] = &mut v;
    // SAFETY: ten `%llx` conversions matched by ten distinct, writable
    // unsigned long long pointers; input is NUL-terminated.
    let assigned = unsafe {
        libc::sscanf(
            input.as_ptr(),
            c"%llx %llx %llx %llx %llx %llx %llx %llx %llx %llx".as_ptr(),
            v0 as *mut c_ulonglong,
            v1 as *mut c_ulonglong,
            v2 as *mut c_ulonglong,
            v3 as *mut c_ulonglong,
            v4 as *mut c_ulonglong,
            v5 as *mut c_ulonglong,
            v6 as *mut c_ulonglong,
            v7 as *mut c_ulonglong,
            v8 as *mut c_ulonglong,
            v9 as *mut c_ulonglong,
        )
    };
    Ok((assigned, v.map(u64::from)))
}

/// `sscanf(input, "%f %lf")`: (conversions assigned, float, double).
pub fn sscanf_float_double(input: &str) -> Result<(c_int, f32, f64), AbiError> {
    let input = CString::new(input).map_err(|_| AbiError::InteriorNul { op: "sscanf" })?;
    let mut single: f32 = f32::NAN;
    let mut double: f64 = f64::NAN;
    // SAFETY: `%f` matched by a float pointer and `%lf` by a double pointer;
    // input is NUL-terminated.
    let assigned = unsafe {
        libc::sscanf(
            input.as_ptr(),
            c"%f %lf".as_ptr(),
            &mut single as *mut f32,
            &mut double as *mut f64,
        )
    };
    Ok((assigned, single, double))
}
