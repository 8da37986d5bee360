//! Bindings to the host `<stdlib.h>` number parsers and `putenv`.

use std::ffi::{CStr, CString, c_char, c_int, c_long};

use parking_lot::Mutex;

use crate::errno_abi;
use crate::error::AbiError;

/// Serializes `putenv` against `getenv` reads from this crate.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// A parsed number with the parser's side effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    /// Bytes consumed (`end - start`).
    pub consumed: usize,
    /// `errno` after the call; cleared to 0 before it.
    pub errno: c_int,
}

fn parse<T>(op: &'static str, text: &str, call: impl FnOnce(*const c_char, *mut *mut c_char) -> T) -> Result<Parsed<T>, AbiError> {
    let owned = CString::new(text).map_err(|_| AbiError::InteriorNul { op })?;
    let start = owned.as_ptr();
    let mut end: *mut c_char = std::ptr::null_mut();
    errno_abi::set_errno(0);
    let value = call(start, &mut end);
    let errno = errno_abi::errno();
    let consumed = if end.is_null() {
        0
    } else {
        (end as usize).saturating_sub(start as usize)
    };
    Ok(Parsed {
        value,
        consumed,
        errno,
    })
}

pub fn strtod(text: &str) -> Result<Parsed<f64>, AbiError> {
    // SAFETY: `s` is NUL-terminated and `end` is a writable out-pointer.
    parse("strtod", text, |s, end| unsafe { libc::strtod(s, end) })
}

pub fn strtof(text: &str) -> Result<Parsed<f32>, AbiError> {
    // SAFETY: `s` is NUL-terminated and `end` is a writable out-pointer.
    parse("strtof", text, |s, end| unsafe { libc::strtof(s, end) })
}

pub fn strtol(text: &str, base: c_int) -> Result<Parsed<c_long>, AbiError> {
    // SAFETY: `s` is NUL-terminated and `end` is a writable out-pointer.
    parse("strtol", text, |s, end| unsafe { libc::strtol(s, end, base) })
}

/// `putenv(entry)`. The host keeps the pointer, so the buffer is leaked.
pub fn putenv(entry: &str) -> Result<c_int, AbiError> {
    let owned = CString::new(entry).map_err(|_| AbiError::InteriorNul { op: "putenv" })?;
    let _guard = ENV_LOCK.lock();
    // putenv adopts the string; it must stay alive for the process lifetime.
    let raw = owned.into_raw();
    // SAFETY: `raw` is a valid, NUL-terminated, never-freed buffer.
    Ok(unsafe { libc::putenv(raw) })
}

/// Whether `KEY=VALUE` is what the host's `getenv(KEY)` now reports.
///
/// Reads through the C runtime under the same lock `putenv` takes, never
/// through `std::env`, whose own lock does not serialise with this one.
/// Nothing else in the process may modify the environment meanwhile; the
/// environment group runs on the single test thread.
#[must_use]
pub fn environ_contains(entry: &str) -> bool {
    let Some((key, value)) = entry.split_once('=') else {
        return false;
    };
    let Ok(key) = CString::new(key) else {
        return false;
    };
    let _guard = ENV_LOCK.lock();
    // SAFETY: `key` is NUL-terminated; the result is only read while the
    // lock is held, so no `putenv` from this crate can replace it meanwhile.
    let found = unsafe { libc::getenv(key.as_ptr()) };
    if found.is_null() {
        return false;
    }
    // SAFETY: non-null `getenv` results are NUL-terminated strings.
    unsafe { CStr::from_ptr(found) }.to_bytes() == value.as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strtod_reports_consumed_prefix() {
        let parsed = strtod("1.e5z").unwrap();
        assert_eq!(parsed.value, 1e5);
        assert_eq!(parsed.consumed, 4);
        assert_eq!(parsed.errno, 0);
    }

    #[test]
    fn strtof_overflow_sets_erange() {
        let parsed = strtof("1.e40").unwrap();
        assert_eq!(parsed.value, f32::INFINITY);
        assert_eq!(parsed.errno, errno_abi::ERANGE);
    }

    #[test]
    fn putenv_entries_are_visible() {
        assert_eq!(putenv("FRANKENCRT_ABI_PUTENV=yes").unwrap(), 0);
        assert!(environ_contains("FRANKENCRT_ABI_PUTENV=yes"));
        assert!(!environ_contains("FRANKENCRT_ABI_PUTENV=no"));
    }

    #[test]
    fn updated_entry_replaces_previous_value() {
        assert_eq!(putenv("FRANKENCRT_ABI_UPDATE=1").unwrap(), 0);
        assert_eq!(putenv("FRANKENCRT_ABI_UPDATE=2").unwrap(), 0);
        assert!(environ_contains("FRANKENCRT_ABI_UPDATE=2"));
        assert!(!environ_contains("FRANKENCRT_ABI_UPDATE=1"));
        assert!(!environ_contains("FRANKENCRT_ABI_UNSET_ENTRY=1"));
        assert!(!environ_contains("no separator"));
    }
}
