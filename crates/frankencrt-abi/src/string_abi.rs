//! Bindings to the host `<string.h>`.
//!
//! Each wrapper checks that the host call stays inside the caller's buffer
//! before calling, then returns the host's pointer result untouched so the
//! caller can check it against the buffer it passed.

use std::ffi::{CStr, CString, c_char, c_int, c_void};

use parking_lot::Mutex;

use crate::error::AbiError;

/// `strtok` keeps its position in process-global state.
static STRTOK_LOCK: Mutex<()> = Mutex::new(());

fn within(op: &'static str, buf: &[u8], offset: usize, len: usize) -> Result<(), AbiError> {
    match offset.checked_add(len) {
        Some(end) if end <= buf.len() => Ok(()),
        _ => Err(AbiError::OutOfBounds {
            op,
            offset,
            len,
            capacity: buf.len(),
        }),
    }
}

fn terminated_len(op: &'static str, buf: &[u8]) -> Result<usize, AbiError> {
    buf.iter()
        .position(|&b| b == 0)
        .ok_or(AbiError::Unterminated { op })
}

fn fits(op: &'static str, needed: usize, buf: &[u8]) -> Result<(), AbiError> {
    if needed <= buf.len() {
        Ok(())
    } else {
        Err(AbiError::BufferTooSmall {
            op,
            needed,
            capacity: buf.len(),
        })
    }
}

/// Text of a NUL-terminated buffer (lossy), or the whole buffer if unterminated.
#[must_use]
pub fn c_text(buf: &[u8]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

pub fn memcpy(dst: &mut [u8], src: &[u8], n: usize) -> Result<*mut u8, AbiError> {
    within("memcpy", dst, 0, n)?;
    within("memcpy", src, 0, n)?;
    // SAFETY: both ranges are in bounds and belong to distinct borrows.
    let ret = unsafe { libc::memcpy(dst.as_mut_ptr().cast(), src.as_ptr().cast(), n) };
    Ok(ret.cast())
}

/// GNU `mempcpy`: returns the end of the copied range.
#[cfg(all(target_os = "linux", target_env = "gnu"))]
pub fn mempcpy(dst: &mut [u8], src: &[u8], n: usize) -> Result<*mut u8, AbiError> {
    unsafe extern "C" {
        #[link_name = "mempcpy"]
        fn native_mempcpy_sym(dst: *mut c_void, src: *const c_void, n: usize) -> *mut c_void;
    }
    within("mempcpy", dst, 0, n)?;
    within("mempcpy", src, 0, n)?;
    // SAFETY: both ranges are in bounds and belong to distinct borrows.
    let ret = unsafe { native_mempcpy_sym(dst.as_mut_ptr().cast(), src.as_ptr().cast(), n) };
    Ok(ret.cast())
}

/// `memmove(buf + dst, buf + src, n)`: overlapping move inside one buffer.
pub fn memmove_within(buf: &mut [u8], dst: usize, src: usize, n: usize) -> Result<*mut u8, AbiError> {
    within("memmove", buf, dst, n)?;
    within("memmove", buf, src, n)?;
    let base = buf.as_mut_ptr();
    // SAFETY: both ranges were checked against the same live buffer;
    // memmove permits overlap.
    let ret = unsafe { libc::memmove(base.add(dst).cast(), base.add(src).cast::<c_void>(), n) };
    Ok(ret.cast())
}

pub fn memset(dst: &mut [u8], c: c_int, n: usize) -> Result<*mut u8, AbiError> {
    within("memset", dst, 0, n)?;
    // SAFETY: the range is in bounds of a live, exclusive buffer.
    let ret = unsafe { libc::memset(dst.as_mut_ptr().cast(), c, n) };
    Ok(ret.cast())
}

pub fn strcpy(dst: &mut [u8], src: &CStr) -> Result<*mut u8, AbiError> {
    fits("strcpy", src.to_bytes_with_nul().len(), dst)?;
    // SAFETY: dst holds the whole source including its terminator.
    let ret = unsafe { libc::strcpy(dst.as_mut_ptr().cast(), src.as_ptr()) };
    Ok(ret.cast())
}

/// Writes exactly `n` bytes (padding with NUL when the source is shorter).
pub fn strncpy(dst: &mut [u8], src: &CStr, n: usize) -> Result<*mut u8, AbiError> {
    fits("strncpy", n, dst)?;
    // SAFETY: strncpy writes exactly n bytes, all within dst.
    let ret = unsafe { libc::strncpy(dst.as_mut_ptr().cast(), src.as_ptr(), n) };
    Ok(ret.cast())
}

pub fn strcat(dst: &mut [u8], src: &CStr) -> Result<*mut u8, AbiError> {
    let len = terminated_len("strcat", dst)?;
    fits("strcat", len + src.to_bytes_with_nul().len(), dst)?;
    // SAFETY: dst is terminated and has room for the concatenation.
    let ret = unsafe { libc::strcat(dst.as_mut_ptr().cast(), src.as_ptr()) };
    Ok(ret.cast())
}

/// Appends at most `n` bytes of `src`, always terminating.
pub fn strncat(dst: &mut [u8], src: &CStr, n: usize) -> Result<*mut u8, AbiError> {
    let len = terminated_len("strncat", dst)?;
    fits("strncat", len + src.to_bytes().len().min(n) + 1, dst)?;
    // SAFETY: dst is terminated and has room for the bounded concatenation.
    let ret = unsafe { libc::strncat(dst.as_mut_ptr().cast(), src.as_ptr(), n) };
    Ok(ret.cast())
}

/// Which tokenizer entry point to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tokenizer {
    Strtok,
    StrtokR,
}

/// Tokenize `text` by calling the host tokenizer until it returns NULL.
/// Each element is one call's result; the last element is `None` unless
/// the call limit was reached first.
pub fn tokenize(tokenizer: Tokenizer, text: &str, delim: &CStr) -> Result<Vec<Option<String>>, AbiError> {
    let owned = CString::new(text).map_err(|_| AbiError::InteriorNul { op: "strtok" })?;
    let mut bytes = owned.into_bytes_with_nul();
    // One token per byte plus the terminating NULL is the most a correct
    // tokenizer can produce.
    let limit = bytes.len() + 1;
    let mut calls = Vec::new();
    let mut save: *mut c_char = std::ptr::null_mut();
    let _guard = STRTOK_LOCK.lock();
    let mut input = bytes.as_mut_ptr().cast::<c_char>();
    while calls.len() < limit {
        // SAFETY: `bytes` is a live, NUL-terminated, writable buffer for the
        // whole loop; subsequent calls pass NULL and resume inside it.
        let token = unsafe {
            match tokenizer {
                Tokenizer::Strtok => libc::strtok(input, delim.as_ptr()),
                Tokenizer::StrtokR => libc::strtok_r(input, delim.as_ptr(), &mut save),
            }
        };
        input = std::ptr::null_mut();
        if token.is_null() {
            calls.push(None);
            break;
        }
        // SAFETY: a non-NULL token points at a NUL-terminated span of `bytes`.
        let text = unsafe { CStr::from_ptr(token) };
        calls.push(Some(text.to_string_lossy().into_owned()));
    }
    Ok(calls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memcpy_returns_destination_and_respects_length() {
        let mut buf = [b'#'; 16];
        let ret = memcpy(&mut buf, b"foo\0", 4).unwrap();
        assert_eq!(ret, buf.as_mut_ptr());
        assert_eq!(c_text(&buf), "foo");
        assert_eq!(buf[5], b'#');
    }

    #[test]
    fn out_of_bounds_requests_never_reach_the_host() {
        let mut buf = [0u8; 4];
        assert!(matches!(memcpy(&mut buf, b"abcdef", 6), Err(AbiError::OutOfBounds { .. })));
        assert!(matches!(memmove_within(&mut buf, 2, 0, 3), Err(AbiError::OutOfBounds { .. })));
        assert!(matches!(strcpy(&mut buf, c"abcd"), Err(AbiError::BufferTooSmall { needed: 5, .. })));
        let mut unterminated = [b'x'; 4];
        assert_eq!(strcat(&mut unterminated, c"a"), Err(AbiError::Unterminated { op: "strcat" }));
    }

    #[test]
    fn tokenizers_agree() {
        for tokenizer in [Tokenizer::Strtok, Tokenizer::StrtokR] {
            let calls = tokenize(tokenizer, " foo bar baz ", c" ").unwrap();
            assert_eq!(
                calls,
                [Some("foo".to_string()), Some("bar".into()), Some("baz".into()), None]
            );
        }
    }
}
