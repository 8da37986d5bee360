//! Access to the host's thread-local `errno`.

use std::ffi::c_int;

pub use libc::{EINVAL, ERANGE};

#[cfg(any(target_os = "linux", target_os = "emscripten", target_os = "hurd"))]
fn location() -> *mut c_int {
    // SAFETY: returns the calling thread's errno slot; always valid.
    unsafe { libc::__errno_location() }
}

#[cfg(target_os = "android")]
fn location() -> *mut c_int {
    // SAFETY: returns the calling thread's errno slot; always valid.
    unsafe { libc::__errno() }
}

#[cfg(any(target_vendor = "apple", target_os = "freebsd", target_os = "dragonfly"))]
fn location() -> *mut c_int {
    // SAFETY: returns the calling thread's errno slot; always valid.
    unsafe { libc::__error() }
}

#[must_use]
pub fn errno() -> c_int {
    // SAFETY: thread-local slot, valid for reads for the thread's lifetime.
    unsafe { *location() }
}

pub fn set_errno(value: c_int) {
    // SAFETY: thread-local slot, valid for writes for the thread's lifetime.
    unsafe { *location() = value };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errno_round_trips_on_this_thread() {
        set_errno(ERANGE);
        assert_eq!(errno(), ERANGE);
        set_errno(0);
        assert_eq!(errno(), 0);
    }
}
