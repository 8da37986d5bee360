//! Errors raised by the safe wrappers before the host is called.
//!
//! These are harness defects (an undersized buffer, an unrepresentable
//! argument), never conformance failures.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    #[error("{op}: needs {needed} bytes, buffer holds {capacity}")]
    BufferTooSmall {
        op: &'static str,
        needed: usize,
        capacity: usize,
    },
    #[error("{op}: offset {offset} + length {len} exceeds buffer of {capacity}")]
    OutOfBounds {
        op: &'static str,
        offset: usize,
        len: usize,
        capacity: usize,
    },
    #[error("{op}: destination is not NUL-terminated")]
    Unterminated { op: &'static str },
    #[error("{op}: argument contains an interior NUL byte")]
    InteriorNul { op: &'static str },
    #[error("{op}: unsupported format `{format}`")]
    Format { op: &'static str, format: String },
}
