//! # frankencrt-abi
//!
//! Bindings from the conformance engine to the host C runtime under test.
//!
//! Every module wraps a slice of the runtime's documented C interface in safe
//! Rust functions. The wrappers validate buffer bounds and argument shapes
//! before calling, and hand back the host's raw results (including pointers
//! and `errno`) so the caller can judge them. Nothing here computes a result
//! the runtime is supposed to compute.
//!
//! | Module | Host surface |
//! |---|---|
//! | [`math_abi`] | `<math.h>` double and float entry points |
//! | [`fenv_abi`] | `fesetround` / `fegetround` |
//! | [`errno_abi`] | thread-local `errno` |
//! | [`string_abi`] | `mem*`, `str*cpy`, `str*cat`, `strtok`, `strtok_r` |
//! | [`stdio_abi`] | `snprintf`, `sscanf` |
//! | [`stdlib_abi`] | `strtod`, `strtof`, `strtol`, `putenv` |
//! | [`interlocked_abi`] | atomic read-modify-write and bit-scan primitives |

mod error;

pub mod errno_abi;
pub mod fenv_abi;
pub mod interlocked_abi;
pub mod math_abi;
pub mod stdio_abi;
pub mod stdlib_abi;
pub mod string_abi;

pub use error::AbiError;
pub use fenv_abi::HostFloatEnv;
pub use interlocked_abi::HostInterlocked;
