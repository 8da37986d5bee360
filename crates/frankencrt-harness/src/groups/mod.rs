//! Registered test groups.
//!
//! A group is an independent function over the oracle. Groups build their own
//! fixtures, route every literal through the opaque layer (directly or via the
//! table runners), and leave the context label empty when they return.

use std::ffi::{CString, c_ulong};

use frankencrt_abi::AbiError;
use frankencrt_core::{FailureKind, Oracle, opaque};

use crate::error::HarnessError;

mod compiler_helpers;
mod environment;
mod intrinsics;
mod math_inspect;
mod math_log_exp;
mod math_misc;
mod math_mod;
mod math_pow;
mod math_roots;
mod math_rounding;
mod math_trig;
mod math_trig_hyp;
mod parse_numbers;
mod strings;
mod tokenize;

/// One named group of checks.
#[derive(Debug, Clone, Copy)]
pub struct Group {
    pub name: &'static str,
    pub description: &'static str,
    pub run: fn(&mut Oracle),
}

/// Every group, in run order.
pub const GROUPS: &[Group] = &[
    Group {
        name: "strings",
        description: "mem*/str* copies with sentinels, snprintf and sscanf conversions",
        run: strings::run,
    },
    Group {
        name: "tokenize",
        description: "strtok and strtok_r",
        run: tokenize::run,
    },
    Group {
        name: "parse_numbers",
        description: "strtol, strtod, strtof: consumed length, errno, range limits",
        run: parse_numbers::run,
    },
    Group {
        name: "environment",
        description: "putenv set and update",
        run: environment::run,
    },
    Group {
        name: "math_rounding",
        description: "floor/ceil/trunc/round and the rint family under every rounding mode",
        run: math_rounding::run,
    },
    Group {
        name: "math_roots",
        description: "sqrt, cbrt, hypot",
        run: math_roots::run,
    },
    Group {
        name: "math_mod",
        description: "modf, fmod, remainder, remquo",
        run: math_mod::run,
    },
    Group {
        name: "math_log_exp",
        description: "log/exp families",
        run: math_log_exp::run,
    },
    Group {
        name: "math_inspect",
        description: "ldexp, scalbn, frexp, ilogb, logb",
        run: math_inspect::run,
    },
    Group {
        name: "math_pow",
        description: "pow special cases",
        run: math_pow::run,
    },
    Group {
        name: "math_trig",
        description: "circular functions and sincos",
        run: math_trig::run,
    },
    Group {
        name: "math_trig_hyp",
        description: "hyperbolic functions",
        run: math_trig_hyp::run,
    },
    Group {
        name: "math_misc",
        description: "fma, erf, gamma, nan, nextafter, fdim/fmax/fmin, comparisons, copysign",
        run: math_misc::run,
    },
    Group {
        name: "compiler_helpers",
        description: "integer division helpers and float/int conversions",
        run: compiler_helpers::run,
    },
    Group {
        name: "intrinsics",
        description: "interlocked, bit-test and bit-scan contracts",
        run: intrinsics::run,
    },
];

/// Look up a group by name.
pub fn find(name: &str) -> Result<&'static Group, HarnessError> {
    GROUPS
        .iter()
        .find(|g| g.name == name)
        .ok_or_else(|| HarnessError::UnknownGroup { name: name.to_string() })
}

/// Resolve a filter list into groups, keeping registry order. An empty
/// filter selects every group.
pub fn select(names: &[String]) -> Result<Vec<&'static Group>, HarnessError> {
    if names.is_empty() {
        return Ok(GROUPS.iter().collect());
    }
    for name in names {
        find(name)?;
    }
    Ok(GROUPS.iter().filter(|g| names.iter().any(|n| n == g.name)).collect())
}

/// Unwrap a wrapper result. A wrapper that refuses the call counts as one
/// failed check.
#[track_caller]
pub(crate) fn host<T>(oracle: &mut Oracle, result: Result<T, AbiError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            oracle.check_with(false, FailureKind::Condition, || err.to_string());
            None
        }
    }
}

/// Opaque C string literal. A literal with an interior NUL is refused; pass
/// the result through [`host`] so the refusal counts as a failed check.
pub(crate) fn text(literal: &str) -> Result<CString, AbiError> {
    CString::new(opaque::string(literal)).map_err(|_| AbiError::InteriorNul { op: "literal" })
}

/// Opaque length operand.
pub(crate) fn len(n: usize) -> usize {
    opaque::ulong(n as c_ulong) as usize
}
