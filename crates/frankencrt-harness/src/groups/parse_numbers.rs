use frankencrt_abi::errno_abi::{self, EINVAL, ERANGE};
use frankencrt_abi::stdlib_abi::{self, Parsed};
use frankencrt_abi::AbiError;
use frankencrt_core::equivalence::{exact, signed, widen};
use frankencrt_core::{Oracle, opaque};

use super::host;

/// Input, parsed value, consumed bytes.
const PREFIXES: &[(&str, f64, usize)] = &[("1.e5z", 1.0e5, 4), ("0x125p-1z", 146.5, 8)];

/// Input, `strtod` result (errno 0), `strtof` result (ERANGE).
const SINGLE_RANGE: &[(&str, f64, f64)] = &[
    ("1.e40", 1.0e40, f64::INFINITY),
    ("-1.e40", -1.0e40, f64::NEG_INFINITY),
    ("1.e-60", 1.0e-60, 0.0),
    ("-1.e-60", -1.0e-60, -0.0),
];

/// Input, `strtod` result with ERANGE.
const DOUBLE_RANGE: &[(&str, f64)] = &[
    ("1.e310", f64::INFINITY),
    ("-1.e310", f64::NEG_INFINITY),
    ("1.e-400", 0.0),
    ("-1.e-400", -0.0),
];

pub(super) fn run(oracle: &mut Oracle) {
    invalid_base(oracle);
    prefixes(oracle, "strtod", |s| stdlib_abi::strtod(s));
    prefixes(oracle, "strtof", |s| widened(stdlib_abi::strtof(s)));
    single_range(oracle);
    double_range(oracle);
}

fn widened(parsed: Result<Parsed<f32>, AbiError>) -> Result<Parsed<f64>, AbiError> {
    parsed.map(|p| Parsed {
        value: widen(p.value),
        consumed: p.consumed,
        errno: p.errno,
    })
}

fn invalid_base(oracle: &mut Oracle) {
    let base = opaque::long(100) as i32;
    if let Some(parsed) = host(oracle, stdlib_abi::strtol(opaque::string("foo"), base)) {
        oracle.check_int("strtol(\"foo\", NULL, 100)", parsed.value, 0);
        oracle.check_int("errno", parsed.errno, EINVAL);
    }
    errno_abi::set_errno(0);
}

fn prefixes(oracle: &mut Oracle, name: &str, parse: impl Fn(&str) -> Result<Parsed<f64>, AbiError>) {
    for &(input, value, consumed) in PREFIXES {
        let Some(parsed) = host(oracle, parse(opaque::string(input))) else {
            continue;
        };
        oracle.check_float(&format!("{name}(\"{input}\", &end)"), parsed.value, exact(value));
        oracle.check_int("errno", parsed.errno, 0);
        oracle.check_int("end - curstr", parsed.consumed, consumed);
    }
}

fn single_range(oracle: &mut Oracle) {
    for &(input, double, narrowed) in SINGLE_RANGE {
        if let Some(parsed) = host(oracle, stdlib_abi::strtod(opaque::string(input))) {
            oracle.check_float(&format!("strtod(\"{input}\", NULL)"), parsed.value, signed(double));
            oracle.check_int("errno", parsed.errno, 0);
        }
        if let Some(parsed) = host(oracle, widened(stdlib_abi::strtof(opaque::string(input)))) {
            oracle.check_float(&format!("strtof(\"{input}\", NULL)"), parsed.value, signed(narrowed));
            oracle.check_int("errno", parsed.errno, ERANGE);
        }
    }
}

fn double_range(oracle: &mut Oracle) {
    for &(input, value) in DOUBLE_RANGE {
        if let Some(parsed) = host(oracle, stdlib_abi::strtod(opaque::string(input))) {
            oracle.check_float(&format!("strtod(\"{input}\", NULL)"), parsed.value, signed(value));
            oracle.check_int("errno", parsed.errno, ERANGE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_range_inputs_fit_a_double() {
        for &(input, double, narrowed) in SINGLE_RANGE {
            assert!(double.is_finite() && double != 0.0, "{input}");
            assert!(narrowed.is_infinite() || narrowed == 0.0, "{input}");
            assert_eq!(double.is_sign_negative(), narrowed.is_sign_negative(), "{input}");
        }
    }
}
