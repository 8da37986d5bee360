use frankencrt_abi::stdio_abi::{self, FORMAT_BUF_LEN, FloatConversion, IntConversion, SENTINEL};
use frankencrt_abi::{stdlib_abi, string_abi};
use frankencrt_core::equivalence::{exact, within};
use frankencrt_core::{FailureKind, Oracle, check, opaque};

use super::{host, len, text};

const HEX_BASE: u64 = 0xbaad_f00d_cafe;
const HEX_LINE: &str = "baadf00dcafe baadf00dcaff baadf00dcb00 baadf00dcb01 baadf00dcb02 \
                        baadf00dcb03 baadf00dcb04 baadf00dcb05 baadf00dcb06 baadf00dcb07";

pub(super) fn run(oracle: &mut Oracle) {
    copies(oracle);
    concatenation(oracle);
    float_formatting(oracle);
    integer_formatting(oracle);
    scanning(oracle);
}

fn sentinel_buf() -> [u8; FORMAT_BUF_LEN] {
    [SENTINEL; FORMAT_BUF_LEN]
}

fn copies(oracle: &mut Oracle) {
    let (Some(foo), Some(foobar)) = (host(oracle, text("foo")), host(oracle, text("foobar"))) else {
        return;
    };

    let mut buf = sentinel_buf();
    if let Some(ret) = host(oracle, string_abi::memcpy(&mut buf, foo.as_bytes_with_nul(), len(4))) {
        oracle.check_ptr("memcpy(buf, \"foo\", 4)", ret, buf.as_ptr());
        oracle.check_str(&string_abi::c_text(&buf), "foo");
        oracle.check_int("buf[5]", buf[5], b'#');
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    {
        let mut buf = sentinel_buf();
        if let Some(ret) = host(oracle, string_abi::mempcpy(&mut buf, foo.as_bytes_with_nul(), len(4))) {
            oracle.check_ptr("mempcpy(buf, \"foo\", 4)", ret, buf.as_ptr().wrapping_add(4));
            oracle.check_str(&string_abi::c_text(&buf), "foo");
            oracle.check_int("buf[5]", buf[5], b'#');
        }
    }

    // Overlapping moves in both directions.
    let mut buf = sentinel_buf();
    buf[..7].copy_from_slice(b"foobar\0");
    if let Some(ret) = host(oracle, string_abi::memmove_within(&mut buf, 2, 0, len(3))) {
        oracle.check_ptr("memmove(buf + 2, buf, 3)", ret, buf.as_ptr().wrapping_add(2));
        oracle.check_str(&string_abi::c_text(&buf), "fofoor");
        oracle.check_int("buf[8]", buf[8], b'#');
    }

    let mut buf = sentinel_buf();
    buf[..7].copy_from_slice(b"foobar\0");
    if let Some(ret) = host(oracle, string_abi::memmove_within(&mut buf, 0, 2, len(3))) {
        oracle.check_ptr("memmove(buf, buf + 2, 3)", ret, buf.as_ptr());
        oracle.check_str(&string_abi::c_text(&buf), "obabar");
        oracle.check_int("buf[8]", buf[8], b'#');
    }

    let mut buf = [0u8; FORMAT_BUF_LEN];
    let fill = i32::from(opaque::character(b'#' as _) as u8);
    if let Some(ret) = host(oracle, string_abi::memset(&mut buf, fill, len(FORMAT_BUF_LEN))) {
        oracle.check_ptr("memset(buf, '#', sizeof(buf))", ret, buf.as_ptr());
        oracle.check_int("buf[0]", buf[0], b'#');
        oracle.check_int("buf[sizeof(buf)-1]", buf[FORMAT_BUF_LEN - 1], b'#');
    }

    let mut buf = sentinel_buf();
    if let Some(ret) = host(oracle, string_abi::strcpy(&mut buf, &foo)) {
        oracle.check_ptr("strcpy(buf, \"foo\")", ret, buf.as_ptr());
        oracle.check_str(&string_abi::c_text(&buf), "foo");
        oracle.check_int("buf[5]", buf[5], b'#');
    }

    // Short strncpy writes no terminator.
    let mut buf = sentinel_buf();
    if let Some(ret) = host(oracle, string_abi::strncpy(&mut buf, &foobar, len(3))) {
        oracle.check_ptr("strncpy(buf, \"foobar\", 3)", ret, buf.as_ptr());
        oracle.check_int("buf[3]", buf[3], b'#');
        buf[3] = 0;
        oracle.check_str(&string_abi::c_text(&buf), "foo");
    }

    // Long strncpy pads the whole destination with NUL.
    let mut buf = sentinel_buf();
    if let Some(ret) = host(oracle, string_abi::strncpy(&mut buf, &foobar, len(FORMAT_BUF_LEN))) {
        oracle.check_ptr("strncpy(buf, \"foobar\", sizeof(buf))", ret, buf.as_ptr());
        oracle.check_str(&string_abi::c_text(&buf), "foobar");
        oracle.check_int("buf[sizeof(buf)-1]", buf[FORMAT_BUF_LEN - 1], 0u8);
    }
}

fn concatenation(oracle: &mut Oracle) {
    let cases: [(Option<usize>, &str); 3] = [(None, "foobar"), (Some(5), "foobar"), (Some(2), "fooba")];
    let Some(bar) = host(oracle, text("bar")) else {
        return;
    };
    for (limit, expected) in cases {
        let mut buf = sentinel_buf();
        buf[..4].copy_from_slice(b"foo\0");
        let result = match limit {
            None => string_abi::strcat(&mut buf, &bar),
            Some(n) => string_abi::strncat(&mut buf, &bar, len(n)),
        };
        if let Some(ret) = host(oracle, result) {
            oracle.check_ptr("retptr == buf", ret, buf.as_ptr());
            oracle.check_str(&string_abi::c_text(&buf), expected);
        }
    }
}

fn float_formatting(oracle: &mut Oracle) {
    let out = stdio_abi::snprintf_float(FloatConversion::Fixed, opaque::double(3.141_592_654));
    oracle.check_str(&out.text, "3.141593");
    oracle.check_int("buf[sizeof(buf)-1]", out.tail, b'#');

    let out = stdio_abi::snprintf_float(FloatConversion::Exponent, opaque::double(42.0));
    oracle.check_str(&out.text, "4.200000e+01");

    // Hex-float spelling differs between runtimes; the value must survive.
    let out = stdio_abi::snprintf_float(FloatConversion::HexFloat, opaque::double(42.0));
    if let Some(parsed) = host(oracle, stdlib_abi::strtod(&out.text)) {
        oracle.check_float("strtod(\"%a\" of 42.0)", parsed.value, exact(42.0));
    }

    let out = stdio_abi::snprintf_float(FloatConversion::General, opaque::double(42.0));
    oracle.check_str(&out.text, "42");
    let out = stdio_abi::snprintf_float(FloatConversion::General, opaque::double(0.000_061_035_156_250));
    oracle.check_str(&out.text, "6.10352e-05");

    for conv in FloatConversion::ALL {
        let (inf, neg_inf, nan) = if conv.is_upper() {
            ("INF", "-INF", "NAN")
        } else {
            ("inf", "-inf", "nan")
        };
        let mut scoped = oracle.scoped_context(format!("%{} ", conv.letter()));
        scoped.check_str(&stdio_abi::snprintf_float(conv, opaque::double(f64::INFINITY)).text, inf);
        scoped.check_str(&stdio_abi::snprintf_float(conv, opaque::double(f64::NEG_INFINITY)).text, neg_inf);
        scoped.check_str(&stdio_abi::snprintf_float(conv, opaque::double(f64::NAN)).text, nan);
    }
}

fn integer_formatting(oracle: &mut Oracle) {
    let values: [u64; 10] = std::array::from_fn(|i| opaque::ulonglong(HEX_BASE) + i as u64);
    oracle.check_str(&stdio_abi::snprintf_hex64(&values).text, HEX_LINE);

    let cases = [
        (IntConversion::Decimal, "+0042"),
        (IntConversion::Unsigned, "00042"),
        (IntConversion::Octal, "00052"),
        (IntConversion::Hex, "0002a"),
    ];
    let value = opaque::long(42) as i32;
    for (conv, expected) in cases {
        if let Some(out) = host(oracle, stdio_abi::snprintf_int("+0", 5, conv, value)) {
            oracle.check_str(&out.text, expected);
        }
    }
}

fn scanning(oracle: &mut Oracle) {
    if let Some((assigned, values)) = host(oracle, stdio_abi::sscanf_hex64(opaque::string(HEX_LINE))) {
        oracle.check_int("sscanf(hex line) assignments", assigned, 10);
        let expected: [u64; 10] = std::array::from_fn(|i| HEX_BASE + i as u64);
        oracle.check_with(values == expected, FailureKind::RoundTrip, || {
            format!("sscanf output failed, got {values:x?}")
        });
    }

    if let Some((assigned, single, double)) = host(oracle, stdio_abi::sscanf_float_double(opaque::string("0.8 0.8"))) {
        check!(oracle, assigned == 2);
        oracle.check_float("sscanf(\"%f\")", f64::from(single), within(0.8, 0.0001));
        oracle.check_float("sscanf(\"%lf\")", double, within(0.8, 0.0001));
    }
}
