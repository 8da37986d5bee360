use frankencrt_abi::stdlib_abi;
use frankencrt_core::{FailureKind, Oracle, opaque};

use super::host;

const VARIABLE: &str = "CRT_TEST_VAR";

pub(super) fn run(oracle: &mut Oracle) {
    for (value, action) in [("1", "set"), ("2", "updated")] {
        let entry = format!("{VARIABLE}={value}");
        let Some(status) = host(oracle, stdlib_abi::putenv(opaque::string(&entry))) else {
            continue;
        };
        oracle.check_int("putenv(buf)", status, 0);
        let found = stdlib_abi::environ_contains(&entry);
        oracle.check_with(found, FailureKind::Condition, || {
            format!("Variable {action} by putenv not found in environ")
        });
    }
}
