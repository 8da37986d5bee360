use frankencrt_abi::string_abi::{self, Tokenizer};
use frankencrt_core::Oracle;

use super::{host, text};

const EXPECTED: [Option<&str>; 4] = [Some("foo"), Some("bar"), Some("baz"), None];

pub(super) fn run(oracle: &mut Oracle) {
    for (tokenizer, name) in [(Tokenizer::Strtok, "strtok"), (Tokenizer::StrtokR, "strtok_r")] {
        let Some(delim) = host(oracle, text(" ")) else {
            continue;
        };
        let Some(calls) = host(oracle, string_abi::tokenize(tokenizer, " foo bar baz ", &delim)) else {
            continue;
        };
        for (i, expected) in EXPECTED.iter().enumerate() {
            let got = calls.get(i).cloned().flatten();
            let expr = if i == 0 {
                format!("{name}(buf, \" \")")
            } else {
                format!("{name}(NULL, \" \")")
            };
            match expected {
                Some(token) => {
                    let got = got.unwrap_or_else(|| "(null)".to_string());
                    oracle.check_str(&got, token);
                }
                None => {
                    oracle.check(got.is_none(), &format!("{expr} == NULL"));
                }
            }
        }
    }
}
