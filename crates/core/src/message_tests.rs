// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    empty            = { "",                         "" },
    only_whitespace  = { " \n\t\n ",                 "" },
    single_line      = { "  incorrect syntax  ",     "incorrect syntax" },
    keeps_line_break = { "a\nb",                     "a\nb" },
    blank_run        = { "a\n\n\n\nb",               "a\nb" },
    whitespace_lines = { "a\n   \n\t\nb",            "a\nb" },
    crlf             = { "a\r\n\r\nb\r\n",           "a\nb" },
    indented_content = { "\n  first\n    second\n",  "first\n    second" },
)]
fn normalizes(input: &str, expected: &str) {
    assert_eq!(normalize_message(input), expected);
}

#[test]
fn normalizing_twice_is_stable() {
    let once = normalize_message("x\n\n\ny\n");
    assert_eq!(normalize_message(&once), once);
}
