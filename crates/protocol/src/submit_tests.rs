// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    adds_terminator       = { "2+2",                "2+2;\n" },
    keeps_semicolon       = { "2+2;",               "2+2;\n" },
    keeps_dollar          = { "a: 5$",              "a: 5$\n" },
    flattens_lines        = { "f(x) :=\nx^2",       "f(x) := x^2;\n" },
    flattens_crlf         = { "a;\r\nb",            "a; b;\n" },
    trailing_whitespace   = { "2+2;  \n",           "2+2;\n" },
    multiple_statements   = { "1+1;\n2+2",          "1+1; 2+2;\n" },
)]
fn prepares_commands(command: &str, expected: &str) {
    assert_eq!(prepare_command(command), expected);
}

#[yare::parameterized(
    adds_semicolon  = { "0",   "0;\n" },
    keeps_semicolon = { "y;",  "y;\n" },
    dollar_is_data  = { "n$",  "n$;\n" },
)]
fn prepares_information(text: &str, expected: &str) {
    assert_eq!(prepare_information(text), expected);
}

#[test]
fn prepared_command_is_a_single_line() {
    let line = prepare_command("a\nb\r\nc\n\n");
    assert_eq!(line.matches('\n').count(), 1);
    assert!(line.ends_with(";\n"));
}
