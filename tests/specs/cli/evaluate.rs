//! Evaluation specs
//!
//! One command per input line; one report per finished command.

use crate::prelude::*;

#[test]
fn results_print_in_submission_order() {
    cli()
        .generic_engine()
        .stdin(&["2+2", "x: 3", "diff(x^2, x)"])
        .passes()
        .stdout_eq("2+2\nx: 3\ndiff(x^2, x)\n");
}

#[test]
fn blank_lines_are_skipped() {
    cli()
        .generic_engine()
        .stdin(&["", "a", "   ", "b"])
        .passes()
        .stdout_eq("a\nb\n");
}

#[test]
fn engine_error_reports_and_exits_one() {
    cli()
        .generic_engine()
        .stdin(&["a", "oops x", "b"])
        .fails()
        .code(1)
        .stdout_eq("a\nerror: incorrect syntax: oops x is not a prefix operator\nb\n");
}

#[test]
fn warning_stays_attached_to_result() {
    cli()
        .generic_engine()
        .stdin(&["warn 1/2"])
        .passes()
        .stdout_eq("1/2\nwarning: rat: replaced 0.5 by 1/2\n");
}

#[test]
fn comment_only_line_prints_nothing() {
    cli()
        .maxima_engine()
        .stdin(&["/* just a note */", "a"])
        .passes()
        .stdout_eq("a\n");
}

#[test]
fn unterminated_comment_is_rejected() {
    cli()
        .maxima_engine()
        .stdin(&["a /* open", "b"])
        .fails()
        .code(1)
        .stdout_eq(
            "error: unterminated comment starting at position 2\n  --> line 1, column 3\n   |\n  1 | a /* open\n   |   ^^^^^^^\nb\n",
        );
}

#[test]
fn generic_backend_has_no_comments() {
    cli()
        .generic_engine()
        .stdin(&["a /* open"])
        .passes()
        .stdout_eq("a /* open\n");
}

#[test]
fn json_output_has_one_record_per_line() {
    let run = cli()
        .generic_engine()
        .args(&["-o", "json"])
        .stdin(&["a", "oops"])
        .fails()
        .code(1);

    let stdout = run.stdout();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "stdout: {stdout}");
    assert!(lines[0].contains(r#""command":"a""#), "{}", lines[0]);
    assert!(lines[0].contains(r#""status":"done""#), "{}", lines[0]);
    assert!(lines[0].contains(r#""sequence_id":1"#), "{}", lines[0]);
    assert!(lines[0].contains(r#""results":[{"kind":"text","plain":"a"}]"#), "{}", lines[0]);
    assert!(lines[1].contains(r#""status":"error""#), "{}", lines[1]);
    assert!(lines[1].contains(r#""error":"incorrect syntax: oops is not a prefix operator""#), "{}", lines[1]);
}
