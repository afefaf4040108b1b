//! Information request specs
//!
//! While the engine waits for information, the next input line answers it.

use crate::prelude::*;

#[test]
fn next_line_answers_the_question() {
    cli()
        .generic_engine()
        .stdin(&["ask sign(x)", "positive", "b"])
        .passes()
        .stdout_eq("? Is x positive, negative or zero?\npositive\nb\n");
}

#[test]
fn json_prompt_is_a_typed_record() {
    cli()
        .generic_engine()
        .args(&["-o", "json"])
        .stdin(&["ask", "zero"])
        .passes()
        .stdout_has(r#"{"type":"expression:info_request","prompt":"Is x positive, negative or zero?"}"#)
        .stdout_has(r#""plain":"zero""#);
}

#[test]
fn input_ending_mid_question_interrupts() {
    cli()
        .generic_engine()
        .stdin(&["ask"])
        .passes()
        .stdout_eq("? Is x positive, negative or zero?\ninterrupted\n");
}
