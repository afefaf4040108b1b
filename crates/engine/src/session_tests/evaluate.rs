// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Submission, dispatch order and result classification

use super::*;

#[tokio::test]
async fn comments_and_whitespace_finish_without_io() {
    for command in [
        "   \n\t ",
        "/* just a note */",
        "/* outer /* inner */ still outer */  ",
    ] {
        let mut ctx = logged_in().await;
        let expr = ctx.session.evaluate(command).await;

        assert_eq!(expr.status(), ExpressionStatus::Done, "{command:?}");
        assert!(expr.lock().results().is_empty());
        assert!(ctx.transport.sent().is_empty());
        assert_eq!(ctx.session.queue_len(), 0);
        assert_eq!(ctx.session.status(), SessionStatus::Idle);
    }
}

#[tokio::test]
async fn lexical_errors_finish_without_io() {
    for (command, message) in [
        ("1+1 */", "unmatched comment close"),
        ("1+1 /* forgot", "unterminated comment"),
        ("print(\"hello)", "unterminated string"),
    ] {
        let mut ctx = logged_in().await;
        let expr = ctx.session.evaluate(command).await;

        assert_eq!(expr.status(), ExpressionStatus::Error, "{command:?}");
        let error = expr.lock().error_message().unwrap_or_default().to_string();
        assert!(error.contains(message), "{error}");
        assert!(ctx.transport.sent().is_empty());
        assert_eq!(
            ctx.take_finished(),
            vec![("expr-1".to_string(), ExpressionStatus::Error)]
        );
    }
}

#[test]
fn diagnose_points_at_rejected_text() {
    let ctx = setup();

    let diagnostic = ctx.session.diagnose("x: \"abc").unwrap();
    assert!(diagnostic.starts_with("error: unterminated string"), "{diagnostic}");
    assert!(diagnostic.contains("line 1, column 4"), "{diagnostic}");
    assert!(diagnostic.ends_with("   |    ^^^^"), "{diagnostic}");

    assert_eq!(ctx.session.diagnose("x: 1"), None);
    assert_eq!(ctx.session.diagnose("/* note */"), None);
}

#[tokio::test]
async fn evaluate_while_disconnected_is_error() {
    let mut ctx = setup();
    let expr = ctx.session.evaluate("2+2").await;

    assert_eq!(expr.status(), ExpressionStatus::Error);
    assert_eq!(expr.lock().error_message(), Some(NOT_RUNNING));
    assert!(ctx.transport.calls().is_empty());
}

#[tokio::test]
async fn text_result_with_sequence_id() {
    let mut ctx = logged_in().await;
    ctx.transport.queue_response(answer(1, "10"));

    let expr = ctx.session.evaluate("2+2").await;
    assert_eq!(expr.status(), ExpressionStatus::Computing);
    assert_eq!(ctx.session.status(), SessionStatus::Computing);
    assert_eq!(ctx.transport.sent(), vec!["2+2;\n".to_string()]);

    ctx.session.drain_output().await;

    let expr = expr.snapshot();
    assert_eq!(expr.status(), ExpressionStatus::Done);
    assert_eq!(expr.results(), &[EvalResult::text("10")]);
    assert_eq!(expr.sequence_id(), Some(1));
    assert_eq!(ctx.session.status(), SessionStatus::Idle);
}

#[tokio::test]
async fn latex_result_is_rich_with_plain_fallback() {
    let mut ctx = logged_in().await;
    ctx.transport.queue_response(
        "<RESULT><TEXT>(%o1) 10</TEXT><LATEX>\\mbox{\\tt\\red(\\mathrm{\\%o1}) \\black}10</LATEX></RESULT><PROMPT>(%i2) </PROMPT>",
    );

    let expr = ctx.session.evaluate("5+5").await;
    ctx.session.drain_output().await;

    assert_eq!(expr.status(), ExpressionStatus::Done);
    assert_eq!(expr.lock().results(), &[EvalResult::rich("\\[10\\]", "10")]);
}

#[tokio::test]
async fn stray_text_without_results_is_error() {
    let mut ctx = logged_in().await;
    ctx.transport.queue_response(
        "\nsin: wrong number of arguments.\n\n -- an error.\n<PROMPT>(%i2) </PROMPT>",
    );

    let expr = ctx.session.evaluate("sin(1, 2)").await;
    ctx.session.drain_output().await;

    assert_eq!(expr.status(), ExpressionStatus::Error);
    assert_eq!(
        expr.lock().error_message(),
        Some("sin: wrong number of arguments.\n -- an error.")
    );
}

#[tokio::test]
async fn stray_text_with_result_is_warning() {
    let mut ctx = logged_in().await;
    ctx.transport.queue_response(
        "rat: replaced 0.5 by 1/2 = 0.5\n<RESULT><TEXT>(%o1) 1/2</TEXT></RESULT><PROMPT>(%i2) </PROMPT>",
    );

    let expr = ctx.session.evaluate("rat(0.5)").await;
    ctx.session.drain_output().await;

    let expr = expr.snapshot();
    assert_eq!(expr.status(), ExpressionStatus::Done);
    assert_eq!(expr.results()[0].plain(), Some("1/2"));
    assert_eq!(
        expr.results()[0].warning(),
        Some("rat: replaced 0.5 by 1/2 = 0.5")
    );
}

#[tokio::test]
async fn help_request_stray_text_is_help_body() {
    let mut ctx = logged_in().await;
    ctx.transport
        .queue_response(" -- Function: integrate (<expr>, <x>)\n<PROMPT>(%i2) </PROMPT>");

    let expr = ctx.session.evaluate("? integrate").await;
    ctx.session.drain_output().await;

    assert_eq!(expr.status(), ExpressionStatus::Done);
    assert_eq!(
        expr.lock().results(),
        &[EvalResult::Help {
            body: " -- Function: integrate (<expr>, <x>)".to_string()
        }]
    );
}

#[tokio::test]
async fn quiet_lisp_is_sent_with_prompt_form() {
    let mut ctx = logged_in().await;
    ctx.transport.queue_response("3\n<PROMPT>(%i2) </PROMPT>");

    let expr = ctx.session.evaluate(":lisp-quiet (+ 1 2)").await;
    ctx.session.drain_output().await;

    assert_eq!(ctx.transport.sent(), vec![":lisp (+ 1 2);\n".to_string()]);
    assert_eq!(expr.status(), ExpressionStatus::Done);
    assert_eq!(plain_results(&expr), vec!["3".to_string()]);
}

#[tokio::test]
async fn queue_completes_in_fifo_order() {
    let mut ctx = logged_in().await;
    for (label, text) in [(1, "one"), (2, "two"), (3, "three")] {
        ctx.transport.queue_response(answer(label, text));
    }

    let a = ctx.session.evaluate("a").await;
    let b = ctx.session.evaluate("b").await;
    let c = ctx.session.evaluate("c").await;

    // Only the head is sent before its prompt arrives
    assert_eq!(ctx.transport.sent(), vec!["a;\n".to_string()]);
    assert_eq!(b.status(), ExpressionStatus::Queued);
    assert_eq!(ctx.session.queue_len(), 3);

    ctx.session.drain_output().await;

    assert_eq!(plain_results(&a), vec!["one".to_string()]);
    assert_eq!(plain_results(&b), vec!["two".to_string()]);
    assert_eq!(plain_results(&c), vec!["three".to_string()]);
    assert_eq!(c.lock().sequence_id(), Some(3));
    assert_eq!(
        ctx.transport.sent(),
        vec!["a;\n".to_string(), "b;\n".to_string(), "c;\n".to_string()]
    );
    assert_eq!(
        ctx.take_finished(),
        vec![
            ("expr-1".to_string(), ExpressionStatus::Done),
            ("expr-2".to_string(), ExpressionStatus::Done),
            ("expr-3".to_string(), ExpressionStatus::Done),
        ]
    );
}

#[tokio::test]
async fn output_for_two_expressions_in_one_chunk_is_split_at_prompt() {
    let mut ctx = logged_in().await;
    let a = ctx.session.evaluate("a").await;
    let b = ctx.session.evaluate("b").await;

    ctx.transport
        .emit(&format!("{}{}", answer(1, "first"), answer(2, "second")));
    ctx.session.drain_output().await;

    assert_eq!(plain_results(&a), vec!["first".to_string()]);
    assert_eq!(plain_results(&b), vec!["second".to_string()]);
    assert_eq!(ctx.session.status(), SessionStatus::Idle);
}

#[tokio::test]
async fn chunks_split_inside_tags_are_reassembled() {
    let mut ctx = logged_in().await;
    let expr = ctx.session.evaluate("2+2").await;

    let output = answer(1, "4");
    let (head, tail) = output.split_at(17);
    ctx.transport.emit(head);
    ctx.session.drain_output().await;
    assert_eq!(expr.status(), ExpressionStatus::Computing);

    ctx.transport.emit(tail);
    ctx.session.drain_output().await;
    assert_eq!(expr.status(), ExpressionStatus::Done);
    assert_eq!(plain_results(&expr), vec!["4".to_string()]);
}

#[tokio::test]
async fn run_until_idle_processes_all_output() {
    let mut ctx = logged_in().await;
    ctx.transport.queue_response(answer(1, "x"));
    ctx.transport.queue_response(answer(2, "y"));

    let a = ctx.session.evaluate("x").await;
    let b = ctx.session.evaluate("y").await;
    ctx.session.run_until_idle().await;

    assert_eq!(a.status(), ExpressionStatus::Done);
    assert_eq!(b.status(), ExpressionStatus::Done);
    assert_eq!(ctx.session.queue_len(), 0);
}

#[tokio::test]
async fn variables_refresh_once_per_idle_period() {
    let mut ctx = logged_in().await;
    ctx.transport.queue_response(answer(1, "1"));
    ctx.transport.queue_response(answer(2, "2"));

    ctx.session.evaluate("a: 1").await;
    ctx.session.evaluate("b: 2").await;
    ctx.session.drain_output().await;

    let events = ctx.take_events();
    assert_eq!(TestContext::variable_refreshes(&events), 1);
    assert!(matches!(
        events.last(),
        Some(SessionEvent::VariablesChanged { .. })
    ));
    assert_eq!(
        TestContext::status_changes(&events),
        vec![SessionStatus::Computing, SessionStatus::Idle]
    );
}

#[tokio::test]
async fn internal_expressions_do_not_refresh_variables() {
    let mut ctx = logged_in().await;
    ctx.transport.queue_response(
        "<RESULT><TEXT>(%o1) [a, b]</TEXT><LATEX>[a,b]</LATEX></RESULT><PROMPT>(%i2) </PROMPT>",
    );

    let expr = ctx.session.evaluate_internal("values").await;
    ctx.session.drain_output().await;

    assert!(expr.lock().is_internal());
    // Internal results are never typeset
    assert_eq!(expr.lock().results(), &[EvalResult::text("[a, b]")]);
    assert_eq!(TestContext::variable_refreshes(&ctx.take_events()), 0);
}

#[tokio::test]
async fn send_failure_fails_head_and_advances() {
    let mut ctx = logged_in().await;
    ctx.transport.fail_sends(Some("broken pipe".to_string()));

    let expr = ctx.session.evaluate("2+2").await;

    assert_eq!(expr.status(), ExpressionStatus::Error);
    assert!(expr
        .lock()
        .error_message()
        .is_some_and(|m| m.contains("broken pipe")));
    assert_eq!(ctx.session.queue_len(), 0);
    assert_eq!(ctx.session.status(), SessionStatus::Idle);

    ctx.transport.fail_sends(None);
    ctx.transport.queue_response(answer(1, "4"));
    let next = ctx.session.evaluate("2+2").await;
    ctx.session.drain_output().await;
    assert_eq!(next.status(), ExpressionStatus::Done);
}

#[tokio::test]
async fn stray_output_while_idle_is_dropped() {
    let mut ctx = logged_in().await;
    ctx.transport.emit(&answer(1, "unsolicited"));
    ctx.session.drain_output().await;

    ctx.transport.queue_response(answer(2, "4"));
    let expr = ctx.session.evaluate("2+2").await;
    ctx.session.drain_output().await;

    assert_eq!(plain_results(&expr), vec!["4".to_string()]);
    assert_eq!(expr.lock().sequence_id(), Some(2));
}

#[tokio::test]
async fn prompt_without_results_is_done() {
    let mut ctx = logged_in().await;
    ctx.transport.queue_response(prompt());

    let expr = ctx.session.evaluate("a: 1$").await;
    ctx.session.drain_output().await;

    assert_eq!(ctx.transport.sent(), vec!["a: 1$\n".to_string()]);
    assert_eq!(expr.status(), ExpressionStatus::Done);
    assert!(expr.lock().results().is_empty());
    assert_eq!(expr.lock().sequence_id(), None);
}
