// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine questions answered with `add_information`

use super::*;

const QUESTION: &str =
    "<PROMPT><INFO-REQUEST><TEXT>Is n positive, negative or zero?</TEXT></INFO-REQUEST></PROMPT>\n";

#[tokio::test]
async fn information_request_suspends_until_answered() {
    let mut ctx = logged_in().await;
    ctx.transport.queue_response(QUESTION);

    let expr = ctx.session.evaluate("integrate(x^n, x)").await;
    ctx.session.drain_output().await;

    assert_eq!(expr.status(), ExpressionStatus::Computing);
    assert!(ctx.session.is_awaiting_information());
    assert_eq!(ctx.session.status(), SessionStatus::Computing);
    let events = ctx.take_events();
    assert!(events.contains(&SessionEvent::InformationRequested {
        id: expr.id(),
        prompt: "Is n positive, negative or zero?".to_string(),
    }));

    ctx.transport.queue_response(answer(1, "x^(n+1)/(n+1)"));
    ctx.session.add_information("positive").await.unwrap();
    ctx.session.drain_output().await;

    let expr = expr.snapshot();
    assert_eq!(expr.status(), ExpressionStatus::Done);
    assert_eq!(expr.results(), &[EvalResult::text("x^(n+1)/(n+1)")]);
    assert_eq!(expr.information(), &["positive;".to_string()]);
    assert_eq!(
        ctx.transport.sent(),
        vec!["integrate(x^n, x);\n".to_string(), "positive;\n".to_string()]
    );
}

#[tokio::test]
async fn run_until_idle_returns_on_information_request() {
    let mut ctx = logged_in().await;
    ctx.transport.queue_response(QUESTION);

    let expr = ctx.session.evaluate("integrate(x^n, x)").await;
    ctx.session.run_until_idle().await;

    assert!(ctx.session.is_awaiting_information());
    assert_eq!(expr.status(), ExpressionStatus::Computing);

    ctx.transport.queue_response(answer(1, "log(x)"));
    ctx.session.add_information("zero").await.unwrap();
    ctx.session.run_until_idle().await;
    assert_eq!(expr.status(), ExpressionStatus::Done);
}

#[tokio::test]
async fn buffered_output_after_request_is_parsed_on_answer() {
    let mut ctx = logged_in().await;
    let expr = ctx.session.evaluate("integrate(x^n, x)").await;
    ctx.transport
        .emit(&format!("{QUESTION}{}", answer(1, "x^(n+1)/(n+1)")));
    ctx.session.drain_output().await;
    assert_eq!(expr.status(), ExpressionStatus::Computing);

    ctx.session.add_information("positive;").await.unwrap();

    assert_eq!(expr.status(), ExpressionStatus::Done);
    assert_eq!(ctx.transport.sent().last().map(String::as_str), Some("positive;\n"));
}

#[tokio::test]
async fn several_questions_for_one_expression() {
    let mut ctx = logged_in().await;
    ctx.transport.queue_response(QUESTION);
    let expr = ctx.session.evaluate("integrate(x^n*y^m, x)").await;
    ctx.session.drain_output().await;

    ctx.transport.queue_response(QUESTION);
    ctx.session.add_information("positive").await.unwrap();
    ctx.session.drain_output().await;
    assert!(ctx.session.is_awaiting_information());

    ctx.transport.queue_response(answer(1, "done"));
    ctx.session.add_information("negative").await.unwrap();
    ctx.session.drain_output().await;

    assert_eq!(expr.status(), ExpressionStatus::Done);
    assert_eq!(
        expr.lock().information(),
        &["positive;".to_string(), "negative;".to_string()]
    );
}

#[tokio::test]
async fn add_information_without_request_is_error() {
    let mut ctx = logged_in().await;
    assert!(matches!(
        ctx.session.add_information("yes").await,
        Err(SessionError::NoInformationRequest)
    ));

    ctx.session.evaluate("2+2").await;
    assert!(matches!(
        ctx.session.add_information("yes").await,
        Err(SessionError::NoInformationRequest)
    ));
    assert_eq!(ctx.transport.sent(), vec!["2+2;\n".to_string()]);
}

#[tokio::test]
async fn information_send_failure_fails_expression() {
    let mut ctx = logged_in().await;
    ctx.transport.queue_response(QUESTION);
    let expr = ctx.session.evaluate("integrate(x^n, x)").await;
    ctx.session.drain_output().await;

    ctx.transport.fail_sends(Some("broken pipe".to_string()));
    let result = ctx.session.add_information("positive").await;

    assert!(matches!(result, Err(SessionError::Transport(_))));
    assert_eq!(expr.status(), ExpressionStatus::Error);
    assert_eq!(ctx.session.queue_len(), 0);
    assert!(!ctx.session.is_awaiting_information());
}
