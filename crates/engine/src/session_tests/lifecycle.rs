// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Login, logout and engine exit

use super::*;

#[tokio::test]
async fn login_starts_engine_and_goes_idle() {
    let mut ctx = setup();
    assert_eq!(ctx.session.status(), SessionStatus::Disconnected);

    ctx.session.login().await.unwrap();

    assert_eq!(ctx.session.status(), SessionStatus::Idle);
    assert!(ctx.session.is_transport_up());
    assert_eq!(ctx.transport.calls(), vec![TransportCall::Start]);
    let events = ctx.take_events();
    assert_eq!(
        TestContext::status_changes(&events),
        vec![SessionStatus::Idle]
    );
}

#[tokio::test]
async fn login_twice_is_noop() {
    let mut ctx = setup();
    ctx.session.login().await.unwrap();
    ctx.session.login().await.unwrap();

    assert_eq!(ctx.transport.start_count(), 1);
    assert_eq!(TestContext::status_changes(&ctx.take_events()).len(), 1);
}

#[tokio::test]
async fn login_failure_stays_disconnected() {
    let mut ctx = setup();
    ctx.transport.fail_next_start("maxima: not found");

    let err = ctx.session.login().await.unwrap_err();

    assert!(matches!(err, SessionError::Transport(_)));
    assert!(err.to_string().contains("maxima: not found"));
    assert_eq!(ctx.session.status(), SessionStatus::Disconnected);
    assert!(ctx.take_events().is_empty());

    ctx.session.login().await.unwrap();
    assert_eq!(ctx.session.status(), SessionStatus::Idle);
}

#[tokio::test]
async fn logout_twice_is_noop() {
    let mut ctx = logged_in().await;

    ctx.session.logout().await;
    ctx.session.logout().await;

    assert_eq!(ctx.session.status(), SessionStatus::Disconnected);
    assert_eq!(
        ctx.transport.calls(),
        vec![TransportCall::Start, TransportCall::Kill]
    );
    assert_eq!(
        TestContext::status_changes(&ctx.take_events()),
        vec![SessionStatus::Disconnected]
    );
}

#[tokio::test]
async fn logout_when_never_logged_in_is_noop() {
    let mut ctx = setup();
    ctx.session.logout().await;
    assert!(ctx.transport.calls().is_empty());
    assert!(ctx.take_events().is_empty());
}

#[tokio::test]
async fn logout_interrupts_queued_expressions() {
    let mut ctx = logged_in().await;
    let a = ctx.session.evaluate("integrate(x, x)").await;
    let b = ctx.session.evaluate("diff(x^2, x)").await;

    ctx.session.logout().await;

    assert_eq!(a.status(), ExpressionStatus::Interrupted);
    assert_eq!(b.status(), ExpressionStatus::Interrupted);
    assert_eq!(ctx.session.queue_len(), 0);
    let events = ctx.take_events();
    assert_eq!(TestContext::variable_refreshes(&events), 0);
}

#[tokio::test]
async fn login_after_logout_restarts_engine() {
    let mut ctx = logged_in().await;
    ctx.session.logout().await;
    ctx.session.login().await.unwrap();

    assert_eq!(ctx.transport.start_count(), 2);
    assert_eq!(ctx.session.status(), SessionStatus::Idle);
}

#[tokio::test]
async fn engine_exit_fails_head_and_interrupts_rest() {
    let mut ctx = logged_in().await;
    let a = ctx.session.evaluate("quit()").await;
    let b = ctx.session.evaluate("1+1").await;
    ctx.take_events();

    ctx.transport.close();
    ctx.session.drain_output().await;

    assert_eq!(a.status(), ExpressionStatus::Error);
    assert_eq!(a.lock().error_message(), Some(ENGINE_EXITED));
    assert_eq!(b.status(), ExpressionStatus::Interrupted);
    assert_eq!(ctx.session.status(), SessionStatus::Disconnected);
    assert!(!ctx.session.is_transport_up());
    assert_eq!(
        ctx.take_finished(),
        vec![
            ("expr-1".to_string(), ExpressionStatus::Error),
            ("expr-2".to_string(), ExpressionStatus::Interrupted),
        ]
    );

    // The session can log in again
    ctx.session.login().await.unwrap();
    assert_eq!(ctx.transport.start_count(), 2);
}

#[tokio::test]
async fn from_config_uses_configured_parser_and_keywords() {
    let config = SessionConfig::from_toml_str(
        "backend = \"generic\"\nprogram = \"engine\"\ntypeset = false\n",
        std::path::Path::new("test.toml"),
    )
    .unwrap();
    let transport = FakeTransport::new();
    let (event_tx, _events) = mpsc::channel(16);
    let mut session = Session::from_config(&config, transport.clone(), event_tx).unwrap();
    assert_eq!(session.backend(), &Backend::Generic);
    assert!(session.keywords().functions.is_empty());

    session.login().await.unwrap();
    transport.queue_response(
        "<RESULT><TEXT>(%o1) 10</TEXT><LATEX>10</LATEX></RESULT><PROMPT>(%i2) </PROMPT>",
    );
    let expr = session.evaluate("5+5").await;
    session.drain_output().await;

    // Typesetting is off, so the latex body is ignored
    assert_eq!(expr.lock().results(), &[EvalResult::text("10")]);
}
