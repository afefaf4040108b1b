// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interrupt and engine restarts

use super::*;
use serial_test::serial;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use wks_adapters::Generation;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.logs.lock().unwrap()).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::test]
async fn interrupt_with_empty_queue_is_noop() {
    let mut ctx = logged_in().await;
    ctx.session.interrupt().await;

    assert_eq!(ctx.transport.calls(), vec![TransportCall::Start]);
    assert!(ctx.session.is_transport_up());
    assert!(ctx.take_events().is_empty());
}

#[tokio::test]
async fn interrupt_marks_every_queued_expression() {
    let mut ctx = logged_in().await;
    let exprs = [
        ctx.session.evaluate("integrate(exp(-x^2), x, minf, inf)").await,
        ctx.session.evaluate("b").await,
        ctx.session.evaluate("c").await,
    ];
    ctx.take_events();

    ctx.session.interrupt().await;

    for expr in &exprs {
        assert_eq!(expr.status(), ExpressionStatus::Interrupted);
        assert!(expr.lock().results().is_empty());
    }
    assert_eq!(ctx.session.queue_len(), 0);
    assert_eq!(ctx.session.status(), SessionStatus::Idle);
    assert!(!ctx.session.is_transport_up());
    assert_eq!(ctx.transport.calls().last(), Some(&TransportCall::Kill));

    let events = ctx.take_events();
    let interrupted = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                SessionEvent::ExpressionFinished {
                    status: ExpressionStatus::Interrupted,
                    ..
                }
            )
        })
        .count();
    assert_eq!(interrupted, 3);
    assert_eq!(TestContext::status_changes(&events), vec![SessionStatus::Idle]);
    assert_eq!(TestContext::variable_refreshes(&events), 0);
}

#[test]
#[serial(tracing)]
fn interrupt_logs_queue_statuses() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(async {
                let mut ctx = logged_in().await;
                ctx.session.evaluate("a").await;
                ctx.session.evaluate("b").await;
                ctx.session.interrupt().await;
            })
    });

    let logs = logs.contents();
    assert!(logs.contains("interrupting"), "logs:\n{logs}");
    assert!(logs.contains("statuses=[Computing, Queued]"), "logs:\n{logs}");
}

#[tokio::test]
async fn partial_output_is_discarded_on_interrupt() {
    let mut ctx = logged_in().await;
    let expr = ctx.session.evaluate("2+2").await;
    ctx.transport.emit("<RESULT><TEXT>(%o1) 4</TEXT></RESULT>");
    ctx.session.drain_output().await;

    ctx.session.interrupt().await;

    assert_eq!(expr.status(), ExpressionStatus::Interrupted);
    assert!(expr.lock().results().is_empty());
    assert_eq!(expr.lock().sequence_id(), None);
}

#[tokio::test]
async fn login_after_interrupt_restarts_engine() {
    let mut ctx = logged_in().await;
    ctx.session.evaluate("2+2").await;
    ctx.session.interrupt().await;

    ctx.session.login().await.unwrap();

    assert_eq!(ctx.transport.start_count(), 2);
    assert!(ctx.session.is_transport_up());
    assert_eq!(ctx.session.status(), SessionStatus::Idle);

    ctx.transport.queue_response(answer(1, "4"));
    let expr = ctx.session.evaluate("2+2").await;
    ctx.session.drain_output().await;
    assert_eq!(expr.status(), ExpressionStatus::Done);
}

#[tokio::test]
async fn evaluate_after_interrupt_restarts_engine() {
    let mut ctx = logged_in().await;
    ctx.session.evaluate("2+2").await;
    ctx.session.interrupt().await;

    ctx.transport.queue_response(answer(1, "4"));
    let expr = ctx.session.evaluate("2+2").await;

    assert_eq!(ctx.transport.start_count(), 2);
    assert_eq!(ctx.transport.generation(), Generation(2));
    ctx.session.drain_output().await;
    assert_eq!(expr.status(), ExpressionStatus::Done);
}

#[tokio::test]
async fn restart_failure_fails_queued_expression() {
    let mut ctx = logged_in().await;
    ctx.session.evaluate("2+2").await;
    ctx.session.interrupt().await;

    ctx.transport.fail_next_start("engine crashed on startup");
    let expr = ctx.session.evaluate("3+3").await;

    assert_eq!(expr.status(), ExpressionStatus::Error);
    assert!(expr
        .lock()
        .error_message()
        .is_some_and(|m| m.contains("engine crashed on startup")));
    assert_eq!(ctx.session.queue_len(), 0);
    assert_eq!(ctx.session.status(), SessionStatus::Idle);
}

#[tokio::test]
async fn output_from_previous_generation_is_discarded() {
    let mut ctx = logged_in().await;
    ctx.session.evaluate("long_computation()").await;
    ctx.session.interrupt().await;
    ctx.session.login().await.unwrap();

    let expr = ctx.session.evaluate("2+2").await;
    ctx.transport.emit_for(Generation(1), &answer(1, "stale"));
    ctx.session.drain_output().await;
    assert_eq!(expr.status(), ExpressionStatus::Computing);

    ctx.transport.emit(&answer(1, "4"));
    ctx.session.drain_output().await;
    assert_eq!(plain_results(&expr), vec!["4".to_string()]);
}

#[tokio::test]
async fn interrupt_while_awaiting_information_clears_request() {
    let mut ctx = logged_in().await;
    ctx.session.evaluate("integrate(x^n, x)").await;
    ctx.transport.emit(
        "<PROMPT><INFO-REQUEST><TEXT>Is n equal to -1?</TEXT></INFO-REQUEST></PROMPT>",
    );
    ctx.session.drain_output().await;
    assert!(ctx.session.is_awaiting_information());

    ctx.session.interrupt().await;

    assert!(!ctx.session.is_awaiting_information());
    assert!(matches!(
        ctx.session.add_information("no").await,
        Err(SessionError::NoInformationRequest)
    ));
}
