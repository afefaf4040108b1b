// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion requests issued through a session

use super::*;

#[tokio::test]
async fn complete_fetches_from_session_keywords() {
    let mut ctx = setup();
    let request = ctx.session.complete("y: diff(f, x) + fac", None);
    assert_eq!(request.object().prefix(), "fac");

    let event = ctx.events.recv().await.unwrap();
    assert_eq!(
        event,
        SessionEvent::CompletionsReady {
            id: request.id().clone(),
            completions: vec!["factor".to_string()],
        }
    );
}

#[tokio::test]
async fn complete_then_accept_resolved_kind() {
    let mut ctx = setup();
    let request = ctx.session.complete("x: integ", None);
    ctx.events.recv().await.unwrap();

    let kind = request.resolve("integrate").await.unwrap();
    let edit = request.accept("integrate", kind);

    assert_eq!(edit.line, "x: integrate()");
    assert_eq!(edit.cursor, 13);
    assert!(matches!(
        ctx.events.recv().await.unwrap(),
        SessionEvent::IdentifierResolved { identifier, .. } if identifier == "integrate"
    ));
}

#[tokio::test]
async fn custom_keywords_replace_backend_table() {
    let (event_tx, mut events) = mpsc::channel(8);
    let mut keywords = KeywordTable::default();
    keywords.variables.insert("my_var".to_string());
    let session = Session::new(Backend::Generic, FakeTransport::new(), event_tx)
        .with_keywords(keywords);

    session.complete("my_", None);

    assert!(matches!(
        events.recv().await.unwrap(),
        SessionEvent::CompletionsReady { completions, .. } if completions == vec!["my_var".to_string()]
    ));
}

#[tokio::test]
async fn completion_ids_are_distinct() {
    let ctx = setup();
    let a = ctx.session.complete("si", None);
    let b = ctx.session.complete("si", None);
    assert_ne!(a.id(), b.id());
}
