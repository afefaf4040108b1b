// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn request(line: &str, index: Option<usize>) -> (CompletionRequest, mpsc::Receiver<SessionEvent>) {
    let (event_tx, event_rx) = mpsc::channel(8);
    let request = CompletionRequest::new(
        CompletionId::new("completion-1"),
        CompletionObject::new(line, index),
        Arc::new(KeywordTable::maxima()),
        event_tx,
    );
    (request, event_rx)
}

#[tokio::test]
async fn fetch_reports_candidates() {
    let (request, mut events) = request("x: int", None);
    assert_eq!(request.object().prefix(), "int");

    let completions = request.fetch().await.unwrap();
    assert_eq!(completions, vec!["integrate".to_string()]);
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::CompletionsReady {
            id: CompletionId::new("completion-1"),
            completions,
        }
    );
}

#[tokio::test]
async fn fetch_without_identifier_is_empty() {
    let (request, mut events) = request("2 + ", None);
    assert!(request.fetch().await.unwrap().is_empty());
    assert!(matches!(
        events.recv().await.unwrap(),
        SessionEvent::CompletionsReady { completions, .. } if completions.is_empty()
    ));
}

#[tokio::test]
async fn resolve_reports_kind() {
    let (request, mut events) = request("qu", None);
    let kind = request.resolve("quit").await.unwrap();
    assert_eq!(kind, IdentifierKind::FunctionWithoutArguments);
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::IdentifierResolved {
            id: CompletionId::new("completion-1"),
            identifier: "quit".to_string(),
            kind,
        }
    );
}

#[tokio::test]
async fn fetch_survives_dropped_receiver() {
    let (request, events) = request("si", None);
    drop(events);
    assert_eq!(request.fetch().await.unwrap(), vec!["sin", "sinh"]);
}

#[test]
fn accept_applies_resolved_mode() {
    let (request, _events) = request("x: integ", None);
    let edit = request.accept("integrate", IdentifierKind::FunctionWithArguments);
    assert_eq!(edit.line, "x: integrate()");
    assert_eq!(edit.cursor, 13);

    let edit = request.accept("integrate", IdentifierKind::Unknown);
    assert_eq!(edit.line, "x: integrate");
    assert_eq!(edit.cursor, 12);
}

#[test]
fn preview_replaces_span_only() {
    let (request, _events) = request("fo(x)", Some(2));
    let edit = request.preview("for");
    assert_eq!(edit.line, "for(x)");
    assert_eq!(edit.cursor, 3);
}
