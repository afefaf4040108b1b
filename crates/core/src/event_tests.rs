// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn serializes_with_type_tag() {
    let event = SessionEvent::InformationRequested {
        id: ExpressionId::new("expr-3"),
        prompt: "Is n equal to -1?".to_string(),
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "expression:info_request");
    assert_eq!(json["id"], "expr-3");
}

#[test]
fn round_trips_through_json() {
    let event = SessionEvent::ExpressionFinished {
        id: ExpressionId::new("expr-1"),
        status: ExpressionStatus::Error,
    };
    let json = serde_json::to_string(&event).unwrap();
    let back: SessionEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}

#[yare::parameterized(
    status = {
        SessionEvent::StatusChanged { session_id: SessionId::new("s1"), status: SessionStatus::Idle },
        "session:status session=s1 status=idle"
    },
    finished = {
        SessionEvent::ExpressionFinished { id: ExpressionId::new("e1"), status: ExpressionStatus::Done },
        "expression:finished id=e1 status=done"
    },
    completions = {
        SessionEvent::CompletionsReady { id: CompletionId::new("c1"), completions: vec!["sin".into(), "sinh".into()] },
        "completion:ready id=c1 count=2"
    },
)]
fn log_summary(event: SessionEvent, expected: &str) {
    assert_eq!(event.log_summary(), expected);
}
