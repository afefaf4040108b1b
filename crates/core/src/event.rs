// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notifications a session raises for its caller.

use crate::expression::ExpressionStatus;
use crate::id::{CompletionId, ExpressionId};
use crate::keywords::IdentifierKind;
use crate::session::{SessionId, SessionStatus};
use serde::{Deserialize, Serialize};

/// Events delivered on the session's notification channel.
///
/// Serializes with `{"type": "scope:name", ...fields}` format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    #[serde(rename = "session:status")]
    StatusChanged {
        session_id: SessionId,
        status: SessionStatus,
    },

    /// An expression reached a terminal state.
    #[serde(rename = "expression:finished")]
    ExpressionFinished {
        id: ExpressionId,
        status: ExpressionStatus,
    },

    /// The engine paused the in-flight expression and waits for one more
    /// line of input (see `Session::add_information`).
    #[serde(rename = "expression:info_request")]
    InformationRequested { id: ExpressionId, prompt: String },

    /// User-visible engine state may have changed; refresh variable views.
    #[serde(rename = "session:variables")]
    VariablesChanged { session_id: SessionId },

    #[serde(rename = "completion:ready")]
    CompletionsReady {
        id: CompletionId,
        completions: Vec<String>,
    },

    #[serde(rename = "completion:resolved")]
    IdentifierResolved {
        id: CompletionId,
        identifier: String,
        kind: IdentifierKind,
    },
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::StatusChanged { .. } => "session:status",
            SessionEvent::ExpressionFinished { .. } => "expression:finished",
            SessionEvent::InformationRequested { .. } => "expression:info_request",
            SessionEvent::VariablesChanged { .. } => "session:variables",
            SessionEvent::CompletionsReady { .. } => "completion:ready",
            SessionEvent::IdentifierResolved { .. } => "completion:resolved",
        }
    }

    /// One-line description for logs.
    pub fn log_summary(&self) -> String {
        let t = self.name();
        match self {
            SessionEvent::StatusChanged { session_id, status } => {
                format!("{t} session={session_id} status={status}")
            }
            SessionEvent::ExpressionFinished { id, status } => {
                format!("{t} id={id} status={status}")
            }
            SessionEvent::InformationRequested { id, .. } => format!("{t} id={id}"),
            SessionEvent::VariablesChanged { session_id } => {
                format!("{t} session={session_id}")
            }
            SessionEvent::CompletionsReady { id, completions } => {
                format!("{t} id={id} count={}", completions.len())
            }
            SessionEvent::IdentifierResolved {
                id,
                identifier,
                kind,
            } => format!("{t} id={id} identifier={identifier} kind={kind:?}"),
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
