// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background candidate lookup for completion requests.
//!
//! Lookups run as short-lived tasks and report through the session's event
//! channel, so a UI never blocks on them.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use wks_core::{CompletionId, IdentifierKind, KeywordTable, SessionEvent};
use wks_syntax::{CompletionMode, CompletionObject, LineEdit};

/// One completion in progress.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    id: CompletionId,
    object: CompletionObject,
    keywords: Arc<KeywordTable>,
    event_tx: mpsc::Sender<SessionEvent>,
}

impl CompletionRequest {
    pub(crate) fn new(
        id: CompletionId,
        object: CompletionObject,
        keywords: Arc<KeywordTable>,
        event_tx: mpsc::Sender<SessionEvent>,
    ) -> Self {
        Self {
            id,
            object,
            keywords,
            event_tx,
        }
    }

    pub fn id(&self) -> &CompletionId {
        &self.id
    }

    pub fn object(&self) -> &CompletionObject {
        &self.object
    }

    /// Look up candidates for the prefix. The list is also delivered as
    /// `CompletionsReady`.
    pub fn fetch(&self) -> JoinHandle<Vec<String>> {
        let id = self.id.clone();
        let prefix = self.object.prefix().to_string();
        let keywords = Arc::clone(&self.keywords);
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let completions = keywords.completions(&prefix);
            tracing::debug!(%id, %prefix, count = completions.len(), "completions ready");
            let event = SessionEvent::CompletionsReady {
                id,
                completions: completions.clone(),
            };
            if event_tx.send(event).await.is_err() {
                tracing::debug!("event receiver dropped");
            }
            completions
        })
    }

    /// Determine how `identifier` completes. The kind is also delivered as
    /// `IdentifierResolved`.
    pub fn resolve(&self, identifier: &str) -> JoinHandle<IdentifierKind> {
        let id = self.id.clone();
        let identifier = identifier.to_string();
        let keywords = Arc::clone(&self.keywords);
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let kind = keywords.kind_of(&identifier);
            tracing::debug!(%id, %identifier, ?kind, "identifier resolved");
            let event = SessionEvent::IdentifierResolved {
                id,
                identifier,
                kind,
            };
            if event_tx.send(event).await.is_err() {
                tracing::debug!("event receiver dropped");
            }
            kind
        })
    }

    /// Replace the identifier span with `candidate`, before its kind is known.
    pub fn preview(&self, candidate: &str) -> LineEdit {
        self.object.complete(candidate, CompletionMode::Preliminary)
    }

    /// Apply an accepted `candidate` once its kind is resolved.
    pub fn accept(&self, candidate: &str, kind: IdentifierKind) -> LineEdit {
        self.object.complete(candidate, kind.into())
    }
}

#[cfg(test)]
#[path = "completion_tests.rs"]
mod tests;
