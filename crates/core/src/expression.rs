// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Expression record and its status state machine.
//!
//! An expression is created Queued, becomes Computing when it is the
//! head of a session queue and has been dispatched, and reaches exactly one
//! terminal state (Done, Error or Interrupted). Once terminal, further
//! transitions are ignored.

use crate::id::ExpressionId;
use crate::result::EvalResult;
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Status of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionStatus {
    /// Accepted, waiting behind other expressions
    Queued,
    /// Sent to the engine, output not finalized yet
    Computing,
    Done,
    Error,
    /// Cancelled by interrupt or logout
    Interrupted,
}

impl ExpressionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExpressionStatus::Done | ExpressionStatus::Error | ExpressionStatus::Interrupted
        )
    }
}

impl fmt::Display for ExpressionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionStatus::Queued => write!(f, "queued"),
            ExpressionStatus::Computing => write!(f, "computing"),
            ExpressionStatus::Done => write!(f, "done"),
            ExpressionStatus::Error => write!(f, "error"),
            ExpressionStatus::Interrupted => write!(f, "interrupted"),
        }
    }
}

/// Request properties decided when the expression is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionFlags {
    /// Issued by the session itself; never typeset, never triggers a
    /// variable refresh.
    pub internal: bool,
    /// Documentation lookup; stray output is the help body.
    pub help_request: bool,
    /// Command bypasses result typesetting; stray output is the result.
    pub raw_passthrough: bool,
    /// Command renders a plot into a file.
    pub plot: bool,
}

/// One submitted command and its eventual outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    id: ExpressionId,
    command: String,
    status: ExpressionStatus,
    results: Vec<EvalResult>,
    error_message: Option<String>,
    flags: ExpressionFlags,
    sequence_id: Option<u32>,
    pending_image: Option<PathBuf>,
    information: Vec<String>,
}

impl Expression {
    pub fn new(id: ExpressionId, command: impl Into<String>, flags: ExpressionFlags) -> Self {
        Self {
            id,
            command: command.into(),
            status: ExpressionStatus::Queued,
            results: Vec::new(),
            error_message: None,
            flags,
            sequence_id: None,
            pending_image: None,
            information: Vec::new(),
        }
    }

    pub fn id(&self) -> &ExpressionId {
        &self.id
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn status(&self) -> ExpressionStatus {
        self.status
    }

    pub fn results(&self) -> &[EvalResult] {
        &self.results
    }

    /// First result, if any.
    pub fn result(&self) -> Option<&EvalResult> {
        self.results.first()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn flags(&self) -> ExpressionFlags {
        self.flags
    }

    pub fn is_internal(&self) -> bool {
        self.flags.internal
    }

    /// Engine-assigned output number, if the engine labelled a result.
    pub fn sequence_id(&self) -> Option<u32> {
        self.sequence_id
    }

    pub fn pending_image(&self) -> Option<&PathBuf> {
        self.pending_image.as_ref()
    }

    /// Lines supplied in answer to information requests, in order.
    pub fn information(&self) -> &[String] {
        &self.information
    }

    /// Plain-text fragments of all results joined by line breaks.
    pub fn plain_text(&self) -> String {
        self.results
            .iter()
            .filter_map(EvalResult::plain)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Move to `status`. Returns false (and changes nothing) when the
    /// expression already reached a terminal state.
    pub fn set_status(&mut self, status: ExpressionStatus) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = status;
        true
    }

    /// Assign the engine sequence id. The first assignment wins.
    pub fn set_sequence_id(&mut self, sequence_id: u32) -> bool {
        if self.sequence_id.is_some() {
            return false;
        }
        self.sequence_id = Some(sequence_id);
        true
    }

    pub fn set_pending_image(&mut self, location: Option<PathBuf>) {
        self.pending_image = location;
    }

    pub fn add_information(&mut self, line: impl Into<String>) {
        self.information.push(line.into());
    }

    /// Finalize as Done with `results`.
    pub fn finish(&mut self, results: Vec<EvalResult>) -> bool {
        if !self.set_status(ExpressionStatus::Done) {
            return false;
        }
        self.results = results;
        true
    }

    /// Finalize as Error with a display message.
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if !self.set_status(ExpressionStatus::Error) {
            return false;
        }
        self.error_message = Some(message.into());
        true
    }

    /// Finalize as Interrupted, dropping anything gathered so far.
    pub fn interrupt(&mut self) -> bool {
        if !self.set_status(ExpressionStatus::Interrupted) {
            return false;
        }
        self.results.clear();
        self.pending_image = None;
        true
    }

    pub fn push_result(&mut self, result: EvalResult) {
        self.results.push(result);
    }

    /// Replace a result in place (used when a pending plot image lands).
    pub fn replace_result(&mut self, index: usize, result: EvalResult) -> bool {
        match self.results.get_mut(index) {
            Some(slot) => {
                *slot = result;
                true
            }
            None => false,
        }
    }
}

/// Shared handle to an expression.
///
/// The caller keeps the handle for as long as it wants the outcome; the
/// session holds a clone only while the expression is queued.
#[derive(Debug, Clone)]
pub struct ExpressionRef(Arc<Mutex<Expression>>);

impl ExpressionRef {
    pub fn new(expression: Expression) -> Self {
        Self(Arc::new(Mutex::new(expression)))
    }

    pub fn lock(&self) -> MutexGuard<'_, Expression> {
        self.0.lock()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> Expression {
        self.0.lock().clone()
    }

    pub fn id(&self) -> ExpressionId {
        self.0.lock().id.clone()
    }

    pub fn status(&self) -> ExpressionStatus {
        self.0.lock().status
    }

    pub fn ptr_eq(&self, other: &ExpressionRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
#[path = "expression_tests.rs"]
mod tests;
