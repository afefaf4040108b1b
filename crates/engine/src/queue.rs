// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! FIFO of submitted expressions. The head is the one in flight.

use std::collections::VecDeque;
use wks_core::{ExpressionRef, ExpressionStatus};

#[derive(Debug, Default)]
pub struct ExpressionQueue {
    entries: VecDeque<ExpressionRef>,
}

impl ExpressionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `expr`. Returns true when it became the head.
    pub fn push(&mut self, expr: ExpressionRef) -> bool {
        self.entries.push_back(expr);
        self.entries.len() == 1
    }

    pub fn head(&self) -> Option<&ExpressionRef> {
        self.entries.front()
    }

    pub fn pop(&mut self) -> Option<ExpressionRef> {
        self.entries.pop_front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry, marking each Interrupted. Returns the entries
    /// whose status changed.
    pub fn interrupt_all(&mut self) -> Vec<ExpressionRef> {
        self.entries
            .drain(..)
            .filter(|expr| expr.lock().interrupt())
            .collect()
    }

    /// Remove every entry, finalizing each as an error with `message`.
    pub fn fail_all(&mut self, message: &str) -> Vec<ExpressionRef> {
        self.entries
            .drain(..)
            .filter(|expr| expr.lock().fail(message))
            .collect()
    }

    /// Statuses in queue order, for logging.
    pub fn statuses(&self) -> Vec<ExpressionStatus> {
        self.entries.iter().map(ExpressionRef::status).collect()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
