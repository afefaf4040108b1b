// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake transport for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Generation, Transport, TransportError, TransportOutput};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Recorded transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Start,
    Send { input: String },
    Kill,
}

#[derive(Default)]
struct FakeTransportState {
    calls: Vec<TransportCall>,
    generation: Generation,
    alive: bool,
    output_tx: Option<mpsc::Sender<TransportOutput>>,
    fail_start: Option<String>,
    fail_send: Option<String>,
    responses: VecDeque<String>,
}

/// Fake transport for testing.
///
/// Tests push engine output with [`emit`](FakeTransport::emit), or queue
/// canned responses that are emitted as each input is sent.
#[derive(Clone, Default)]
pub struct FakeTransport {
    inner: Arc<Mutex<FakeTransportState>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<TransportCall> {
        self.inner.lock().calls.clone()
    }

    /// Inputs written so far, in order
    pub fn sent(&self) -> Vec<String> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                TransportCall::Send { input } => Some(input.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of successful and failed starts
    pub fn start_count(&self) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|call| matches!(call, TransportCall::Start))
            .count()
    }

    pub fn generation(&self) -> Generation {
        self.inner.lock().generation
    }

    /// Deliver `output` as a chunk of the current generation.
    pub fn emit(&self, output: &str) {
        let generation = self.generation();
        self.emit_for(generation, output);
    }

    /// Deliver `output` tagged with an arbitrary generation.
    pub fn emit_for(&self, generation: Generation, output: &str) {
        self.deliver(TransportOutput::chunk(generation, output.as_bytes()));
    }

    /// Report the engine's output stream as closed.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        inner.alive = false;
        let generation = inner.generation;
        if let Some(tx) = &inner.output_tx {
            let _ = tx.try_send(TransportOutput::closed(generation));
        }
    }

    /// Emit `output` after the next unanswered send.
    pub fn queue_response(&self, output: impl Into<String>) {
        self.inner.lock().responses.push_back(output.into());
    }

    /// Make the next start fail with `message`.
    pub fn fail_next_start(&self, message: impl Into<String>) {
        self.inner.lock().fail_start = Some(message.into());
    }

    /// Make every send fail with `message` until cleared.
    pub fn fail_sends(&self, message: Option<String>) {
        self.inner.lock().fail_send = message;
    }

    fn deliver(&self, output: TransportOutput) {
        let tx = self.inner.lock().output_tx.clone();
        if let Some(tx) = tx {
            let _ = tx.try_send(output);
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn start(
        &self,
        output_tx: mpsc::Sender<TransportOutput>,
    ) -> Result<Generation, TransportError> {
        let mut inner = self.inner.lock();
        inner.calls.push(TransportCall::Start);

        if let Some(message) = inner.fail_start.take() {
            return Err(TransportError::Failed(message));
        }

        inner.generation = inner.generation.next();
        inner.alive = true;
        inner.output_tx = Some(output_tx);
        Ok(inner.generation)
    }

    async fn send(&self, input: &str) -> Result<(), TransportError> {
        let response = {
            let mut inner = self.inner.lock();
            inner.calls.push(TransportCall::Send {
                input: input.to_string(),
            });

            if let Some(message) = &inner.fail_send {
                return Err(TransportError::Failed(message.clone()));
            }
            if !inner.alive {
                return Err(TransportError::NotRunning);
            }
            inner.responses.pop_front()
        };

        if let Some(output) = response {
            self.emit(&output);
        }
        Ok(())
    }

    async fn kill(&self) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        inner.calls.push(TransportCall::Kill);
        inner.alive = false;
        inner.output_tx = None;
        Ok(())
    }

    async fn is_alive(&self) -> bool {
        self.inner.lock().alive
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
