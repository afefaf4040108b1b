// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session state machine.
//!
//! A session owns one transport and a strict FIFO of expressions. Only the
//! head is ever sent to the engine; its output is parsed until a prompt
//! closes the batch, then the next entry is dispatched.
//!
//! All mutation happens through `&mut self`. Transport output lands on an
//! internal channel and is processed by [`Session::drain_output`] or
//! [`Session::run_until_idle`].

use crate::backend::Backend;
use crate::completion::CompletionRequest;
use crate::config::SessionConfig;
use crate::error::{ConfigError, SessionError};
use crate::queue::ExpressionQueue;
use std::sync::Arc;
use tokio::sync::mpsc;
use wks_adapters::{Generation, OutputKind, Transport, TransportError, TransportOutput};
use wks_core::{
    CompletionId, EvalResult, Expression, ExpressionId, ExpressionRef, ExpressionStatus, IdGen,
    KeywordTable, SessionEvent, SessionId, SessionStatus, UuidIdGen,
};
use wks_protocol::{
    prepare_information, Finalized, ParseCursor, ParseOutcome, ResultClassifier,
    StreamingResultParser, PLOT_PLACEHOLDER,
};
use wks_syntax::{Classification, CommandLexer, CompletionObject};

const OUTPUT_CHANNEL_CAPACITY: usize = 1024;

/// Error message for expressions cut off by the engine exiting
pub const ENGINE_EXITED: &str = "engine process exited";

/// Error message for evaluation while logged out
pub const NOT_RUNNING: &str = "session is not running";

pub struct Session<T, G = UuidIdGen> {
    id: SessionId,
    backend: Backend,
    lexer: CommandLexer,
    parser: StreamingResultParser,
    keywords: Arc<KeywordTable>,
    transport: T,
    ids: G,
    status: SessionStatus,
    /// False before login and after interrupt; the next dispatch restarts it
    transport_up: bool,
    generation: Option<Generation>,
    queue: ExpressionQueue,
    cursor: ParseCursor,
    awaiting_information: bool,
    /// A user expression finished since the last variable refresh
    refresh_pending: bool,
    output_tx: mpsc::Sender<TransportOutput>,
    output_rx: mpsc::Receiver<TransportOutput>,
    event_tx: mpsc::Sender<SessionEvent>,
}

impl<T: Transport> Session<T, UuidIdGen> {
    pub fn new(backend: Backend, transport: T, event_tx: mpsc::Sender<SessionEvent>) -> Self {
        Self::with_ids(backend, transport, event_tx, UuidIdGen)
    }

    /// Build a session from configuration.
    pub fn from_config(
        config: &SessionConfig,
        transport: T,
        event_tx: mpsc::Sender<SessionEvent>,
    ) -> Result<Self, ConfigError> {
        let parser = StreamingResultParser::new(
            config.vocabulary()?,
            ResultClassifier::new(config.stray_text_policy),
        )
        .with_typeset(config.typeset);
        Ok(Self::new(config.backend(), transport, event_tx)
            .with_keywords(config.keywords()?)
            .with_parser(parser))
    }
}

impl<T: Transport, G: IdGen> Session<T, G> {
    pub fn with_ids(
        backend: Backend,
        transport: T,
        event_tx: mpsc::Sender<SessionEvent>,
        ids: G,
    ) -> Self {
        let (output_tx, output_rx) = mpsc::channel(OUTPUT_CHANNEL_CAPACITY);
        Self {
            id: SessionId::new(uuid::Uuid::new_v4().to_string()),
            lexer: CommandLexer::new(backend.lexer_rules()),
            parser: StreamingResultParser::new(backend.vocabulary(), ResultClassifier::default()),
            keywords: Arc::new(backend.keywords()),
            backend,
            transport,
            ids,
            status: SessionStatus::Disconnected,
            transport_up: false,
            generation: None,
            queue: ExpressionQueue::new(),
            cursor: ParseCursor::new(),
            awaiting_information: false,
            refresh_pending: false,
            output_tx,
            output_rx,
            event_tx,
        }
    }

    pub fn with_keywords(mut self, keywords: KeywordTable) -> Self {
        self.keywords = Arc::new(keywords);
        self
    }

    pub fn with_parser(mut self, parser: StreamingResultParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    /// Expressions queued, including the one in flight.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_awaiting_information(&self) -> bool {
        self.awaiting_information
    }

    pub fn is_transport_up(&self) -> bool {
        self.transport_up
    }

    /// Start the engine and become Idle. No-op while running with a live
    /// transport.
    pub async fn login(&mut self) -> Result<(), SessionError> {
        if self.status.is_running() && self.transport_up {
            tracing::debug!(session = %self.id, "already logged in");
            return Ok(());
        }
        self.start_transport().await?;
        if self.status == SessionStatus::Disconnected {
            self.set_status(SessionStatus::Idle);
        }
        tracing::info!(session = %self.id, backend = %self.backend.kind(), "logged in");
        Ok(())
    }

    /// Stop the engine, interrupt everything queued and disconnect.
    pub async fn logout(&mut self) {
        if self.status == SessionStatus::Disconnected {
            return;
        }
        self.stop_transport().await;
        self.interrupt_queue();
        self.refresh_pending = false;
        self.set_status(SessionStatus::Disconnected);
        tracing::info!(session = %self.id, "logged out");
    }

    /// Submit a user command.
    pub async fn evaluate(&mut self, command: &str) -> ExpressionRef {
        self.submit(command, false).await
    }

    /// Submit a command on the session's own behalf. It is never typeset
    /// and never triggers a variable refresh.
    pub async fn evaluate_internal(&mut self, command: &str) -> ExpressionRef {
        self.submit(command, true).await
    }

    async fn submit(&mut self, command: &str, internal: bool) -> ExpressionRef {
        let mut flags = self.backend.flags_for(command);
        flags.internal = internal;
        let id = ExpressionId::new(self.ids.next());
        let expr = ExpressionRef::new(Expression::new(id.clone(), command, flags));

        match self.lexer.classify(command) {
            Classification::Submit => {}
            Classification::SkipAsNoOp => {
                tracing::debug!(%id, "nothing to evaluate");
                expr.lock().finish(Vec::new());
                self.emit_finished(&expr);
                return expr;
            }
            Classification::Reject(err) => {
                tracing::debug!(%id, error = %err, "rejected before submission");
                expr.lock().fail(err.to_string());
                self.emit_finished(&expr);
                return expr;
            }
        }

        if !self.status.is_running() {
            expr.lock().fail(NOT_RUNNING);
            self.emit_finished(&expr);
            return expr;
        }

        tracing::debug!(%id, queued = self.queue.len(), ?flags, "queued");
        if self.queue.push(expr.clone()) {
            self.dispatch_head().await;
        }
        expr
    }

    /// Kill the engine and cancel everything queued. No-op when the queue
    /// is empty.
    pub async fn interrupt(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        tracing::info!(
            session = %self.id,
            statuses = ?self.queue.statuses(),
            "interrupting"
        );
        self.stop_transport().await;
        self.interrupt_queue();
        self.set_status(SessionStatus::Idle);
    }

    /// Caret diagnostic for `command` when the lexer rejects it.
    pub fn diagnose(&self, command: &str) -> Option<String> {
        match self.lexer.classify(command) {
            Classification::Reject(err) => Some(err.diagnostic(command)),
            Classification::Submit | Classification::SkipAsNoOp => None,
        }
    }

    /// Answer the engine's pending information request with `text`.
    pub async fn add_information(&mut self, text: &str) -> Result<(), SessionError> {
        let head = match self.queue.head() {
            Some(head) if self.awaiting_information => head.clone(),
            _ => return Err(SessionError::NoInformationRequest),
        };
        let line = prepare_information(text);
        head.lock().add_information(line.trim_end());
        self.awaiting_information = false;

        if let Err(e) = self.transport.send(&line).await {
            tracing::warn!(id = %head.id(), error = %e, "failed to send information");
            self.queue.pop();
            if head.lock().fail(e.to_string()) {
                self.emit_finished(&head);
            }
            self.dispatch_head().await;
            return Err(e.into());
        }

        // Output after the request may already be buffered
        self.consume(&[]).await;
        Ok(())
    }

    /// Start completing `line` at `index` (end of line when `None`). The
    /// candidate lookup is already running when this returns.
    ///
    /// Must be called within a tokio runtime.
    pub fn complete(&self, line: &str, index: Option<usize>) -> CompletionRequest {
        let request = CompletionRequest::new(
            CompletionId::new(self.ids.next()),
            CompletionObject::new(line, index),
            Arc::clone(&self.keywords),
            self.event_tx.clone(),
        );
        request.fetch();
        request
    }

    /// Process output already delivered by the transport. Returns the
    /// number of deliveries handled.
    pub async fn drain_output(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(output) = self.output_rx.try_recv() {
            self.handle_output(output).await;
            handled += 1;
        }
        handled
    }

    /// Process output until the queue is empty or the engine waits for
    /// information.
    pub async fn run_until_idle(&mut self) {
        while !self.queue.is_empty() && !self.awaiting_information {
            match self.output_rx.recv().await {
                Some(output) => self.handle_output(output).await,
                None => break,
            }
        }
    }

    async fn handle_output(&mut self, output: TransportOutput) {
        if self.generation != Some(output.generation) {
            tracing::warn!(
                session = %self.id,
                generation = %output.generation,
                "discarding output from a previous engine"
            );
            return;
        }
        match output.kind {
            OutputKind::Chunk(bytes) => self.consume(&bytes).await,
            OutputKind::Closed => self.engine_exited(),
        }
    }

    async fn consume(&mut self, bytes: &[u8]) {
        let mut chunk = bytes;
        while let Some(head) = self.queue.head().cloned() {
            let flags = head.lock().flags();
            let outcome = self.parser.feed(&mut self.cursor, chunk, flags);
            chunk = &[];
            match outcome {
                ParseOutcome::Incomplete => return,
                ParseOutcome::NeedsMoreInput(prompt) => {
                    tracing::info!(id = %head.id(), %prompt, "engine requests information");
                    self.awaiting_information = true;
                    self.emit(SessionEvent::InformationRequested {
                        id: head.id(),
                        prompt,
                    });
                    return;
                }
                ParseOutcome::Finalized(finalized) => {
                    self.finish_head(&head, finalized);
                    self.dispatch_head().await;
                }
            }
        }

        if !chunk.is_empty() || !self.cursor.is_empty() {
            tracing::debug!(len = chunk.len(), "dropping output with nothing in flight");
            self.cursor = ParseCursor::new();
        }
    }

    /// Send queue heads until one is accepted by the transport, or go idle.
    async fn dispatch_head(&mut self) {
        while let Some(head) = self.queue.head().cloned() {
            if !self.transport_up {
                if let Err(e) = self.start_transport().await {
                    tracing::warn!(session = %self.id, error = %e, "engine restart failed");
                    for expr in self.queue.fail_all(&e.to_string()) {
                        self.emit_finished(&expr);
                    }
                    break;
                }
            }

            let input = self.prepare(&head);
            self.set_status(SessionStatus::Computing);
            match self.transport.send(&input).await {
                Ok(()) => {
                    tracing::debug!(id = %head.id(), input_len = input.len(), "dispatched");
                    return;
                }
                Err(e) => {
                    tracing::warn!(id = %head.id(), error = %e, "dispatch failed");
                    self.queue.pop();
                    if head.lock().fail(e.to_string()) {
                        self.emit_finished(&head);
                    }
                }
            }
        }
        self.become_idle();
    }

    /// Mark `head` Computing and build the text sent for it.
    fn prepare(&self, head: &ExpressionRef) -> String {
        let mut expr = head.lock();
        expr.set_status(ExpressionStatus::Computing);
        let plot_file = if expr.flags().plot {
            self.backend.plot_file()
        } else {
            None
        };
        let input = self.backend.internal_command(expr.command(), plot_file.as_deref());
        expr.set_pending_image(plot_file);
        input
    }

    fn finish_head(&mut self, head: &ExpressionRef, finalized: Finalized) {
        self.queue.pop();
        let cursor = std::mem::take(&mut self.cursor);
        self.cursor = cursor.carry_over();
        self.awaiting_information = false;

        let Finalized {
            status,
            results,
            error_message,
            sequence_id,
            ..
        } = finalized;

        let internal = {
            let mut expr = head.lock();
            if let Some(sequence_id) = sequence_id {
                expr.set_sequence_id(sequence_id);
            }
            if status == ExpressionStatus::Done {
                expr.finish(results);
                attach_plot_image(&mut expr);
            } else {
                expr.fail(error_message.unwrap_or_default());
            }
            expr.is_internal()
        };

        if !internal {
            self.refresh_pending = true;
        }
        tracing::info!(id = %head.id(), %status, ?sequence_id, "expression finished");
        self.emit_finished(head);
    }

    fn become_idle(&mut self) {
        self.set_status(SessionStatus::Idle);
        if std::mem::take(&mut self.refresh_pending) {
            self.emit(SessionEvent::VariablesChanged {
                session_id: self.id.clone(),
            });
        }
    }

    /// The engine's output stream closed without an interrupt or logout.
    fn engine_exited(&mut self) {
        tracing::warn!(session = %self.id, queued = self.queue.len(), "engine exited");
        self.transport_up = false;
        self.generation = None;
        self.cursor = ParseCursor::new();
        self.awaiting_information = false;

        if let Some(head) = self.queue.pop() {
            if head.lock().fail(ENGINE_EXITED) {
                self.emit_finished(&head);
            }
        }
        self.interrupt_queue();
        self.refresh_pending = false;
        self.set_status(SessionStatus::Disconnected);
    }

    async fn start_transport(&mut self) -> Result<(), TransportError> {
        // Leftovers belong to a previous generation
        while self.output_rx.try_recv().is_ok() {}
        let generation = self.transport.start(self.output_tx.clone()).await?;
        tracing::info!(session = %self.id, %generation, "engine started");
        self.generation = Some(generation);
        self.transport_up = true;
        self.cursor = ParseCursor::new();
        self.awaiting_information = false;
        Ok(())
    }

    async fn stop_transport(&mut self) {
        if self.transport_up {
            if let Err(e) = self.transport.kill().await {
                tracing::warn!(session = %self.id, error = %e, "failed to stop engine");
            }
        }
        self.transport_up = false;
        self.generation = None;
        self.cursor = ParseCursor::new();
        self.awaiting_information = false;
    }

    fn interrupt_queue(&mut self) {
        for expr in self.queue.interrupt_all() {
            self.emit_finished(&expr);
        }
    }

    fn set_status(&mut self, status: SessionStatus) {
        if self.status == status {
            return;
        }
        tracing::debug!(session = %self.id, from = %self.status, to = %status, "status");
        self.status = status;
        self.emit(SessionEvent::StatusChanged {
            session_id: self.id.clone(),
            status,
        });
    }

    fn emit_finished(&self, expr: &ExpressionRef) {
        let (id, status) = {
            let expr = expr.lock();
            (expr.id().clone(), expr.status())
        };
        self.emit(SessionEvent::ExpressionFinished { id, status });
    }

    fn emit(&self, event: SessionEvent) {
        tracing::debug!(event = %event.log_summary(), "event");
        if let Err(e) = self.event_tx.try_send(event) {
            tracing::warn!(error = %e, "session event dropped");
        }
    }
}

/// Swap a plot's placeholder result for its image once the file has
/// content. Returns true when the image was attached; otherwise the
/// pending marker stays set so callers can retry later.
pub fn attach_plot_image(expr: &mut Expression) -> bool {
    let Some(location) = expr.pending_image().cloned() else {
        return false;
    };
    let rendered = std::fs::metadata(&location).is_ok_and(|meta| meta.len() > 0);
    if !rendered {
        return false;
    }

    let image = EvalResult::Image { location };
    let placeholder = expr
        .results()
        .iter()
        .position(|result| result.plain() == Some(PLOT_PLACEHOLDER));
    match placeholder {
        Some(index) => {
            expr.replace_result(index, image);
        }
        None => expr.push_result(image),
    }
    expr.set_pending_image(None);
    true
}

#[cfg(test)]
#[path = "session_tests/mod.rs"]
mod tests;
