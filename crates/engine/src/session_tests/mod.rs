// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session tests

mod completion;
mod evaluate;
mod information;
mod interrupt;
mod lifecycle;
mod plots;

use super::*;
use std::path::PathBuf;
use wks_adapters::{FakeTransport, TransportCall};
use wks_core::SequentialIdGen;

type TestSession = Session<FakeTransport, SequentialIdGen>;

/// Test context holding the session, its fake engine and the event stream
struct TestContext {
    session: TestSession,
    transport: FakeTransport,
    events: mpsc::Receiver<SessionEvent>,
}

impl TestContext {
    /// Events raised since the last call
    fn take_events(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    /// `(id, status)` of every `ExpressionFinished` since the last call
    fn take_finished(&mut self) -> Vec<(String, ExpressionStatus)> {
        self.take_events()
            .into_iter()
            .filter_map(|event| match event {
                SessionEvent::ExpressionFinished { id, status } => Some((id.to_string(), status)),
                _ => None,
            })
            .collect()
    }

    fn status_changes(events: &[SessionEvent]) -> Vec<SessionStatus> {
        events
            .iter()
            .filter_map(|event| match event {
                SessionEvent::StatusChanged { status, .. } => Some(*status),
                _ => None,
            })
            .collect()
    }

    fn variable_refreshes(events: &[SessionEvent]) -> usize {
        events
            .iter()
            .filter(|event| matches!(event, SessionEvent::VariablesChanged { .. }))
            .count()
    }
}

fn maxima(plot_dir: PathBuf) -> Backend {
    Backend::Maxima {
        plot_integration: true,
        plot_dir,
    }
}

fn setup_with(backend: Backend) -> TestContext {
    let transport = FakeTransport::new();
    let (event_tx, events) = mpsc::channel(256);
    let session = Session::with_ids(
        backend,
        transport.clone(),
        event_tx,
        SequentialIdGen::new("expr"),
    );
    TestContext {
        session,
        transport,
        events,
    }
}

fn setup() -> TestContext {
    setup_with(maxima(std::env::temp_dir()))
}

/// A session that is logged in, with the login events consumed
async fn logged_in() -> TestContext {
    let mut ctx = setup();
    ctx.session.login().await.unwrap();
    ctx.take_events();
    ctx
}

/// Engine output for one text result labelled `%o{label}`
fn answer(label: u32, text: &str) -> String {
    format!(
        "<RESULT><TEXT>(%o{label}) {text}</TEXT></RESULT>\n<PROMPT>(%i{}) </PROMPT>\n",
        label + 1
    )
}

fn prompt() -> String {
    "<PROMPT>(%i1) </PROMPT>\n".to_string()
}

fn plain_results(expr: &ExpressionRef) -> Vec<String> {
    expr.lock()
        .results()
        .iter()
        .filter_map(|r| r.plain().map(str::to_string))
        .collect()
}
