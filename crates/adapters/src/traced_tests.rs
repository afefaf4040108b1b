// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::transport::{FakeTransport, TransportCall};
use serial_test::serial;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::default();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

/// Assert that captured logs contain the expected substring
fn assert_log(logs: &str, label: &str, expected: &str) {
    assert!(logs.contains(expected), "Should log {label}. Logs:\n{logs}");
}

#[test]
#[serial(tracing)]
fn traced_start_logs_entry_and_completion() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedTransport::new(FakeTransport::new());
        let (tx, _rx) = mpsc::channel(8);
        traced.start(tx).await
    });

    assert!(result.is_ok(), "start should succeed: {result:?}");
    assert_log(&logs, "span name", "transport.start");
    assert_log(&logs, "entry message", "starting");
    assert_log(&logs, "completion", "engine ready");
    assert_log(&logs, "timing", "elapsed_ms");
}

#[test]
#[serial(tracing)]
fn traced_start_logs_failure() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeTransport::new();
        fake.fail_next_start("no engine");
        let traced = TracedTransport::new(fake);
        let (tx, _rx) = mpsc::channel(8);
        traced.start(tx).await
    });

    assert!(result.is_err());
    assert_log(&logs, "failure", "start failed");
    assert_log(&logs, "error text", "no engine");
}

#[test]
#[serial(tracing)]
fn traced_send_logs_operation_and_errors() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedTransport::new(FakeTransport::new());
        traced.send("2+2;\n").await
    });

    assert!(result.is_err());
    assert_log(&logs, "send span", "transport.send");
    assert_log(&logs, "send entry", "input_len=5");
    assert_log(&logs, "send failure", "send failed");
}

#[test]
#[serial(tracing)]
fn traced_kill_logs_operation() {
    let (logs, _) = with_tracing(|| async {
        let traced = TracedTransport::new(FakeTransport::new());
        traced.kill().await
    });

    assert_log(&logs, "kill span", "transport.kill");
    assert_log(&logs, "kill completion", "killed");
}

#[tokio::test]
async fn traced_transport_delegates() {
    let fake = FakeTransport::new();
    let traced = TracedTransport::new(fake.clone());
    let (tx, _rx) = mpsc::channel(8);

    traced.start(tx).await.unwrap();
    assert!(traced.is_alive().await);
    traced.send("x;\n").await.unwrap();
    traced.kill().await.unwrap();

    assert_eq!(
        fake.calls(),
        vec![
            TransportCall::Start,
            TransportCall::Send {
                input: "x;\n".into()
            },
            TransportCall::Kill,
        ]
    );
    assert!(!traced.inner().calls().is_empty());
}
