// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::transport::OutputKind;

#[tokio::test]
async fn fake_transport_records_lifecycle() {
    let transport = FakeTransport::new();
    let (tx, _rx) = mpsc::channel(8);

    assert!(!transport.is_alive().await);
    let generation = transport.start(tx).await.unwrap();
    assert_eq!(generation, Generation(1));
    assert!(transport.is_alive().await);

    transport.send("2+2;\n").await.unwrap();
    transport.kill().await.unwrap();
    assert!(!transport.is_alive().await);

    assert_eq!(
        transport.calls(),
        vec![
            TransportCall::Start,
            TransportCall::Send {
                input: "2+2;\n".to_string()
            },
            TransportCall::Kill,
        ]
    );
    assert_eq!(transport.sent(), vec!["2+2;\n".to_string()]);
}

#[tokio::test]
async fn fake_transport_emits_with_current_generation() {
    let transport = FakeTransport::new();
    let (tx, mut rx) = mpsc::channel(8);
    transport.start(tx.clone()).await.unwrap();
    transport.start(tx).await.unwrap();

    transport.emit("<PROMPT></PROMPT>");
    let out = rx.recv().await.unwrap();
    assert_eq!(out.generation, Generation(2));
    assert_eq!(out.kind, OutputKind::Chunk(b"<PROMPT></PROMPT>".to_vec()));
}

#[tokio::test]
async fn fake_transport_queued_response_follows_send() {
    let transport = FakeTransport::new();
    let (tx, mut rx) = mpsc::channel(8);
    transport.start(tx).await.unwrap();
    transport.queue_response("one");

    assert!(rx.try_recv().is_err());
    transport.send("a\n").await.unwrap();
    assert_eq!(
        rx.try_recv().unwrap(),
        TransportOutput::chunk(Generation(1), "one")
    );

    transport.send("b\n").await.unwrap();
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn fake_transport_fail_next_start() {
    let transport = FakeTransport::new();
    transport.fail_next_start("no engine");
    let (tx, _rx) = mpsc::channel(8);

    let err = transport.start(tx.clone()).await.unwrap_err();
    assert_eq!(err.to_string(), "transport failed: no engine");
    assert!(!transport.is_alive().await);

    transport.start(tx).await.unwrap();
    assert_eq!(transport.start_count(), 2);
}

#[tokio::test]
async fn fake_transport_send_failures() {
    let transport = FakeTransport::new();
    assert!(matches!(
        transport.send("x\n").await,
        Err(TransportError::NotRunning)
    ));

    let (tx, _rx) = mpsc::channel(8);
    transport.start(tx).await.unwrap();
    transport.fail_sends(Some("broken pipe".into()));
    assert!(transport.send("x\n").await.is_err());
    transport.fail_sends(None);
    assert!(transport.send("x\n").await.is_ok());
}

#[tokio::test]
async fn fake_transport_close_reports_closed() {
    let transport = FakeTransport::new();
    let (tx, mut rx) = mpsc::channel(8);
    transport.start(tx).await.unwrap();
    transport.close();
    assert_eq!(rx.recv().await.unwrap(), TransportOutput::closed(Generation(1)));
    assert!(!transport.is_alive().await);
}

#[tokio::test]
async fn fake_transport_kill_stops_delivery() {
    let transport = FakeTransport::new();
    let (tx, mut rx) = mpsc::channel(8);
    transport.start(tx).await.unwrap();
    transport.kill().await.unwrap();
    transport.emit("late");
    assert!(rx.try_recv().is_err());
}
