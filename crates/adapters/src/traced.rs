// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced transport wrapper for consistent observability

use crate::transport::{Generation, Transport, TransportError, TransportOutput};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::Instrument;

/// Wrapper that adds tracing to any Transport
#[derive(Clone)]
pub struct TracedTransport<T> {
    inner: T,
}

impl<T> TracedTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Transport> Transport for TracedTransport<T> {
    async fn start(
        &self,
        output_tx: mpsc::Sender<TransportOutput>,
    ) -> Result<Generation, TransportError> {
        async {
            tracing::info!("starting");
            let start = std::time::Instant::now();
            let result = self.inner.start(output_tx).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(generation) => tracing::info!(%generation, elapsed_ms, "engine ready"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "start failed"),
            }
            result
        }
        .instrument(tracing::info_span!("transport.start"))
        .await
    }

    async fn send(&self, input: &str) -> Result<(), TransportError> {
        tracing::info_span!("transport.send")
            .in_scope(|| tracing::debug!(input_len = input.len(), "sending"));
        let result = self.inner.send(input).await;
        if let Err(ref e) = result {
            tracing::error!(error = %e, "send failed");
        }
        result
    }

    async fn kill(&self) -> Result<(), TransportError> {
        let result = self.inner.kill().await;
        tracing::info_span!("transport.kill").in_scope(|| match &result {
            Ok(()) => tracing::info!("killed"),
            Err(e) => tracing::warn!(error = %e, "kill failed"),
        });
        result
    }

    async fn is_alive(&self) -> bool {
        let alive = self.inner.is_alive().await;
        tracing::trace!(alive, "checked");
        alive
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
