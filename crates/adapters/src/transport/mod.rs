// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Byte transports to an engine process

mod process;

pub use process::{ProcessConfig, ProcessTransport};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeTransport, TransportCall};

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from transport operations
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("engine not ready after {}ms", .0.as_millis())]
    StartupTimeout(Duration),
    #[error("engine exited before it was ready")]
    ExitedBeforeReady,
    #[error("transport is not running")]
    NotRunning,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("transport failed: {0}")]
    Failed(String),
}

/// Counter identifying one start of a transport.
///
/// Output is tagged with the generation that produced it so that output
/// of a killed engine can be told apart from its replacement's.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputKind {
    Chunk(Vec<u8>),
    /// The engine's output stream ended
    Closed,
}

/// Output delivered by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOutput {
    pub generation: Generation,
    pub kind: OutputKind,
}

impl TransportOutput {
    pub fn chunk(generation: Generation, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            generation,
            kind: OutputKind::Chunk(bytes.into()),
        }
    }

    pub fn closed(generation: Generation) -> Self {
        Self {
            generation,
            kind: OutputKind::Closed,
        }
    }
}

/// Bidirectional byte channel to one engine.
///
/// At most one engine runs per transport. Starting again replaces the
/// running engine and bumps the generation.
#[async_trait]
pub trait Transport: Clone + Send + Sync + 'static {
    /// Start the engine and wait until it is ready for input.
    ///
    /// All output after the ready signal goes to `output_tx`.
    async fn start(
        &self,
        output_tx: mpsc::Sender<TransportOutput>,
    ) -> Result<Generation, TransportError>;

    /// Write `input` to the engine verbatim.
    async fn send(&self, input: &str) -> Result<(), TransportError>;

    /// Terminate the engine immediately. Killing a stopped transport is a
    /// no-op.
    async fn kill(&self) -> Result<(), TransportError>;

    async fn is_alive(&self) -> bool;
}
