// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine child process spoken to over stdin/stdout

use super::{Generation, Transport, TransportError, TransportOutput};
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;

const READ_BUFFER_SIZE: usize = 8192;

/// How to launch the engine.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    /// Output that signals the engine accepts input. Everything up to and
    /// including it is dropped. `None` means ready as soon as spawned.
    pub ready_marker: Option<String>,
    pub startup_timeout: Duration,
}

impl ProcessConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            ready_marker: None,
            startup_timeout: crate::env::startup_timeout(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn ready_marker(mut self, marker: impl Into<String>) -> Self {
        let marker = marker.into();
        self.ready_marker = (!marker.is_empty()).then_some(marker);
        self
    }

    pub fn startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }
}

struct Running {
    generation: Generation,
    child: Child,
    stdin: ChildStdin,
    tasks: Vec<JoinHandle<()>>,
}

impl Running {
    async fn shutdown(mut self) {
        for task in &self.tasks {
            task.abort();
        }
        drop(self.stdin);
        if let Err(e) = self.child.kill().await {
            tracing::debug!(generation = %self.generation, error = %e, "kill failed (may have exited)");
        }
    }
}

/// Transport over a spawned child process.
#[derive(Clone)]
pub struct ProcessTransport {
    config: Arc<ProcessConfig>,
    running: Arc<Mutex<Option<Running>>>,
    generation: Arc<AtomicU64>,
}

impl ProcessTransport {
    pub fn new(config: ProcessConfig) -> Self {
        Self {
            config: Arc::new(config),
            running: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for ProcessTransport {
    async fn start(
        &self,
        output_tx: mpsc::Sender<TransportOutput>,
    ) -> Result<Generation, TransportError> {
        let mut running = self.running.lock().await;
        if let Some(previous) = running.take() {
            previous.shutdown().await;
        }

        let generation = Generation(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.args)
            .envs(self.config.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| TransportError::Spawn {
            program: self.config.program.clone(),
            source,
        })?;
        let (Some(stdin), Some(stdout), Some(stderr)) =
            (child.stdin.take(), child.stdout.take(), child.stderr.take())
        else {
            return Err(TransportError::Failed("engine stdio was not captured".to_string()));
        };

        let (ready_tx, ready_rx) = oneshot::channel();
        let reader = tokio::spawn(pump_stdout(
            stdout,
            generation,
            output_tx,
            self.config.ready_marker.clone(),
            ready_tx,
        ));
        let errors = tokio::spawn(log_stderr(stderr, generation));
        let process = Running {
            generation,
            child,
            stdin,
            tasks: vec![reader, errors],
        };

        let timeout = self.config.startup_timeout;
        match tokio::time::timeout(timeout, ready_rx).await {
            Ok(Ok(())) => {
                *running = Some(process);
                Ok(generation)
            }
            Ok(Err(_)) => {
                process.shutdown().await;
                Err(TransportError::ExitedBeforeReady)
            }
            Err(_elapsed) => {
                process.shutdown().await;
                Err(TransportError::StartupTimeout(timeout))
            }
        }
    }

    async fn send(&self, input: &str) -> Result<(), TransportError> {
        let mut running = self.running.lock().await;
        let Some(process) = running.as_mut() else {
            return Err(TransportError::NotRunning);
        };
        process.stdin.write_all(input.as_bytes()).await?;
        process.stdin.flush().await?;
        Ok(())
    }

    async fn kill(&self) -> Result<(), TransportError> {
        let process = self.running.lock().await.take();
        if let Some(process) = process {
            process.shutdown().await;
        }
        Ok(())
    }

    async fn is_alive(&self) -> bool {
        let mut running = self.running.lock().await;
        match running.as_mut() {
            Some(process) => matches!(process.child.try_wait(), Ok(None)),
            None => false,
        }
    }
}

/// Forward stdout to `output_tx` once the ready marker has been seen.
async fn pump_stdout(
    mut stdout: ChildStdout,
    generation: Generation,
    output_tx: mpsc::Sender<TransportOutput>,
    ready_marker: Option<String>,
    ready_tx: oneshot::Sender<()>,
) {
    let mut ready_tx = Some(ready_tx);
    if ready_marker.is_none() {
        signal_ready(&mut ready_tx);
    }

    let mut startup = Vec::new();
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let n = match stdout.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(%generation, error = %e, "engine read failed");
                break;
            }
        };

        let bytes = match (ready_marker.as_deref(), ready_tx.is_some()) {
            (Some(marker), true) => {
                startup.extend_from_slice(&buf[..n]);
                let Some(pos) = find_subslice(&startup, marker.as_bytes()) else {
                    continue;
                };
                signal_ready(&mut ready_tx);
                let rest = startup.split_off(pos + marker.len());
                startup.clear();
                if rest.is_empty() {
                    continue;
                }
                rest
            }
            _ => buf[..n].to_vec(),
        };

        if output_tx
            .send(TransportOutput::chunk(generation, bytes))
            .await
            .is_err()
        {
            return;
        }
    }

    // Before ready, dropping the sender reports the early exit to `start`
    if ready_tx.is_none() {
        let _ = output_tx.send(TransportOutput::closed(generation)).await;
    }
}

fn signal_ready(ready_tx: &mut Option<oneshot::Sender<()>>) {
    if let Some(tx) = ready_tx.take() {
        let _ = tx.send(());
    }
}

async fn log_stderr(stderr: ChildStderr, generation: Generation) {
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        tracing::warn!(%generation, line = %line, "engine stderr");
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
