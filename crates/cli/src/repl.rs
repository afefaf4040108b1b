// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line-oriented driver: one command per input line.
//!
//! While the engine waits for information, the next input line answers it
//! instead of being evaluated.

use crate::output::{format_expression, format_prompt, OutputFormat};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use wks_adapters::Transport;
use wks_core::{ExpressionRef, ExpressionStatus, IdGen, SessionEvent};
use wks_engine::Session;

/// Counts over one run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub evaluated: usize,
    pub errors: usize,
}

pub struct Repl<'a, T, G, W> {
    session: &'a mut Session<T, G>,
    events: mpsc::Receiver<SessionEvent>,
    out: W,
    format: OutputFormat,
    summary: Summary,
}

impl<'a, T: Transport, G: IdGen, W: Write> Repl<'a, T, G, W> {
    pub fn new(
        session: &'a mut Session<T, G>,
        events: mpsc::Receiver<SessionEvent>,
        out: W,
        format: OutputFormat,
    ) -> Self {
        Self {
            session,
            events,
            out,
            format,
            summary: Summary::default(),
        }
    }

    /// Evaluate every line of `input`, then interrupt anything left.
    pub async fn run<R: AsyncBufRead + Unpin>(mut self, input: R) -> anyhow::Result<Summary> {
        let mut lines = input.lines();
        let mut current: Option<ExpressionRef> = None;

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            if self.session.is_awaiting_information() {
                self.session.add_information(&line).await?;
            } else {
                current = Some(self.session.evaluate(&line).await);
                self.summary.evaluated += 1;
            }
            self.session.run_until_idle().await;

            let prompt = self.take_prompt();
            if self.session.is_awaiting_information() {
                if let Some(prompt) = prompt {
                    writeln!(self.out, "{}", format_prompt(&prompt, self.format)?)?;
                }
                continue;
            }
            if let Some(expr) = current.take() {
                self.report(&expr)?;
            }
        }

        if self.session.is_awaiting_information() {
            tracing::warn!("input ended while the engine waits for information");
            self.session.interrupt().await;
            if let Some(expr) = current.take() {
                self.report(&expr)?;
            }
        }
        Ok(self.summary)
    }

    /// Drain session events, keeping the latest information request prompt.
    fn take_prompt(&mut self) -> Option<String> {
        let mut prompt = None;
        while let Ok(event) = self.events.try_recv() {
            tracing::trace!(event = %event.log_summary(), "session event");
            if let SessionEvent::InformationRequested { prompt: text, .. } = event {
                prompt = Some(text);
            }
        }
        prompt
    }

    fn report(&mut self, expr: &ExpressionRef) -> anyhow::Result<()> {
        let expr = expr.snapshot();
        if expr.status() == ExpressionStatus::Error {
            self.summary.errors += 1;
        }
        let diagnostic = match (expr.status(), self.format) {
            (ExpressionStatus::Error, OutputFormat::Text) => self.session.diagnose(expr.command()),
            _ => None,
        };
        let text = match diagnostic {
            Some(diagnostic) => diagnostic,
            None => format_expression(&expr, self.format)?,
        };
        if !text.is_empty() {
            writeln!(self.out, "{text}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "repl_tests.rs"]
mod tests;
