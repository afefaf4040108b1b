// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-expression parse state carried between output chunks.

use wks_core::EvalResult;

/// Unconsumed output and the partially built batch of one expression.
///
/// A cursor belongs to exactly one in-flight expression. Once that
/// expression finalizes the cursor is dropped; any output already received
/// past the closing prompt moves to a fresh cursor via [`carry_over`].
///
/// [`carry_over`]: ParseCursor::carry_over
#[derive(Debug, Default)]
pub struct ParseCursor {
    buffer: String,
    /// Trailing bytes of a UTF-8 sequence split across chunks
    pending: Vec<u8>,
    stray: String,
    results: Vec<EvalResult>,
    sequence_id: Option<u32>,
}

impl ParseCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk` onto the buffer.
    ///
    /// An incomplete multi-byte sequence at the end is held back until the
    /// next chunk; invalid sequences decode as U+FFFD.
    pub fn push_bytes(&mut self, chunk: &[u8]) {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut rest = bytes.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    return;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    self.buffer.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(len) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            self.pending = after.to_vec();
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Decoded output not consumed by the parser yet.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Drop the first `len` bytes of the buffer.
    pub(crate) fn consume(&mut self, len: usize) {
        self.buffer.drain(..len.min(self.buffer.len()));
    }

    /// Move the first `len` bytes of the buffer to the stray accumulator.
    pub(crate) fn consume_as_stray(&mut self, len: usize) {
        let len = len.min(self.buffer.len());
        self.stray.extend(self.buffer.drain(..len));
    }

    pub fn stray_text(&self) -> &str {
        &self.stray
    }

    pub(crate) fn clear_stray(&mut self) {
        self.stray.clear();
    }

    pub fn results(&self) -> &[EvalResult] {
        &self.results
    }

    /// Record a parsed result. The label number of the first labelled
    /// result in the batch becomes the sequence id.
    pub(crate) fn push_result(&mut self, result: EvalResult, label: Option<u32>) {
        if self.results.is_empty() && self.sequence_id.is_none() {
            self.sequence_id = label;
        }
        self.results.push(result);
    }

    pub fn sequence_id(&self) -> Option<u32> {
        self.sequence_id
    }

    /// Hand over the finished batch: `(stray text, results, sequence id)`.
    pub(crate) fn take_batch(&mut self) -> (String, Vec<EvalResult>, Option<u32>) {
        (
            std::mem::take(&mut self.stray),
            std::mem::take(&mut self.results),
            self.sequence_id.take(),
        )
    }

    /// True when there is neither buffered output nor batch state.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
            && self.pending.is_empty()
            && self.stray.is_empty()
            && self.results.is_empty()
    }

    /// Consume this cursor, keeping only unparsed output for the next
    /// expression.
    pub fn carry_over(self) -> ParseCursor {
        ParseCursor {
            buffer: self.buffer,
            pending: self.pending,
            ..ParseCursor::default()
        }
    }
}

#[cfg(test)]
#[path = "cursor_tests.rs"]
mod tests;
