// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Byte ranges into a command and caret diagnostics for them.

use serde::{Deserialize, Serialize};

/// A byte range `[start, end)` in a command string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must not exceed end");
        Self { start, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The spanned text, or `""` when out of bounds or off a char boundary.
    #[inline]
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

/// Locate a span as `(line, column, line_text)`.
///
/// Lines are 1-indexed; the column counts characters from the line start,
/// 0-indexed.
pub fn locate_span(source: &str, span: Span) -> (usize, usize, &str) {
    let start = span.start.min(source.len());
    let before = source.get(..start).unwrap_or(source);
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line = before.matches('\n').count() + 1;
    let line_end = source[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(source.len());
    let column = source[line_start..before.len()].chars().count();
    (line, column, &source[line_start..line_end])
}

/// Render `message` with a gutter and carets under `span`:
///
/// ```text
/// error: unterminated string
///   --> line 1, column 7
///    |
///  1 | print("abc
///    |       ^^^^
/// ```
pub fn diagnostic_context(source: &str, span: Span, message: &str) -> String {
    let (line, column, text) = locate_span(source, span);
    let visible = span.slice(source).lines().next().unwrap_or("");
    let carets = visible.chars().count().max(1);
    format!(
        "error: {}\n  --> line {}, column {}\n   |\n{:>3} | {}\n   | {}{}",
        message,
        line,
        column + 1,
        line,
        text,
        " ".repeat(column),
        "^".repeat(carets)
    )
}

#[cfg(test)]
#[path = "span_tests.rs"]
mod tests;
