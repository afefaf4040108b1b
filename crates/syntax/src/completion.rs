// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier scanning and completion line edits.
//!
//! All indices here are character indices into the line, not byte offsets.

use serde::{Deserialize, Serialize};
use wks_core::IdentifierKind;

fn may_contain(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn may_begin(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Bounds `(start, end)` of the identifier ending just before `index`.
///
/// Walks left from `index - 1` while characters may continue an identifier;
/// `start` is the leftmost scanned position whose character may also begin
/// one and `end` is `index`. Returns `None` when no scanned character can
/// begin an identifier.
pub fn identifier_bounds(line: &str, index: usize) -> Option<(usize, usize)> {
    let chars: Vec<char> = line.chars().collect();
    let end = index.min(chars.len());
    let mut start = None;
    for i in (0..end).rev() {
        if !may_contain(chars[i]) {
            break;
        }
        if may_begin(chars[i]) {
            start = Some(i);
        }
    }
    start.map(|start| (start, end))
}

/// How an accepted candidate edits the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionMode {
    /// Replace the identifier span only; kind not resolved yet
    Preliminary,
    FunctionWithArguments,
    FunctionWithoutArguments,
    Keyword,
    Variable,
}

impl From<IdentifierKind> for CompletionMode {
    fn from(kind: IdentifierKind) -> Self {
        match kind {
            IdentifierKind::FunctionWithArguments => CompletionMode::FunctionWithArguments,
            IdentifierKind::FunctionWithoutArguments => CompletionMode::FunctionWithoutArguments,
            IdentifierKind::Keyword => CompletionMode::Keyword,
            IdentifierKind::Variable | IdentifierKind::Unknown => CompletionMode::Variable,
        }
    }
}

/// Result of accepting a completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineEdit {
    pub line: String,
    /// Cursor position as a character index
    pub cursor: usize,
}

/// Completion state for one line and cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionObject {
    line: Vec<char>,
    position: usize,
    prefix: String,
}

impl CompletionObject {
    /// Start completing `line` at `index` (end of line when `None`).
    ///
    /// Without an identifier before the cursor the prefix is empty and the
    /// span starts at the cursor.
    pub fn new(line: &str, index: Option<usize>) -> Self {
        let chars: Vec<char> = line.chars().collect();
        let index = index.unwrap_or(chars.len()).min(chars.len());
        let position = identifier_bounds(line, index).map_or(index, |(start, _)| start);
        let prefix = chars[position..index].iter().collect();
        Self {
            line: chars,
            position,
            prefix,
        }
    }

    pub fn line(&self) -> String {
        self.line.iter().collect()
    }

    /// Start of the identifier span.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Identifier text between the span start and the cursor.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn after_span(&self) -> usize {
        self.position + self.prefix.chars().count()
    }

    /// Apply `candidate` to the line according to `mode`.
    pub fn complete(&self, candidate: &str, mode: CompletionMode) -> LineEdit {
        if candidate.is_empty() {
            return LineEdit {
                line: self.line(),
                cursor: self.after_span(),
            };
        }
        match mode {
            CompletionMode::Preliminary | CompletionMode::Variable => self.complete_variable(candidate),
            CompletionMode::Keyword => self.complete_keyword(candidate),
            CompletionMode::FunctionWithArguments => self.complete_function(candidate, true),
            CompletionMode::FunctionWithoutArguments => self.complete_function(candidate, false),
        }
    }

    fn head(&self, name: &str) -> String {
        let mut out: String = self.line[..self.position].iter().collect();
        out.push_str(name);
        out
    }

    fn tail(&self, from: usize) -> String {
        self.line[from.min(self.line.len())..].iter().collect()
    }

    fn complete_variable(&self, name: &str) -> LineEdit {
        LineEdit {
            line: self.head(name) + &self.tail(self.after_span()),
            cursor: self.position + name.chars().count(),
        }
    }

    fn complete_keyword(&self, name: &str) -> LineEdit {
        let after = self.after_span();
        let spaced = self.line.get(after).is_some_and(|c| c.is_whitespace());
        let separator = if spaced { "" } else { " " };
        LineEdit {
            line: self.head(name) + separator + &self.tail(after),
            cursor: self.position + name.chars().count() + 1,
        }
    }

    fn complete_function(&self, name: &str, with_arguments: bool) -> LineEdit {
        let after = self.after_span();
        // Just inside the opening parenthesis
        let inside = self.position + name.chars().count() + 1;
        let head = self.head(name);

        if self.line.get(after) != Some(&'(') {
            let cursor = if with_arguments { inside } else { inside + 1 };
            return LineEdit {
                line: head + "()" + &self.tail(after),
                cursor,
            };
        }

        // Reuse the existing parenthesis
        let rest = self.tail(after + 1);
        let next = (after + 1..self.line.len()).find(|&i| !self.line[i].is_whitespace());
        match (with_arguments, next) {
            (true, Some(_)) => LineEdit {
                line: head + "(" + &rest,
                cursor: inside,
            },
            (true, None) => LineEdit {
                line: head + "()" + &rest,
                cursor: inside,
            },
            (false, Some(i)) if self.line[i] == ')' => LineEdit {
                line: head + "(" + &rest,
                cursor: inside + i - after,
            },
            (false, _) => LineEdit {
                line: head + "()" + &rest,
                cursor: inside + 1,
            },
        }
    }
}

#[cfg(test)]
#[path = "completion_tests.rs"]
mod tests;
