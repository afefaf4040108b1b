// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pre-submission lexical check of a raw command.
//!
//! The lexer never tokenizes fully: it tracks comment nesting depth and
//! string state, which is enough to reject commands the engine would hang
//! on (an unterminated comment or string swallows the terminating prompt)
//! and to skip commands that contain nothing but comments and whitespace.

use crate::span::{diagnostic_context, Span};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Characters and tokens the lexer recognizes.
///
/// An empty comment token disables comment tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexerRules {
    pub escape: char,
    pub quote: char,
    pub comment_open: String,
    pub comment_close: String,
}

impl Default for LexerRules {
    fn default() -> Self {
        Self {
            escape: '\\',
            quote: '"',
            comment_open: "/*".to_string(),
            comment_close: "*/".to_string(),
        }
    }
}

/// Reasons a command is rejected before submission.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unmatched comment close '{token}' at position {}", span.start)]
    UnmatchedClose { token: String, span: Span },

    /// Span covers the outermost comment left open.
    #[error("unterminated comment starting at position {}", span.start)]
    UnterminatedComment { span: Span },

    /// Span covers the opening quote through the end of input.
    #[error("unterminated string starting at position {}", span.start)]
    UnterminatedString { span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnmatchedClose { span, .. }
            | LexError::UnterminatedComment { span }
            | LexError::UnterminatedString { span } => *span,
        }
    }

    /// Rich diagnostic with line/column info for `input`.
    pub fn diagnostic(&self, input: &str) -> String {
        diagnostic_context(input, self.span(), &self.to_string())
    }
}

/// Outcome of [`CommandLexer::classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Send to the engine.
    Submit,
    /// Only whitespace and comments; finishes Done without engine contact.
    SkipAsNoOp,
    /// Finishes Error without engine contact.
    Reject(LexError),
}

#[derive(Debug, Clone, Default)]
pub struct CommandLexer {
    rules: LexerRules,
}

impl CommandLexer {
    pub fn new(rules: LexerRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &LexerRules {
        &self.rules
    }

    /// Classify `command`. Purely local, no I/O.
    pub fn classify(&self, command: &str) -> Classification {
        let rules = &self.rules;
        let open = rules.comment_open.as_str();
        let close = rules.comment_close.as_str();

        let mut depth = 0usize;
        let mut outermost_open = 0usize;
        let mut in_string = false;
        let mut string_start = 0usize;
        let mut is_noop = true;

        let mut i = 0;
        while let Some(ch) = command[i..].chars().next() {
            let rest = &command[i..];

            if ch == rules.escape {
                // The escape and the character after it form one unit
                let next = rest[ch.len_utf8()..]
                    .chars()
                    .next()
                    .map_or(0, char::len_utf8);
                if depth == 0 && !in_string {
                    is_noop = false;
                }
                i += ch.len_utf8() + next;
            } else if ch == rules.quote && depth == 0 {
                in_string = !in_string;
                if in_string {
                    string_start = i;
                }
                is_noop = false;
                i += ch.len_utf8();
            } else if !in_string && !open.is_empty() && rest.starts_with(open) {
                if depth == 0 {
                    outermost_open = i;
                }
                depth += 1;
                i += open.len();
            } else if !in_string && !close.is_empty() && rest.starts_with(close) {
                if depth == 0 {
                    let err = LexError::UnmatchedClose {
                        token: close.to_string(),
                        span: Span::new(i, i + close.len()),
                    };
                    tracing::debug!(error = %err, "command rejected");
                    return Classification::Reject(err);
                }
                depth -= 1;
                i += close.len();
            } else {
                if depth == 0 && !ch.is_whitespace() {
                    is_noop = false;
                }
                i += ch.len_utf8();
            }
        }

        let err = if depth > 0 {
            LexError::UnterminatedComment {
                span: Span::new(outermost_open, command.len()),
            }
        } else if in_string {
            LexError::UnterminatedString {
                span: Span::new(string_start, command.len()),
            }
        } else if is_noop {
            return Classification::SkipAsNoOp;
        } else {
            return Classification::Submit;
        };
        tracing::debug!(error = %err, "command rejected");
        Classification::Reject(err)
    }
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
