// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wks-syntax: local text analysis done before anything reaches an engine
//!
//! Provides:
//! - [`CommandLexer`]: comment/string balance check that decides whether a
//!   command is submitted, skipped or rejected
//! - [`CompletionObject`]: identifier scanning and completion line edits

pub mod completion;
pub mod lexer;
pub mod span;

pub use completion::{identifier_bounds, CompletionMode, CompletionObject, LineEdit};
pub use lexer::{Classification, CommandLexer, LexError, LexerRules};
pub use span::{diagnostic_context, locate_span, Span};
