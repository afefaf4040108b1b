// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed pieces of engine output attached to an expression.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One structured piece of output.
///
/// Information requests are not represented here: they suspend
/// finalization and never become a stored result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvalResult {
    /// Plain text, optionally annotated with an engine warning.
    Text {
        plain: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        warning: Option<String>,
    },
    /// Typeset body with a plain-text fallback.
    Rich {
        latex: String,
        plain: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        warning: Option<String>,
    },
    /// Image written by the engine (plots).
    Image { location: PathBuf },
    /// Documentation text returned for a help request.
    Help { body: String },
}

impl EvalResult {
    pub fn text(plain: impl Into<String>) -> Self {
        EvalResult::Text {
            plain: plain.into(),
            warning: None,
        }
    }

    pub fn rich(latex: impl Into<String>, plain: impl Into<String>) -> Self {
        EvalResult::Rich {
            latex: latex.into(),
            plain: plain.into(),
            warning: None,
        }
    }

    /// Plain-text rendering, if this result has one.
    pub fn plain(&self) -> Option<&str> {
        match self {
            EvalResult::Text { plain, .. } | EvalResult::Rich { plain, .. } => Some(plain),
            EvalResult::Help { body } => Some(body),
            EvalResult::Image { .. } => None,
        }
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            EvalResult::Text { warning, .. } | EvalResult::Rich { warning, .. } => {
                warning.as_deref()
            }
            _ => None,
        }
    }

    pub fn is_warning(&self) -> bool {
        self.warning().is_some()
    }

    /// Attach a warning annotation. Returns false for variants that
    /// cannot carry one.
    pub fn set_warning(&mut self, text: impl Into<String>) -> bool {
        match self {
            EvalResult::Text { warning, .. } | EvalResult::Rich { warning, .. } => {
                *warning = Some(text.into());
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
