// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decides the outcome of a batch from its stray text.
//!
//! Engines print errors and warnings as untagged text, so the only signal
//! is whether typed results came back alongside it.

use serde::{Deserialize, Serialize};
use wks_core::{normalize_message, EvalResult, ExpressionFlags, ExpressionStatus};

/// What stray text means when the batch also produced results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrayTextPolicy {
    /// Something evaluated, so the text is a warning on the last result.
    #[default]
    WarnWhenResultPresent,
    /// The text is an error; result text is prepended as context.
    PrependResultToError,
}

/// Terminal outcome of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub status: ExpressionStatus,
    pub results: Vec<EvalResult>,
    pub error_message: Option<String>,
}

impl Classified {
    fn done(results: Vec<EvalResult>) -> Self {
        Self {
            status: ExpressionStatus::Done,
            results,
            error_message: None,
        }
    }

    fn error(message: String) -> Self {
        Self {
            status: ExpressionStatus::Error,
            results: Vec::new(),
            error_message: Some(message),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultClassifier {
    policy: StrayTextPolicy,
}

impl ResultClassifier {
    pub fn new(policy: StrayTextPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> StrayTextPolicy {
        self.policy
    }

    pub fn classify(
        &self,
        stray: &str,
        mut results: Vec<EvalResult>,
        flags: ExpressionFlags,
    ) -> Classified {
        let message = normalize_message(stray);
        if message.is_empty() {
            return Classified::done(results);
        }

        if flags.raw_passthrough {
            tracing::debug!("stray text is the raw pass-through result");
            let body = strip_blank_edges(stray).to_string();
            return Classified::done(vec![EvalResult::text(with_context(&results, body))]);
        }

        if flags.help_request {
            tracing::debug!("stray text is the help body");
            return Classified::done(vec![EvalResult::Help {
                body: strip_blank_edges(stray).to_string(),
            }]);
        }

        let stray = message;

        if results.is_empty() {
            return Classified::error(stray);
        }

        match self.policy {
            StrayTextPolicy::WarnWhenResultPresent => {
                let annotated = results
                    .iter_mut()
                    .rev()
                    .any(|result| result.set_warning(stray.clone()));
                if !annotated {
                    tracing::debug!(warning = %stray, "no result can carry the warning");
                }
                Classified::done(results)
            }
            StrayTextPolicy::PrependResultToError => {
                Classified::error(with_context(&results, stray))
            }
        }
    }
}

/// `text` without its leading blank lines and trailing whitespace.
/// Indentation and inner blank lines are kept.
fn strip_blank_edges(text: &str) -> &str {
    let mut start = 0;
    for line in text.split_inclusive('\n') {
        if !line.trim().is_empty() {
            break;
        }
        start += line.len();
    }
    text[start..].trim_end()
}

/// `stray` preceded by the plain text of `results`, one fragment per line.
fn with_context(results: &[EvalResult], stray: String) -> String {
    let context: Vec<&str> = results.iter().filter_map(EvalResult::plain).collect();
    if context.is_empty() {
        return stray;
    }
    format!("{}\n{}", context.join("\n"), stray)
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
