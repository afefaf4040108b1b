// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tag names and output-label pattern of the engine's output format.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Default output label: `(`, a one or two character marker such as `%o`,
/// digits, `)`.
pub const DEFAULT_LABEL_PATTERN: &str = r"^\([%A-Za-z]{1,2}(\d+)\)";

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static DEFAULT_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_LABEL_PATTERN).expect("constant regex pattern is valid"));

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid output label pattern '{pattern}': {source}")]
    InvalidLabelPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Names of the tags an engine wraps its output in.
#[derive(Debug, Clone)]
pub struct TagVocabulary {
    pub result: String,
    pub text: String,
    pub latex: String,
    pub prompt: String,
    pub info_request: String,
    label: Regex,
}

impl Default for TagVocabulary {
    fn default() -> Self {
        Self {
            result: "RESULT".to_string(),
            text: "TEXT".to_string(),
            latex: "LATEX".to_string(),
            prompt: "PROMPT".to_string(),
            info_request: "INFO-REQUEST".to_string(),
            label: DEFAULT_LABEL.clone(),
        }
    }
}

impl TagVocabulary {
    /// Replace the output-label pattern. The first capture group, when
    /// present, holds the label digits.
    pub fn with_label_pattern(mut self, pattern: &str) -> Result<Self, ProtocolError> {
        self.label = Regex::new(pattern).map_err(|source| ProtocolError::InvalidLabelPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(self)
    }

    pub fn label_pattern(&self) -> &str {
        self.label.as_str()
    }

    /// `<NAME>`
    pub fn open(name: &str) -> String {
        format!("<{name}>")
    }

    /// `</NAME>`
    pub fn close(name: &str) -> String {
        format!("</{name}>")
    }

    /// Remove a leading output label from `text`.
    ///
    /// Returns the remaining text (trimmed) and the label number when the
    /// label carried one.
    pub fn strip_label(&self, text: &str) -> (String, Option<u32>) {
        let text = text.trim();
        let Some(caps) = self.label.captures(text) else {
            return (text.to_string(), None);
        };
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        let number = caps.get(1).and_then(|m| m.as_str().parse().ok());
        let mut rest = String::with_capacity(text.len());
        rest.push_str(&text[..whole.start]);
        rest.push_str(&text[whole.end..]);
        (rest.trim().to_string(), number)
    }
}

#[cfg(test)]
#[path = "tags_tests.rs"]
mod tests;
