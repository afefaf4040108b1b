// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Normalization of engine text shown to users as errors or warnings.

/// Trim surrounding whitespace and collapse runs of blank lines so that
/// content lines are separated by exactly one line break.
///
/// ```ignore
/// assert_eq!(normalize_message("\n  oops\n\n\nline 2  \n"), "oops\nline 2");
/// ```
pub fn normalize_message(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
