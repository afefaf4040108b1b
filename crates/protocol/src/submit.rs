// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Encoding of commands and information lines sent to the engine.

/// Statement terminators accepted by the engine. The first is used when a
/// command has none.
pub const TERMINATORS: [char; 2] = [';', '$'];

/// Encode `command` as one input line.
///
/// Appends a terminator when absent and flattens embedded line breaks so
/// the engine evaluates the whole command and answers with one prompt.
pub fn prepare_command(command: &str) -> String {
    let mut line = flatten(command);
    if !line.ends_with(TERMINATORS) {
        line.push(TERMINATORS[0]);
    }
    line.push('\n');
    line
}

/// Encode an answer to an information request.
///
/// Only the primary terminator counts here: `$` is a legitimate part of
/// an answer.
pub fn prepare_information(text: &str) -> String {
    let mut line = flatten(text);
    if !line.ends_with(TERMINATORS[0]) {
        line.push(TERMINATORS[0]);
    }
    line.push('\n');
    line
}

fn flatten(text: &str) -> String {
    text.trim_end()
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

#[cfg(test)]
#[path = "submit_tests.rs"]
mod tests;
