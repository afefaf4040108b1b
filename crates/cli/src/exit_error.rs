// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error carrying the process exit code

use thiserror::Error;

/// Exit codes
pub const EXIT_EVALUATION_FAILED: i32 = 1;
pub const EXIT_LOGIN_FAILED: i32 = 2;

/// Ends the process with `code`. An empty message prints nothing.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
