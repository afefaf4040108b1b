// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session identity and connection status.

use serde::{Deserialize, Serialize};
use std::fmt;

crate::string_id! {
    /// Identifies one live connection to an engine instance.
    pub struct SessionId;
}

/// Connection status of a session.
///
/// `Idle` and `Computing` are the two sub-states of a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Disconnected,
    /// Logged in, queue empty
    Idle,
    /// Logged in, one expression in flight
    Computing,
}

impl SessionStatus {
    pub fn is_running(&self) -> bool {
        !matches!(self, SessionStatus::Disconnected)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Disconnected => write!(f, "disconnected"),
            SessionStatus::Idle => write!(f, "idle"),
            SessionStatus::Computing => write!(f, "computing"),
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
