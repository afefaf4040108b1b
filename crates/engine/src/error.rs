// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the session engine

use std::path::PathBuf;
use thiserror::Error;
use wks_adapters::TransportError;
use wks_core::KeywordError;

/// Errors a session returns to its caller.
///
/// Evaluation failures never surface here; they finalize the expression
/// with an error status instead.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("no information request is pending")]
    NoInformationRequest,
}

/// Errors loading a session configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error(transparent)]
    Keywords(#[from] KeywordError),
}
