// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

/// Log filter directive: WKS_LOG > "warn"
pub fn log_filter() -> String {
    match std::env::var("WKS_LOG") {
        Ok(filter) if !filter.trim().is_empty() => filter,
        _ => "warn".to_string(),
    }
}
