// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.

use std::path::PathBuf;

/// Resolve the config file: WKS_CONFIG > <config dir>/wks/config.toml
///
/// `None` when neither is available (no home directory).
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("WKS_CONFIG") {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    dirs::config_dir().map(|dir| dir.join("wks").join("config.toml"))
}

/// Directory plot images are rendered into: WKS_PLOT_DIR > system temp dir
pub fn plot_dir() -> PathBuf {
    match std::env::var("WKS_PLOT_DIR") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => std::env::temp_dir(),
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
