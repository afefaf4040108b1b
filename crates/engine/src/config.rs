// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session configuration loaded from TOML.
//!
//! ```toml
//! backend = "maxima"
//! program = "maxima"
//! args = ["--very-quiet"]
//! stray_text_policy = "warn_when_result_present"
//! typeset = true
//! plot_integration = true
//! keyword_file = "~/.config/wks/keywords.toml"
//! ```

use crate::backend::{Backend, BackendKind};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wks_adapters::ProcessConfig;
use wks_core::KeywordTable;
use wks_protocol::{StrayTextPolicy, TagVocabulary};

/// Marker closing the first prompt a tagged engine prints at startup
const MAXIMA_READY_MARKER: &str = "</PROMPT>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub backend: BackendKind,
    pub program: String,
    pub args: Vec<String>,
    /// Startup output to wait for; backend default when unset, and an
    /// empty string disables waiting
    pub ready_marker: Option<String>,
    pub stray_text_policy: StrayTextPolicy,
    /// Produce rich results from latex output
    pub typeset: bool,
    pub plot_integration: bool,
    /// Extra identifiers merged into the backend's table
    pub keyword_file: Option<PathBuf>,
    /// Override of the output label regex; must capture the label digits
    pub label_pattern: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Maxima,
            program: "maxima".to_string(),
            args: vec!["--very-quiet".to_string()],
            ready_marker: None,
            stray_text_policy: StrayTextPolicy::default(),
            typeset: true,
            plot_integration: true,
            keyword_file: None,
            label_pattern: None,
        }
    }
}

impl SessionConfig {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist. A missing default file yields the
    /// default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match crate::env::config_path() {
                Some(path) if path.exists() => path,
                _ => {
                    tracing::debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml_str(&content, &path)?;
        tracing::info!(path = %path.display(), backend = %config.backend, "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.program.trim().is_empty() {
            return Err(ConfigError::Invalid("program must not be empty".to_string()));
        }
        if let Some(pattern) = &self.label_pattern {
            TagVocabulary::default()
                .with_label_pattern(pattern)
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        Ok(())
    }

    pub fn backend(&self) -> Backend {
        match self.backend {
            BackendKind::Maxima => Backend::Maxima {
                plot_integration: self.plot_integration,
                plot_dir: crate::env::plot_dir(),
            },
            BackendKind::Generic => Backend::Generic,
        }
    }

    /// The backend's table extended with the configured keyword file.
    pub fn keywords(&self) -> Result<KeywordTable, ConfigError> {
        let mut table = self.backend().keywords();
        if let Some(path) = &self.keyword_file {
            table.extend(KeywordTable::load(path)?);
        }
        Ok(table)
    }

    pub fn vocabulary(&self) -> Result<TagVocabulary, ConfigError> {
        let vocab = self.backend().vocabulary();
        match &self.label_pattern {
            Some(pattern) => vocab
                .with_label_pattern(pattern)
                .map_err(|e| ConfigError::Invalid(e.to_string())),
            None => Ok(vocab),
        }
    }

    pub fn ready_marker(&self) -> Option<&str> {
        match (&self.ready_marker, self.backend) {
            (Some(marker), _) => Some(marker.as_str()).filter(|m| !m.is_empty()),
            (None, BackendKind::Maxima) => Some(MAXIMA_READY_MARKER),
            (None, BackendKind::Generic) => None,
        }
    }

    /// Launch settings for a process transport.
    pub fn process_config(&self) -> ProcessConfig {
        let config = ProcessConfig::new(&self.program).args(&self.args);
        match self.ready_marker() {
            Some(marker) => config.ready_marker(marker),
            None => config,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
