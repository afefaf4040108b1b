// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine-specific behavior behind one closed set of variants.
//!
//! A backend decides how a command is flagged at creation, how it is
//! rewritten before it reaches the engine, and which lexer rules, tag
//! vocabulary and identifier table apply.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use wks_core::{ExpressionFlags, KeywordTable};
use wks_protocol::{prepare_command, TagVocabulary};
use wks_syntax::LexerRules;

/// A call to one of the plotting functions with at least one argument
#[allow(clippy::expect_used)]
static PLOT_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:plot2d|plot3d|contour_plot)\s*\([^\)]").expect("constant regex pattern is valid")
});

/// The plot call up to its closing parenthesis, and the terminator after it
#[allow(clippy::expect_used)]
static PLOT_REWRITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"((?:plot2d|plot3d|contour_plot)\s*\(.*)\)([;\n$]|$)")
        .expect("constant regex pattern is valid")
});

/// Plot options that already direct output to a file
const OUTPUT_FILE_OPTIONS: [&str; 2] = ["gnuplot_out_file", "ps_file"];

const RAW_PREFIX: &str = ":lisp";
const QUIET_RAW_PREFIX: &str = ":lisp-quiet";
const HELP_PREFIXES: [&str; 3] = ["?", "describe(", "example("];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Maxima,
    Generic,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Maxima => write!(f, "maxima"),
            BackendKind::Generic => write!(f, "generic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Maxima driven through its tagged-output display hooks.
    Maxima {
        /// Render plots into image files instead of external windows
        plot_integration: bool,
        plot_dir: PathBuf,
    },
    /// Any engine speaking the tag vocabulary, with no command rewriting.
    Generic,
}

impl Backend {
    pub fn maxima() -> Self {
        Backend::Maxima {
            plot_integration: true,
            plot_dir: crate::env::plot_dir(),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Maxima { .. } => BackendKind::Maxima,
            Backend::Generic => BackendKind::Generic,
        }
    }

    pub fn lexer_rules(&self) -> LexerRules {
        match self {
            Backend::Maxima { .. } => LexerRules::default(),
            Backend::Generic => LexerRules {
                comment_open: String::new(),
                comment_close: String::new(),
                ..LexerRules::default()
            },
        }
    }

    pub fn vocabulary(&self) -> TagVocabulary {
        TagVocabulary::default()
    }

    /// Built-in identifier table; configuration may extend it.
    pub fn keywords(&self) -> KeywordTable {
        match self {
            Backend::Maxima { .. } => KeywordTable::maxima(),
            Backend::Generic => KeywordTable::default(),
        }
    }

    /// Request flags for a new user command.
    pub fn flags_for(&self, command: &str) -> ExpressionFlags {
        let Backend::Maxima {
            plot_integration, ..
        } = self
        else {
            return ExpressionFlags::default();
        };
        let command = command.trim_start();
        ExpressionFlags {
            internal: false,
            help_request: HELP_PREFIXES.iter().any(|p| command.starts_with(p)),
            raw_passthrough: command.starts_with(RAW_PREFIX),
            plot: *plot_integration
                && PLOT_CALL.is_match(command)
                && !OUTPUT_FILE_OPTIONS.iter().any(|o| command.contains(o)),
        }
    }

    /// Fresh image location for a plot expression.
    pub fn plot_file(&self) -> Option<PathBuf> {
        match self {
            Backend::Maxima {
                plot_integration: true,
                plot_dir,
            } => Some(plot_dir.join(format!("wks-plot-{}.png", uuid::Uuid::new_v4()))),
            _ => None,
        }
    }

    /// The exact text written to the engine for `command`.
    pub fn internal_command(&self, command: &str, plot_file: Option<&Path>) -> String {
        if matches!(self, Backend::Generic) {
            return prepare_command(command);
        }

        let mut command = match command.trim_start().strip_prefix(QUIET_RAW_PREFIX) {
            // The quiet form never prints a prompt
            Some(rest) => format!("{RAW_PREFIX}{rest}"),
            None => command.to_string(),
        };

        if let Some(file) = plot_file {
            let options = format!(
                "[gnuplot_term, \"png size 500,340\"], [gnuplot_out_file, \"{}\"]",
                file.display()
            );
            command = PLOT_REWRITE
                .replace(&command, |caps: &regex::Captures<'_>| {
                    format!("{}, {})", &caps[1], options) + &caps[2]
                })
                .into_owned();
        }

        prepare_command(&command)
    }
}

impl Default for Backend {
    fn default() -> Self {
        Backend::maxima()
    }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
