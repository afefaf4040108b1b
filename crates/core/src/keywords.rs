// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-backend identifier table used for completion.
//!
//! Built explicitly and handed to a session at construction; there is no
//! process-wide registry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// How an accepted completion should edit the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    FunctionWithArguments,
    FunctionWithoutArguments,
    Keyword,
    Variable,
    Unknown,
}

#[derive(Debug, Error)]
pub enum KeywordError {
    #[error("failed to read keyword file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse keyword file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Known identifiers of an engine, grouped by how they complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTable {
    #[serde(default)]
    pub functions: BTreeSet<String>,
    #[serde(default)]
    pub nullary_functions: BTreeSet<String>,
    #[serde(default)]
    pub keywords: BTreeSet<String>,
    #[serde(default)]
    pub variables: BTreeSet<String>,
}

impl KeywordTable {
    /// Built-in table for the Maxima backend.
    pub fn maxima() -> Self {
        fn set(names: &[&str]) -> BTreeSet<String> {
            names.iter().map(|s| s.to_string()).collect()
        }
        Self {
            functions: set(&[
                "block", "cos", "describe", "diff", "example", "expand", "factor", "integrate",
                "kill", "limit", "log", "makelist", "plot2d", "plot3d", "print", "rat", "ratsimp",
                "sin", "sinh", "solve", "sqrt", "subst", "sum", "tan", "taylor", "tex",
            ]),
            nullary_functions: set(&["quit", "to_lisp"]),
            keywords: set(&["and", "do", "else", "for", "if", "not", "or", "then", "while"]),
            variables: set(&["functions", "labels", "values"]),
        }
    }

    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, KeywordError> {
        toml::from_str(content).map_err(|source| KeywordError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, KeywordError> {
        let content = std::fs::read_to_string(path).map_err(|source| KeywordError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Merge another table into this one.
    pub fn extend(&mut self, other: KeywordTable) {
        self.functions.extend(other.functions);
        self.nullary_functions.extend(other.nullary_functions);
        self.keywords.extend(other.keywords);
        self.variables.extend(other.variables);
    }

    pub fn kind_of(&self, name: &str) -> IdentifierKind {
        if self.functions.contains(name) {
            IdentifierKind::FunctionWithArguments
        } else if self.nullary_functions.contains(name) {
            IdentifierKind::FunctionWithoutArguments
        } else if self.keywords.contains(name) {
            IdentifierKind::Keyword
        } else if self.variables.contains(name) {
            IdentifierKind::Variable
        } else {
            IdentifierKind::Unknown
        }
    }

    /// Every name in the table, across all groups.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions
            .iter()
            .chain(&self.nullary_functions)
            .chain(&self.keywords)
            .chain(&self.variables)
            .map(String::as_str)
    }

    /// Sorted, de-duplicated names starting with `prefix`. An empty
    /// prefix matches nothing.
    pub fn completions(&self, prefix: &str) -> Vec<String> {
        if prefix.is_empty() {
            return Vec::new();
        }
        let names: BTreeSet<&str> = self.names().filter(|name| name.starts_with(prefix)).collect();
        names.into_iter().map(str::to_string).collect()
    }
}

#[cfg(test)]
#[path = "keywords_tests.rs"]
mod tests;
