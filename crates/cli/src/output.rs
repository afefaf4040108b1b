// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;
use serde::Serialize;
use wks_core::{EvalResult, Expression, ExpressionId, ExpressionStatus};

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One line of JSON output per finished expression
#[derive(Debug, Serialize)]
struct ExpressionRecord<'a> {
    id: &'a ExpressionId,
    command: &'a str,
    status: ExpressionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    sequence_id: Option<u32>,
    results: &'a [EvalResult],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// Render a finished expression.
pub fn format_expression(expr: &Expression, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(format_text(expr)),
        OutputFormat::Json => {
            let record = ExpressionRecord {
                id: expr.id(),
                command: expr.command(),
                status: expr.status(),
                sequence_id: expr.sequence_id(),
                results: expr.results(),
                error: expr.error_message(),
            };
            Ok(serde_json::to_string(&record)?)
        }
    }
}

fn format_text(expr: &Expression) -> String {
    let mut lines = Vec::new();
    match expr.status() {
        ExpressionStatus::Error => {
            lines.push(format!("error: {}", expr.error_message().unwrap_or_default()));
        }
        ExpressionStatus::Interrupted => lines.push("interrupted".to_string()),
        _ => {
            for result in expr.results() {
                lines.push(format_result(result));
                if let Some(warning) = result.warning() {
                    lines.push(format!("warning: {warning}"));
                }
            }
        }
    }
    lines.join("\n")
}

fn format_result(result: &EvalResult) -> String {
    match result {
        EvalResult::Text { plain, .. } | EvalResult::Rich { plain, .. } => plain.clone(),
        EvalResult::Image { location } => format!("[image: {}]", location.display()),
        EvalResult::Help { body } => body.clone(),
    }
}

/// Render the engine's question for the user.
pub fn format_prompt(prompt: &str, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(format!("? {prompt}")),
        OutputFormat::Json => Ok(serde_json::to_string(&serde_json::json!({
            "type": "expression:info_request",
            "prompt": prompt,
        }))?),
    }
}
